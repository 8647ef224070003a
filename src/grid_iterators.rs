use std::fmt;

use crate::cells::GridCoordinate;
use crate::units::{ColumnIndex, GridSize, RowIndex};

/// Row-major iteration over every coordinate of a square grid.
#[derive(Copy, Clone)]
pub struct RectGridCellIter {
    dimension: GridSize,
    current_cell_number: usize,
    cells_count: usize,
}

impl RectGridCellIter {
    pub fn new(dimension: GridSize) -> RectGridCellIter {
        RectGridCellIter {
            dimension,
            current_cell_number: 0,
            cells_count: dimension.0 * dimension.0,
        }
    }
}

impl fmt::Debug for RectGridCellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
               self.current_cell_number,
               self.cells_count)
    }
}

impl ExactSizeIterator for RectGridCellIter {} // default impl using size_hint()
impl Iterator for RectGridCellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.dimension);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[derive(Debug, Copy, Clone)]
pub enum BatchIterType {
    Row,
    Column,
}

/// Iterates a square grid one whole row (or column) at a time.
#[derive(Debug, Copy, Clone)]
pub struct RectBatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    dimension: GridSize,
}

impl RectBatchIter {
    pub fn new(iter_type: BatchIterType, dimension: GridSize) -> RectBatchIter {
        RectBatchIter {
            iter_type,
            current_index: 0,
            dimension,
        }
    }
}

impl ExactSizeIterator for RectBatchIter {} // default impl using size_hint()
impl Iterator for RectBatchIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let GridSize(length) = self.dimension;
        if self.current_index >= length {
            return None;
        }

        let index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..length)
                    .map(|i| GridCoordinate::from_row_column_indices(RowIndex(index), ColumnIndex(i)))
                    .collect()
            }
            BatchIterType::Column => {
                (0..length)
                    .map(|i| GridCoordinate::from_row_column_indices(RowIndex(i), ColumnIndex(index)))
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.dimension.0 - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn cell_iter_is_exact_size() {
        let mut iter = RectGridCellIter::new(GridSize(3));
        assert_eq!(iter.len(), 9);
        let _ = iter.next();
        assert_eq!(iter.len(), 8);
        assert_eq!(iter.last(), Some(GridCoordinate::new(2, 2)));
    }

    #[test]
    fn batch_iter_counts_lines() {
        let mut rows = RectBatchIter::new(BatchIterType::Row, GridSize(4));
        assert_eq!(rows.len(), 4);
        let first = rows.next().unwrap();
        assert_eq!(first.len(), 4);
        assert!(first.iter().all(|coord| coord.row == 0));
        assert_eq!(rows.len(), 3);

        let last_column = RectBatchIter::new(BatchIterType::Column, GridSize(4)).last().unwrap();
        assert!(last_column.iter().all(|coord| coord.col == 3));
    }
}
