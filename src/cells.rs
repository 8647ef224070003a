use serde_derive::Serialize;
use smallvec::SmallVec;

use crate::units::{ColumnIndex, GridSize, RowIndex};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<GridCoordinate>; 4]>;
pub type DirectionSmallVec = SmallVec<[GridDirection; 4]>;

/// A (row, column) position on a square grid. Row 0 is the top row, column 0 the left column.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize)]
pub struct GridCoordinate {
    pub row: usize,
    pub col: usize,
}

impl GridCoordinate {
    pub fn new(row: usize, col: usize) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, size: GridSize) -> GridCoordinate {
        let GridSize(width) = size;
        GridCoordinate::new(index / width, index % width)
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> GridCoordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        GridCoordinate::new(row, col)
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(row_col_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

/// The four unit offsets between adjacent cells.
///
/// North is `-row` (the cell's top side), South is `+row` (bottom), East is `+col` (right)
/// and West is `-col` (left).
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Serialize)]
pub enum GridDirection {
    North,
    South,
    East,
    West,
}

impl GridDirection {
    /// All directions, in the order the backtracker shuffles them from.
    pub const ALL: [GridDirection; 4] = [GridDirection::South,
                                         GridDirection::North,
                                         GridDirection::East,
                                         GridDirection::West];

    pub fn opposite(self) -> GridDirection {
        match self {
            GridDirection::North => GridDirection::South,
            GridDirection::South => GridDirection::North,
            GridDirection::East => GridDirection::West,
            GridDirection::West => GridDirection::East,
        }
    }

    /// Creates a new `GridCoordinate` offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable (negative).
    /// The upper grid boundary is not checked here, the grid does that.
    pub fn offset(self, coord: GridCoordinate) -> Option<GridCoordinate> {
        let GridCoordinate { row, col } = coord;
        match self {
            GridDirection::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, col)),
            GridDirection::South => row.checked_add(1).map(|r| GridCoordinate::new(r, col)),
            GridDirection::East => col.checked_add(1).map(|c| GridCoordinate::new(row, c)),
            GridDirection::West => col.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
        }
    }

    /// The direction leading from `a` to `b` if they are adjacent.
    pub fn between(a: GridCoordinate, b: GridCoordinate) -> Option<GridDirection> {
        GridDirection::ALL
            .iter()
            .cloned()
            .find(|dir| dir.offset(a) == Some(b))
    }
}

/// Wall flags of a single cell. `true` means a wall exists on that side.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize)]
pub struct Cell {
    pub top: bool,
    pub left: bool,
    pub bottom: bool,
    pub right: bool,
}

impl Default for Cell {
    fn default() -> Cell {
        Cell::walled()
    }
}

impl Cell {
    /// A cell with all four walls up.
    pub fn walled() -> Cell {
        Cell {
            top: true,
            left: true,
            bottom: true,
            right: true,
        }
    }

    #[inline]
    pub fn has_wall(&self, dir: GridDirection) -> bool {
        match dir {
            GridDirection::North => self.top,
            GridDirection::South => self.bottom,
            GridDirection::East => self.right,
            GridDirection::West => self.left,
        }
    }

    /// Directions in which this cell has no wall.
    pub fn open_directions(&self) -> DirectionSmallVec {
        GridDirection::ALL
            .iter()
            .cloned()
            .filter(|dir| !self.has_wall(*dir))
            .collect()
    }

    pub fn is_fully_walled(&self) -> bool {
        self.top && self.left && self.bottom && self.right
    }

    // Only the grid may open walls, it keeps the facing neighbour in sync.
    #[inline]
    pub(crate) fn clear_wall(&mut self, dir: GridDirection) {
        match dir {
            GridDirection::North => self.top = false,
            GridDirection::South => self.bottom = false,
            GridDirection::East => self.right = false,
            GridDirection::West => self.left = false,
        }
    }
}
