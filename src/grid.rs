use std::fmt;
use std::rc::Rc;

use error_chain::bail;
use petgraph::graph::{self, Graph};
use petgraph::Undirected;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::cells::{Cell, CoordinateOptionSmallVec, CoordinateSmallVec, GridCoordinate, GridDirection};
use crate::errors::*;
use crate::grid_displays::GridDisplay;
use crate::grid_iterators::{BatchIterType, RectBatchIter, RectGridCellIter};
use crate::units::{CellsCount, GridSize, PassagesCount};

/// Undirected graph of the open passages, one node per cell in row-major order.
pub type PassageGraph = Graph<GridCoordinate, (), Undirected, u32>;

/// An N×N grid of cells, each tracking its four walls.
///
/// Cells are stored row-major. Walls only ever come down, and always in pairs: the wall on a cell's
/// side and the facing wall of the neighbour on that side.
#[derive(Clone)]
pub struct Grid {
    dimension: GridSize,
    cells: Vec<Cell>,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveError {
    InvalidGridCoordinate,
    NoNeighbour,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: dimension: {:?}, passages: {:?}",
               self.dimension,
               self.passages_count())
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Grid) -> bool {
        self.dimension == other.dimension && self.cells == other.cells
    }
}
impl Eq for Grid {}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        let rows = self.iter_row()
            .map(|row| row.into_iter().map(|coord| self.cells[self.index_unchecked(coord)]).collect())
            .collect::<Vec<Vec<Cell>>>();
        let mut state = serializer.serialize_struct("Grid", 2)?;
        state.serialize_field("size", &self.dimension.0)?;
        state.serialize_field("cells", &rows)?;
        state.end()
    }
}

impl Grid {
    /// Creates a `size` × `size` grid with every wall up.
    pub fn new(size: usize) -> Result<Grid> {
        if size == 0 {
            bail!(ErrorKind::InvalidSize(0));
        }
        let cells_count = size.checked_mul(size)
            .ok_or_else(|| ErrorKind::InvalidSize(size as isize))?;

        // Byte size overflow and failed allocations are size errors too.
        let mut cells = Vec::new();
        cells.try_reserve_exact(cells_count)
            .map_err(|_| ErrorKind::InvalidSize(size as isize))?;
        cells.resize(cells_count, Cell::walled());

        Ok(Grid {
            dimension: GridSize(size),
            cells,
            grid_display: None,
        })
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    /// Number of cells along one side.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension.0
    }

    /// Total number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.cells.len())
    }

    /// The cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The wall flags at `coord`, `None` when the coordinate is off the grid.
    #[inline]
    pub fn cell(&self, coord: GridCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        coord.row < self.dimension.0 && coord.col < self.dimension.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(self.index_unchecked(coord))
        } else {
            None
        }
    }

    /// Is there a wall on the `direction` side of the cell?
    /// Off-grid coordinates read as walled.
    pub fn has_wall(&self, coord: GridCoordinate, direction: GridDirection) -> bool {
        self.cell(coord).map_or(true, |cell| cell.has_wall(direction))
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily connected by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        GridDirection::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: GridCoordinate,
                                    dirs: &[GridDirection])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: GridDirection)
                                  -> Option<GridCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        direction.offset(coord)
            .and_then(|neighbour_coord| if self.is_valid_coordinate(neighbour_coord) {
                Some(neighbour_coord)
            } else {
                None
            })
    }

    /// Open a passage from `coord` towards `direction`, clearing the facing walls of both cells.
    /// Returns the neighbour the passage leads to.
    pub fn carve(&mut self,
                 coord: GridCoordinate,
                 direction: GridDirection)
                 -> ::std::result::Result<GridCoordinate, CarveError> {
        let index = self.grid_coordinate_to_index(coord)
            .ok_or(CarveError::InvalidGridCoordinate)?;
        let neighbour = self.neighbour_at_direction(coord, direction)
            .ok_or(CarveError::NoNeighbour)?;
        let neighbour_index = self.index_unchecked(neighbour);

        self.open_walls(index, neighbour_index, direction);
        Ok(neighbour)
    }

    /// Clear the `direction` wall of the cell at `index` and the facing wall of the cell at
    /// `neighbour_index`. Both indices must be on the grid and adjacent in that direction.
    #[inline]
    pub(crate) fn open_walls(&mut self, index: usize, neighbour_index: usize, direction: GridDirection) {
        self.cells[index].clear_wall(direction);
        self.cells[neighbour_index].clear_wall(direction.opposite());
    }

    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: GridDirection) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() && !self.has_wall(coord, direction)
    }

    /// Are two cells in the grid adjacent and joined by a passage?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        GridDirection::between(a, b).map_or(false, |dir| self.is_neighbour_linked(a, dir))
    }

    /// Cells that are reachable from a particular cell through an open wall.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|cell| {
            cell.open_directions()
                .iter()
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Number of open passages, counting each shared wall once.
    pub fn passages_count(&self) -> PassagesCount {
        PassagesCount(self.iter_passages().count())
    }

    #[inline]
    pub fn iter(&self) -> RectGridCellIter {
        RectGridCellIter::new(self.dimension)
    }

    #[inline]
    pub fn iter_row(&self) -> RectBatchIter {
        RectBatchIter::new(BatchIterType::Row, self.dimension)
    }

    #[inline]
    pub fn iter_column(&self) -> RectBatchIter {
        RectBatchIter::new(BatchIterType::Column, self.dimension)
    }

    /// Every open passage exactly once, as (cell, neighbour) with the neighbour to the East or
    /// South of the cell.
    pub fn iter_passages(&self) -> PassagesIter {
        PassagesIter {
            grid: self,
            cell_index: 0,
            direction_index: 0,
        }
    }

    pub fn passage_graph(&self) -> PassageGraph {
        let mut graph = Graph::with_capacity(self.size(), self.size().saturating_sub(1));
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_passages() {
            let a_index = graph::NodeIndex::new(self.index_unchecked(a));
            let b_index = graph::NodeIndex::new(self.index_unchecked(b));
            let _ = graph.add_edge(a_index, b_index, ());
        }
        graph
    }

    #[inline]
    pub(crate) fn index_unchecked(&self, coord: GridCoordinate) -> usize {
        coord.row * self.dimension.0 + coord.col
    }
}

static FORWARD_DIRECTIONS: [GridDirection; 2] = [GridDirection::East, GridDirection::South];

#[derive(Debug)]
pub struct PassagesIter<'a> {
    grid: &'a Grid,
    cell_index: usize,
    direction_index: usize,
}

impl<'a> Iterator for PassagesIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cell_index < self.grid.size() {
            let coord = GridCoordinate::from_row_major_index(self.cell_index, self.grid.dimension);
            while self.direction_index < FORWARD_DIRECTIONS.len() {
                let dir = FORWARD_DIRECTIONS[self.direction_index];
                self.direction_index += 1;
                if self.grid.is_neighbour_linked(coord, dir) {
                    if let Some(neighbour) = self.grid.neighbour_at_direction(coord, dir) {
                        return Some((coord, neighbour));
                    }
                }
            }
            self.cell_index += 1;
            self.direction_index = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;

    fn small_grid(size: usize) -> Grid {
        Grid::new(size).expect("valid grid size")
    }

    #[test]
    fn zero_size_is_invalid() {
        let err = Grid::new(0).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidSize(0) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn overflowing_size_is_invalid() {
        assert!(Grid::new(usize::MAX).is_err());

        // The cell count fits a usize but the bytes for it do not.
        let err = Grid::new(1usize << 31).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidSize(s) => assert_eq!(s as usize, 1usize << 31),
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn new_grid_is_fully_walled() {
        let g = small_grid(5);
        assert!(g.cells().iter().all(|cell| cell.is_fully_walled()));
        assert_eq!(g.passages_count(), PassagesCount(0));
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let neighbours: Vec<GridCoordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |r, c| GridCoordinate::new(r, c);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(8, 9), gc(9, 8)]);

        // side element examples
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(8, 9), &[gc(7, 9), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // off the grid
        check_expected_neighbours(gc(10, 10), &[]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = small_grid(2);
        let gc = |r, c| GridCoordinate::new(r, c);

        let check_neighbours =
            |coord, dirs: &[GridDirection], neighbour_opts: &[Option<GridCoordinate>]| {
                let neighbour_options = g.neighbours_at_directions(coord, dirs);
                assert_eq!(&*neighbour_options, neighbour_opts);
            };
        check_neighbours(gc(0, 0), &[], &[]);
        check_neighbours(gc(0, 0), &[GridDirection::North], &[None]);
        check_neighbours(gc(0, 0),
                         &[GridDirection::West, GridDirection::North],
                         &[None, None]);
        check_neighbours(gc(0, 0),
                         &[GridDirection::East, GridDirection::South],
                         &[Some(gc(0, 1)), Some(gc(1, 0))]);
        check_neighbours(gc(1, 1),
                         &[GridDirection::South, GridDirection::East],
                         &[None, None]);
        check_neighbours(gc(1, 1),
                         &[GridDirection::West, GridDirection::North],
                         &[Some(gc(1, 0)), Some(gc(0, 1))]);
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10);
        assert_eq!(g.size(), 100);
        assert_eq!(g.dimension(), 10);
        assert_eq!(g.cells_count(), CellsCount(100));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3);
        let indices: Vec<Option<usize>> = g.iter()
            .map(|coord| g.grid_coordinate_to_index(coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(GridCoordinate::new(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(GridCoordinate::new(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(GridCoordinate::new(usize::MAX, usize::MAX)),
                   None);
    }

    #[test]
    fn off_grid_reads_as_wall() {
        let g = small_grid(2);
        let outside = GridCoordinate::new(5, 5);
        assert!(g.cell(outside).is_none());
        for dir in GridDirection::ALL.iter() {
            assert!(g.has_wall(outside, *dir));
            assert!(!g.is_neighbour_linked(outside, *dir));
        }
        assert!(g.links(outside).is_none());
    }

    #[test]
    fn carving_cells() {
        let mut g = small_grid(4);
        let a = GridCoordinate::new(1, 0);
        let b = GridCoordinate::new(2, 0);
        let c = GridCoordinate::new(2, 1);

        assert!(!g.is_linked(a, b));
        assert_eq!(g.links(a).unwrap().len(), 0);

        assert_eq!(g.carve(a, GridDirection::South), Ok(b));
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert!(!g.cell(a).unwrap().bottom);
        assert!(!g.cell(b).unwrap().top);
        assert!(g.cell(a).unwrap().top && g.cell(a).unwrap().left && g.cell(a).unwrap().right);
        assert_eq!(&*g.links(a).unwrap(), &[b]);
        assert_eq!(&*g.links(b).unwrap(), &[a]);

        assert_eq!(g.carve(b, GridDirection::East), Ok(c));
        assert!(g.is_linked(b, c));
        assert!(!g.is_linked(a, c));
        let b_links: Vec<GridCoordinate> = g.links(b).unwrap().iter().cloned().sorted().collect();
        assert_eq!(b_links, vec![a, c]);

        // carving an open passage again changes nothing
        assert_eq!(g.carve(c, GridDirection::West), Ok(b));
        assert_eq!(g.passages_count(), PassagesCount(2));
    }

    #[test]
    fn no_carving_off_the_grid() {
        let mut g = small_grid(3);
        let corner = GridCoordinate::new(0, 0);
        assert_eq!(g.carve(corner, GridDirection::North), Err(CarveError::NoNeighbour));
        assert_eq!(g.carve(corner, GridDirection::West), Err(CarveError::NoNeighbour));
        assert_eq!(g.carve(GridCoordinate::new(3, 0), GridDirection::North),
                   Err(CarveError::InvalidGridCoordinate));
        assert!(g.cell(corner).unwrap().is_fully_walled());
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2);
        assert_eq!(g.iter().collect::<Vec<GridCoordinate>>(),
                   &[GridCoordinate::new(0, 0),
                     GridCoordinate::new(0, 1),
                     GridCoordinate::new(1, 0),
                     GridCoordinate::new(1, 1)]);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2);
        assert_eq!(g.iter_row().collect::<Vec<Vec<GridCoordinate>>>(),
                   &[&[GridCoordinate::new(0, 0), GridCoordinate::new(0, 1)],
                     &[GridCoordinate::new(1, 0), GridCoordinate::new(1, 1)]]);
    }

    #[test]
    fn column_iter() {
        let g = small_grid(2);
        assert_eq!(g.iter_column().collect::<Vec<Vec<GridCoordinate>>>(),
                   &[&[GridCoordinate::new(0, 0), GridCoordinate::new(1, 0)],
                     &[GridCoordinate::new(0, 1), GridCoordinate::new(1, 1)]]);
    }

    #[test]
    fn passages_are_listed_once() {
        let mut g = small_grid(2);
        let gc = |r, c| GridCoordinate::new(r, c);
        g.carve(gc(0, 0), GridDirection::East).unwrap();
        g.carve(gc(1, 1), GridDirection::North).unwrap();
        g.carve(gc(1, 1), GridDirection::West).unwrap();

        let passages = g.iter_passages().collect::<Vec<_>>();
        assert_eq!(passages,
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 1), gc(1, 1)), (gc(1, 0), gc(1, 1))]);
        assert_eq!(g.passages_count(), PassagesCount(3));

        let graph = g.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph[graph::NodeIndex::new(2)], gc(1, 0));
    }

    #[test]
    fn grids_compare_by_walls() {
        let mut a = small_grid(3);
        let b = small_grid(3);
        assert_eq!(a, b);
        a.carve(GridCoordinate::new(1, 1), GridDirection::East).unwrap();
        assert_ne!(a, b);
        assert_ne!(small_grid(3), small_grid(4));
    }

    #[test]
    fn serializes_rows_of_cells() {
        let mut g = small_grid(2);
        g.carve(GridCoordinate::new(0, 0), GridDirection::East).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["size"], 2);
        assert_eq!(json["cells"][0][0]["right"], false);
        assert_eq!(json["cells"][0][1]["left"], false);
        assert_eq!(json["cells"][1][1]["top"], true);
    }
}
