//! Perfect maze generation with a randomized depth first search ("recursive backtracker"), run
//! iteratively over an explicit stack.

use bit_set::BitSet;
use error_chain::bail;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, trace};

use crate::cells::{GridCoordinate, GridDirection};
use crate::errors::*;
use crate::grid::Grid;

/// One carving step: the wall between `from` and `to` came down.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Passage {
    pub from: GridCoordinate,
    pub to: GridCoordinate,
    pub direction: GridDirection,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerationState {
    Building,
    Done,
}

/// Build a `size` × `size` perfect maze from (0, 0), stopping branches at (size-1, size-1).
///
/// The same `seed` always yields the same maze. Without a seed the maze differs per run.
pub fn build(size: isize, seed: Option<u64>) -> Result<Grid> {
    let mut builder = MazeBuilder::new(size);
    if let Some(s) = seed {
        builder = builder.seed(s);
    }
    builder.build()
}

#[derive(Debug, Copy, Clone)]
enum EndCell {
    FarCorner,
    At(GridCoordinate),
    Unbounded,
}

/// Configures and runs maze generation.
///
/// Defaults: start at the top left cell, end at the bottom right cell, seeded from OS entropy.
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    size: isize,
    seed: Option<u64>,
    start: GridCoordinate,
    end: EndCell,
}

impl MazeBuilder {
    pub fn new(size: isize) -> MazeBuilder {
        MazeBuilder {
            size,
            seed: None,
            start: GridCoordinate::new(0, 0),
            end: EndCell::FarCorner,
        }
    }

    pub fn seed(mut self, seed: u64) -> MazeBuilder {
        self.seed = Some(seed);
        self
    }

    pub fn start(mut self, start: GridCoordinate) -> MazeBuilder {
        self.start = start;
        self
    }

    /// The cell that branches stop at. `None` carves without the early exit.
    pub fn end(mut self, end: Option<GridCoordinate>) -> MazeBuilder {
        self.end = end.map_or(EndCell::Unbounded, EndCell::At);
        self
    }

    pub fn build(&self) -> Result<Grid> {
        if self.size <= 0 {
            bail!(ErrorKind::InvalidSize(self.size));
        }
        let dimension = self.size as usize;
        let mut grid = Grid::new(dimension)?;

        let end = match self.end {
            EndCell::FarCorner => Some(GridCoordinate::new(dimension - 1, dimension - 1)),
            EndCell::At(coord) => Some(coord),
            EndCell::Unbounded => None,
        };
        let rng = match self.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };

        debug!(size = dimension, seed = ?self.seed, start = ?self.start, end = ?end, "Building maze");
        let carved = recursive_backtracker(&mut grid, rng, self.start, end)?.count();
        debug!(passages = carved, "Maze built");

        Ok(grid)
    }
}

/// Start a randomized depth first carve over `grid`.
///
/// Nothing is carved until the returned iterator is advanced; each `next` carves one passage.
/// Fails if `start` or `end` lie outside of the grid. An `end` equal to `start` stops nothing,
/// carving has to branch out of the start cell.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid,
                                     rng: R,
                                     start: GridCoordinate,
                                     end: Option<GridCoordinate>)
                                     -> Result<RecursiveBacktracker<R>> {
    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or(ErrorKind::InvalidCoordinate(start))?;
    if let Some(end_coord) = end {
        if !grid.is_valid_coordinate(end_coord) {
            bail!(ErrorKind::InvalidCoordinate(end_coord));
        }
    }

    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);

    Ok(RecursiveBacktracker {
        grid,
        rng,
        end: end.filter(|&end_coord| end_coord != start),
        visited,
        stack: vec![start],
    })
}

/// The carving traversal. Yields one `Passage` per carved wall and ends when the stack is empty,
/// at which point every cell has been visited.
#[derive(Debug)]
pub struct RecursiveBacktracker<'a, R: Rng> {
    grid: &'a mut Grid,
    rng: R,
    end: Option<GridCoordinate>,
    visited: BitSet,
    stack: Vec<GridCoordinate>,
}

impl<'a, R: Rng> RecursiveBacktracker<'a, R> {
    pub fn state(&self) -> GenerationState {
        if self.stack.is_empty() {
            GenerationState::Done
        } else {
            GenerationState::Building
        }
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

impl<'a, R: Rng> Iterator for RecursiveBacktracker<'a, R> {
    type Item = Passage;

    fn next(&mut self) -> Option<Passage> {
        while let Some(current) = self.stack.pop() {

            // Nothing branches out of the end cell, earlier branch points are still stacked.
            if Some(current) == self.end {
                continue;
            }

            // Stacked cells are always on the grid.
            let current_index = self.grid.index_unchecked(current);
            let mut directions = GridDirection::ALL;
            directions.shuffle(&mut self.rng);

            let unvisited = directions.iter().find_map(|&direction| {
                self.grid
                    .neighbour_at_direction(current, direction)
                    .map(|next| (direction, next, self.grid.index_unchecked(next)))
                    .filter(|&(_, _, next_index)| !self.visited.contains(next_index))
            });

            if let Some((direction, next, next_index)) = unvisited {
                self.grid.open_walls(current_index, next_index, direction);
                self.visited.insert(next_index);
                self.stack.push(current);
                self.stack.push(next);
                trace!(?current, to = ?next, ?direction, "Carved passage");

                return Some(Passage {
                    from: current,
                    to: next,
                    direction,
                });
            }
            // Dead end: dropped, its predecessor is next on the stack.
        }
        None
    }
}
