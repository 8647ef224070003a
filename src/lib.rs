//! **backtracker_mazes** generates perfect mazes on square grids with a randomized depth first
//! backtracker, and hands the finished wall layout to whatever wants to draw it.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod pathing;
pub mod renderers;
pub mod units;
mod utils;

pub use crate::generators::{build, MazeBuilder};
pub use crate::grid::Grid;
