// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get at everything `error_chain!` creates.
#![allow(deprecated)]

use error_chain::*;

use crate::cells::GridCoordinate;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Image(::image::ImageError);
        Json(::serde_json::Error);
    }

    errors {
        InvalidSize(size: isize) {
            description("invalid grid size")
            display("invalid grid size {}: a grid needs at least one cell per side", size)
        }
        InvalidCoordinate(coord: GridCoordinate) {
            description("coordinate outside of the grid")
            display("coordinate (row {}, column {}) is outside of the grid", coord.row, coord.col)
        }
        ImageTooLarge(dimension: usize, cell_pixels: u32) {
            description("maze image dimensions overflow")
            display("a {0}x{0} maze at {1} pixels per cell is too large to render", dimension, cell_pixels)
        }
    }
}
