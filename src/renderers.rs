//! Rendering collaborators for a finished maze.
//!
//! Interior bottom and right walls are the same walls as a neighbour's top and left walls, so every
//! renderer here emits top and left walls for every cell that has them, and bottom and right walls
//! only along the grid's last row and last column.

use std::path::Path;

use error_chain::bail;
use image::{Rgb, RgbImage};
use serde_derive::Serialize;
use tracing::debug;

use crate::cells::{GridCoordinate, GridDirection};
use crate::errors::*;
use crate::grid::Grid;

/// A single wall to draw: the `side` of the cell at `coord`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize)]
pub struct WallSegment {
    pub coord: GridCoordinate,
    pub side: GridDirection,
}

/// Every wall of the maze exactly once.
pub fn wall_segments(grid: &Grid) -> Vec<WallSegment> {
    let last = grid.dimension() - 1;
    let mut segments = Vec::with_capacity(2 * grid.size() + 2 * grid.dimension());

    for coord in grid.iter() {
        let cell = match grid.cell(coord) {
            Some(cell) => cell,
            None => continue,
        };
        let mut emit = |side| segments.push(WallSegment { coord, side });

        if cell.top {
            emit(GridDirection::North);
        }
        if cell.left {
            emit(GridDirection::West);
        }
        if coord.row == last && cell.bottom {
            emit(GridDirection::South);
        }
        if coord.col == last && cell.right {
            emit(GridDirection::East);
        }
    }
    segments
}

/// World space sizes used to turn wall segments into boxes.
#[derive(PartialEq, Copy, Clone, Debug, Serialize)]
pub struct WallDimensions {
    pub room_size: f32,
    pub wall_size: f32,
    pub wall_height: f32,
}

impl Default for WallDimensions {
    fn default() -> WallDimensions {
        WallDimensions {
            room_size: 50.0,
            wall_size: 1.0,
            wall_height: 10.0,
        }
    }
}

/// An axis aligned box for one wall. Rows run along x, columns along z, y is up.
#[derive(PartialEq, Copy, Clone, Debug, Serialize)]
pub struct WallBox {
    pub segment: WallSegment,
    pub centre: [f32; 3],
    pub scale: [f32; 3],
}

/// Engine neutral wall geometry: one box per wall segment, cell (r, c) anchored at
/// `(r * pitch, 0, c * pitch)` where `pitch = room_size + wall_size`.
pub fn wall_boxes(grid: &Grid, dimensions: &WallDimensions) -> Vec<WallBox> {
    let pitch = dimensions.room_size + dimensions.wall_size;
    let half = pitch / 2.0;
    let height = dimensions.wall_height;
    let thickness = dimensions.wall_size;

    wall_segments(grid)
        .into_iter()
        .map(|segment| {
            let origin_x = segment.coord.row as f32 * pitch;
            let origin_z = segment.coord.col as f32 * pitch;
            let (offset, scale) = match segment.side {
                GridDirection::North => ([0.0, 0.0, half], [thickness, height, pitch]),
                GridDirection::West => ([half, 0.0, 0.0], [pitch, height, thickness]),
                GridDirection::South => ([pitch, 0.0, half], [thickness, height, pitch]),
                GridDirection::East => ([half, 0.0, pitch], [pitch, height, thickness]),
            };
            WallBox {
                segment,
                centre: [origin_x + offset[0], offset[1], origin_z + offset[2]],
                scale,
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    cell_side_pixels_length: u32,
    wall_colour: Rgb<u8>,
    passage_colour: Rgb<u8>,
    path_colour: Rgb<u8>,
    start_colour: Rgb<u8>,
    end_colour: Rgb<u8>,
    path: Option<Vec<GridCoordinate>>,
    mark_start_end: bool,
    start: Option<GridCoordinate>,
    end: Option<GridCoordinate>,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            cell_side_pixels_length: 10,
            wall_colour: Rgb([0, 0, 0xff]),
            passage_colour: Rgb([0xff, 0xff, 0xff]),
            path_colour: Rgb([0xff, 0xff, 0]),
            start_colour: Rgb([0, 0xff, 0]),
            end_colour: Rgb([0xff, 0, 0]),
            path: None,
            mark_start_end: false,
            start: None,
            end: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    /// Clamped to at least 2 pixels so every cell keeps an interior.
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u32) -> RenderOptionsBuilder {
        self.options.cell_side_pixels_length = cell_side_pixels_length.max(2);
        self
    }
    pub fn wall_colour(mut self, colour: Rgb<u8>) -> RenderOptionsBuilder {
        self.options.wall_colour = colour;
        self
    }
    pub fn passage_colour(mut self, colour: Rgb<u8>) -> RenderOptionsBuilder {
        self.options.passage_colour = colour;
        self
    }
    pub fn path_colour(mut self, colour: Rgb<u8>) -> RenderOptionsBuilder {
        self.options.path_colour = colour;
        self
    }
    pub fn path(mut self, path: Option<Vec<GridCoordinate>>) -> RenderOptionsBuilder {
        self.options.path = path;
        self
    }
    pub fn mark_start_end(mut self, mark_start_end: bool) -> RenderOptionsBuilder {
        self.options.mark_start_end = mark_start_end;
        self
    }
    pub fn start(mut self, start: Option<GridCoordinate>) -> RenderOptionsBuilder {
        self.options.start = start;
        self
    }
    pub fn end(mut self, end: Option<GridCoordinate>) -> RenderOptionsBuilder {
        self.options.end = end;
        self
    }
    pub fn build(self) -> RenderOptions {
        self.options
    }
}

/// Draw the maze as an image, one `cell_side_pixels_length` square per cell.
pub fn render_image(grid: &Grid, options: &RenderOptions) -> Result<RgbImage> {
    let cell_pixels = options.cell_side_pixels_length;
    let side_pixels = (grid.dimension() as u64)
        .checked_mul(u64::from(cell_pixels))
        .and_then(|pixels| pixels.checked_add(1))
        .filter(|&pixels| pixels <= u64::from(u32::max_value()))
        .map(|pixels| pixels as u32);
    let side_pixels = match side_pixels {
        Some(pixels) => pixels,
        None => bail!(ErrorKind::ImageTooLarge(grid.dimension(), cell_pixels)),
    };

    let mut img = RgbImage::from_pixel(side_pixels, side_pixels, options.passage_colour);

    let cell_origin = |coord: GridCoordinate| {
        (coord.col as u32 * cell_pixels, coord.row as u32 * cell_pixels)
    };
    let fill_cell = |img: &mut RgbImage, coord: GridCoordinate, colour: Rgb<u8>| {
        let (x1, y1) = cell_origin(coord);
        for x in (x1 + 1)..(x1 + cell_pixels) {
            for y in (y1 + 1)..(y1 + cell_pixels) {
                img.put_pixel(x, y, colour);
            }
        }
    };

    if let Some(ref path) = options.path {
        for coord in path.iter().filter(|coord| grid.is_valid_coordinate(**coord)) {
            fill_cell(&mut img, *coord, options.path_colour);
        }
    }
    if options.mark_start_end {
        let marks = [(options.start, options.start_colour), (options.end, options.end_colour)];
        for &(mark, colour) in marks.iter() {
            if let Some(coord) = mark.filter(|coord| grid.is_valid_coordinate(*coord)) {
                fill_cell(&mut img, coord, colour);
            }
        }
    }

    for segment in wall_segments(grid) {
        let (x1, y1) = cell_origin(segment.coord);
        let (x2, y2) = (x1 + cell_pixels, y1 + cell_pixels);
        match segment.side {
            GridDirection::North => draw_horizontal_line(&mut img, x1, x2, y1, options.wall_colour),
            GridDirection::South => draw_horizontal_line(&mut img, x1, x2, y2, options.wall_colour),
            GridDirection::West => draw_vertical_line(&mut img, x1, y1, y2, options.wall_colour),
            GridDirection::East => draw_vertical_line(&mut img, x2, y1, y2, options.wall_colour),
        }
    }

    Ok(img)
}

/// Render the maze and write it out as a PNG.
pub fn save_image<P: AsRef<Path>>(grid: &Grid, options: &RenderOptions, path: P) -> Result<()> {
    let img = render_image(grid, options)?;
    img.save(path.as_ref())
        .chain_err(|| format!("Failed to save maze image to {}", path.as_ref().display()))?;
    debug!(path = %path.as_ref().display(), width = img.width(), "Saved maze image");
    Ok(())
}

fn draw_horizontal_line(img: &mut RgbImage, x1: u32, x2: u32, y: u32, colour: Rgb<u8>) {
    for x in x1..=x2 {
        img.put_pixel(x, y, colour);
    }
}

fn draw_vertical_line(img: &mut RgbImage, x: u32, y1: u32, y2: u32, colour: Rgb<u8>) {
    for y in y1..=y2 {
        img.put_pixel(x, y, colour);
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators;

    fn count_sides(segments: &[WallSegment], side: GridDirection) -> usize {
        segments.iter().filter(|segment| segment.side == side).count()
    }

    #[test]
    fn walled_grid_emits_every_wall_once() {
        let g = Grid::new(3).unwrap();
        let segments = wall_segments(&g);
        // n * (n + 1) horizontal walls and as many vertical ones
        assert_eq!(segments.len(), 2 * 3 * 4);
        assert_eq!(count_sides(&segments, GridDirection::North), 9);
        assert_eq!(count_sides(&segments, GridDirection::West), 9);
        assert_eq!(count_sides(&segments, GridDirection::South), 3);
        assert_eq!(count_sides(&segments, GridDirection::East), 3);
    }

    #[test]
    fn bottom_and_right_only_on_the_border() {
        let maze = generators::build(8, Some(17)).unwrap();
        for segment in wall_segments(&maze) {
            match segment.side {
                GridDirection::South => assert_eq!(segment.coord.row, 7),
                GridDirection::East => assert_eq!(segment.coord.col, 7),
                _ => {}
            }
        }
    }

    #[test]
    fn perfect_maze_wall_count() {
        // All possible walls minus one per passage.
        let size = 10;
        let maze = generators::build(size as isize, Some(4)).unwrap();
        let all_walls = 2 * size * (size + 1);
        let passages = size * size - 1;
        assert_eq!(wall_segments(&maze).len(), all_walls - passages);
    }

    #[test]
    fn boxes_follow_segments() {
        let g = Grid::new(2).unwrap();
        let dims = WallDimensions::default();
        let boxes = wall_boxes(&g, &dims);
        assert_eq!(boxes.len(), wall_segments(&g).len());

        let top_of_second_row = boxes.iter()
            .find(|b| b.segment == WallSegment { coord: GridCoordinate::new(1, 0), side: GridDirection::North })
            .unwrap();
        assert_eq!(top_of_second_row.centre, [51.0, 0.0, 25.5]);
        assert_eq!(top_of_second_row.scale, [1.0, 10.0, 51.0]);

        let right_border = boxes.iter()
            .find(|b| b.segment == WallSegment { coord: GridCoordinate::new(0, 1), side: GridDirection::East })
            .unwrap();
        assert_eq!(right_border.centre, [25.5, 0.0, 102.0]);
        assert_eq!(right_border.scale, [51.0, 10.0, 1.0]);
    }

    #[test]
    fn image_size_and_walls() {
        let g = Grid::new(3).unwrap();
        let options = RenderOptionsBuilder::new().cell_side_pixels_length(4).build();
        let img = render_image(&g, &options).unwrap();
        assert_eq!(img.dimensions(), (13, 13));
        let wall = Rgb([0, 0, 0xff]);
        let passage = Rgb([0xff, 0xff, 0xff]);
        assert_eq!(*img.get_pixel(0, 0), wall);
        assert_eq!(*img.get_pixel(12, 12), wall);
        assert_eq!(*img.get_pixel(4, 2), wall);
        assert_eq!(*img.get_pixel(2, 2), passage);
    }

    #[test]
    fn path_and_marks_fill_cells() {
        let g = Grid::new(2).unwrap();
        let gc = |r, c| GridCoordinate::new(r, c);
        let options = RenderOptionsBuilder::new()
            .cell_side_pixels_length(4)
            .path(Some(vec![gc(0, 1)]))
            .mark_start_end(true)
            .start(Some(gc(0, 0)))
            .end(Some(gc(1, 1)))
            .build();
        let img = render_image(&g, &options).unwrap();
        assert_eq!(*img.get_pixel(2, 2), Rgb([0, 0xff, 0]));
        assert_eq!(*img.get_pixel(6, 2), Rgb([0xff, 0xff, 0]));
        assert_eq!(*img.get_pixel(6, 6), Rgb([0xff, 0, 0]));
        assert_eq!(*img.get_pixel(2, 6), Rgb([0xff, 0xff, 0xff]));
    }

    #[test]
    fn huge_images_are_refused() {
        let g = Grid::new(1_000).unwrap();
        let options = RenderOptionsBuilder::new().cell_side_pixels_length(5_000_000).build();
        assert!(render_image(&g, &options).is_err());
    }
}
