use std::fmt;

use crate::cells::{GridCoordinate, GridDirection};
use crate::grid::Grid;
use crate::pathing::Distances;
use crate::utils::{self, FnvHashSet};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from("   ")
    }
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &[GridCoordinate]) -> Self {
        let mut on_path_coordinates = utils::fnv_hashset(path.len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: Vec<GridCoordinate>,
    end_coordinates: Vec<GridCoordinate>,
}
impl StartEndPointsDisplay {
    pub fn new(starts: Vec<GridCoordinate>, ends: Vec<GridCoordinate>) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.start_coordinates.contains(&coord) {
            String::from(" S ")
        } else if self.end_coordinates.contains(&coord) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";
        let default_cell_body = String::from("   ");

        let side_count = self.dimension();

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = self.iter_row().next() {
            for (index, coord) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                let is_east_open = self.is_neighbour_linked(*coord, GridDirection::East);
                if is_east_open {
                    output.push_str(WALL_LR);
                } else if index == side_count - 1 {
                    output.push_str(WALL_LD);
                } else {
                    output.push_str(WALL_LRD);
                }
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {

            let is_last_row = index_row == side_count - 1;

            // The west most boundary of the row. The top section of the cell is done by the
            // previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::new();

            for (index_column, cell_coord) in row.into_iter().enumerate() {

                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    if self.is_neighbour_linked(cell_coord, direction) {
                        passage_clear_text
                    } else {
                        blocking_wall_text
                    }
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == side_count - 1;
                let east_open = self.is_neighbour_linked(cell_coord, GridDirection::East);
                let south_open = self.is_neighbour_linked(cell_coord, GridDirection::South);

                // Each cell uses the southern wall of the cell above it as its own northern wall,
                // so only the cell body, its eastern boundary and its southern boundary are drawn.
                let east_boundary = render_cell_side(GridDirection::East, " ", WALL_UD);

                if let Some(ref displayer) = *self.grid_display() {
                    row_middle_section_render.push_str(displayer.render_cell_body(cell_coord).as_str());
                } else {
                    row_middle_section_render.push_str(default_cell_body.as_str());
                }
                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(GridDirection::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                    (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                    (false, false) => {
                        let access_se_from_east =
                            self.neighbour_at_direction(cell_coord, GridDirection::East)
                                .map_or(false, |c| self.is_neighbour_linked(c, GridDirection::South));
                        let access_se_from_south =
                            self.neighbour_at_direction(cell_coord, GridDirection::South)
                                .map_or(false, |c| self.is_neighbour_linked(c, GridDirection::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (show_left_section,
                               show_right_section,
                               show_up_section,
                               show_down_section) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(row_middle_section_render.as_ref());
            output.push('\n');
            output.push_str(row_bottom_section_render.as_ref());
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
