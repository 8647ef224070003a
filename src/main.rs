use std::fs::File;
use std::io::prelude::*;
use std::rc::Rc;

use docopt::Docopt;
use serde_derive::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use backtracker_mazes::{
    cells::GridCoordinate,
    generators::MazeBuilder,
    grid::Grid,
    grid_displays::{GridDisplay, PathDisplay, StartEndPointsDisplay},
    pathing,
    renderers,
};

const USAGE: &str = "Mazes

Usage:
    maze_driver -h | --help
    maze_driver [options]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n [default: 20].
    --seed=<s>             Seed the generator, the same seed always gives the same maze.
    --start-row=<r>        Row of the cell carving starts from [default: 0].
    --start-col=<c>        Column of the cell carving starts from [default: 0].
    --end-row=<r>          Row of the end cell. Defaults to the last row.
    --end-col=<c>          Column of the end cell. Defaults to the last column.
    --no-early-exit        Keep branching out of the end cell when carving reaches it.
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --show-path            Show the path from the start to the end cell.
    --mark-start-end       Mark the start 'S' and end 'E' cells.
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --cell-pixels=<n>      Pixel count to render one cell wall in a maze image [default: 10].
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --json-out=<path>      Serialize the wall flags of every cell to a JSON file.
    --wall-boxes=<path>    Serialize the wall geometry (one box per wall) to a JSON file.

With no output path the text rendering is printed. Set RUST_LOG to control log output.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: isize,
    flag_seed: Option<u64>,
    flag_start_row: usize,
    flag_start_col: usize,
    flag_end_row: Option<usize>,
    flag_end_col: Option<usize>,
    flag_no_early_exit: bool,
    flag_text_out: String,
    flag_show_path: bool,
    flag_mark_start_end: bool,
    flag_image_out: String,
    flag_cell_pixels: u32,
    flag_save_edges: String,
    flag_json_out: String,
    flag_wall_boxes: String,
}

mod errors {
    #![allow(deprecated)]
    use error_chain::*;
    error_chain! {

        links {
            Maze(::backtracker_mazes::errors::Error, ::backtracker_mazes::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
            Json(::serde_json::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logging();
    debug!(?args, "Parsed arguments");

    let start = GridCoordinate::new(args.flag_start_row, args.flag_start_col);
    let end = end_point(&args);

    let mut builder = MazeBuilder::new(args.flag_grid_size)
        .start(start)
        .end(if args.flag_no_early_exit { None } else { Some(end) });
    if let Some(seed) = args.flag_seed {
        builder = builder.seed(seed);
    }
    let mut maze_grid = builder.build()?;
    info!(size = maze_grid.dimension(),
          passages = maze_grid.passages_count().0,
          "Generated maze");

    let path = if args.flag_show_path {
        pathing::Distances::new(&maze_grid, start)
            .and_then(|distances| pathing::shortest_path(&maze_grid, &distances, end))
    } else {
        None
    };

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    if !args.flag_json_out.is_empty() {
        let json = serde_json::to_string_pretty(&maze_grid)?;
        write_text_to_file(&json, &args.flag_json_out)
            .chain_err(|| format!("Failed to write maze to json file {}", args.flag_json_out))?;
    }

    if !args.flag_wall_boxes.is_empty() {
        let boxes = renderers::wall_boxes(&maze_grid, &renderers::WallDimensions::default());
        let json = serde_json::to_string_pretty(&boxes)?;
        write_text_to_file(&json, &args.flag_wall_boxes)
            .chain_err(|| format!("Failed to write wall boxes to {}", args.flag_wall_boxes))?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .cell_side_pixels_length(args.flag_cell_pixels)
            .mark_start_end(args.flag_mark_start_end)
            .start(Some(start))
            .end(Some(end))
            .path(path.clone())
            .build();
        renderers::save_image(&maze_grid, &render_options, &args.flag_image_out)?;
        info!(path = %args.flag_image_out, "Wrote maze image");
    }

    let any_file_output = !args.flag_image_out.is_empty() || !args.flag_json_out.is_empty() ||
                          !args.flag_save_edges.is_empty() ||
                          !args.flag_wall_boxes.is_empty();

    if !args.flag_text_out.is_empty() || !any_file_output {

        set_maze_griddisplay(&mut maze_grid, &args, start, end, path.as_ref());

        if args.flag_text_out.is_empty() {
            println!("{}", maze_grid);
        } else {
            write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The end cell from the arguments, missing parts default to the far corner.
fn end_point(maze_args: &MazeArgs) -> GridCoordinate {
    let last = (maze_args.flag_grid_size.max(1) - 1) as usize;
    GridCoordinate::new(maze_args.flag_end_row.unwrap_or(last),
                        maze_args.flag_end_col.unwrap_or(last))
}

/// Show the path when one was asked for and found, otherwise the start and end markers if asked for.
fn set_maze_griddisplay(maze_grid: &mut Grid,
                        maze_args: &MazeArgs,
                        start: GridCoordinate,
                        end: GridCoordinate,
                        path: Option<&Vec<GridCoordinate>>) {

    let display: Option<Rc<dyn GridDisplay>> = match path {
        Some(p) => Some(Rc::new(PathDisplay::new(p))),
        None if maze_args.flag_mark_start_end => {
            Some(Rc::new(StartEndPointsDisplay::new(vec![start], vec![end])))
        }
        None => None,
    };
    maze_grid.set_grid_display(display);
}

fn write_text_to_file(data: &str, file_name: &str) -> std::io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.passages_count().0;
    graph_data.push_str(&format!("{} {}\n", vertices_count, edges_count));

    for (src, dst) in maze_grid.iter_passages() {
        // Passages only ever join cells on the grid.
        if let (Some(index_a), Some(index_b)) = (maze_grid.grid_coordinate_to_index(src),
                                                 maze_grid.grid_coordinate_to_index(dst)) {
            graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
        }
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
