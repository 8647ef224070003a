// Flood fill distances over the open passages of a maze, and the paths that fall out of them.
//
// Every passage is one step, so a breadth first frontier settles each cell's distance the first
// time it is reached; the distances map doubles as the visited set.

use itertools::Itertools;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use smallvec::SmallVec;

use crate::cells::GridCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Distances from `start_coordinate` to every cell reachable through open passages.
    /// Returns None if the start is not on the grid.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances> {

        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell_coord in &frontier {

                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                let links = grid.links(*cell_coord).unwrap_or_default();
                for link_coordinate in links.iter() {
                    if !distances.contains_key(link_coordinate) {
                        distances.insert(*link_coordinate, distance_to_cell + 1);
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells the flood fill reached, the start included.
    #[inline]
    pub fn reached_count(&self) -> usize {
        self.distances.len()
    }

    /// The cells at the maximum distance from the start, in row-major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}

pub fn shortest_path(grid: &Grid,
                     distances_from_start: &Distances,
                     end_point: GridCoordinate)
                     -> Option<Vec<GridCoordinate>> {

    // The end point is not reachable from start.
    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current_coord = end_point;

    while current_coord != start {

        let closest_to_start = grid.links(current_coord)?
            .iter()
            .filter_map(|coord| {
                distances_from_start.distance_from_start_to(*coord).map(|d| (*coord, d))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer_coord, closer_distance)) if closer_distance < current_distance => {
                current_coord = closer_coord;
                current_distance = closer_distance;
                path.push(current_coord);
            }
            // No linked neighbour gets us any closer, the distances do not match this grid.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// Works only as long as we are looking at a perfect maze, otherwise you get back some arbitrary
/// long path.
pub fn longest_path(grid: &Grid) -> Option<Vec<GridCoordinate>> {
    // Distances to everywhere from an arbitrary start coordinate
    let first_distances = Distances::new(grid, GridCoordinate::new(0, 0))?;

    // The start of the longest path is just the point furthest away from an arbitrary initial point
    let long_path_start_coordinate = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::new(grid, long_path_start_coordinate)?;
    let end_point = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, end_point)
}

/// A perfect maze is a spanning tree over the cells: connected, no loops, N²−1 passages.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = grid.passage_graph();
    graph.edge_count() + 1 == grid.size() &&
    connected_components(&graph) == 1 &&
    !is_cyclic_undirected(&graph)
}
