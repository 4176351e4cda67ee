//! Bounded A* over the tick map.
//!
//! The search is 4-directional with uniform step cost and a squared
//! Euclidean heuristic. The heuristic overestimates, so the result is not
//! guaranteed globally optimal on contorted maps; on the small open maps the
//! game uses it produces shortest or near-shortest paths, and the strong goal
//! pull keeps expansion counts low. Each query carries its own set of blocked
//! cells layered over the immutable grid, and gives up after a fixed number
//! of node expansions so the worst case stays cheap.

use crate::constants::{MAX_EXPANSIONS, NEIGHBORS_4};
use crate::game::TileType;
use crate::grid::GridMap;
use crate::position::Position;
use fnv::FnvHashSet;
use log::*;

struct Node {
    position: Position,
    parent: Option<usize>,
    g: u32,
    f: i64,
}

/// Shortest walkable path from `start` to `goal` inclusive, or `None` when
/// the goal is unreachable, the expansion budget runs out, or `start == goal`
/// (routing to the cell a unit already stands on is defined as no path).
///
/// SPAWN tiles are walkable only when `start` is itself a SPAWN tile: units
/// may move within spawn territory and step out of it, but a unit in the
/// field cannot cut through spawn. Cells in `blocked` are never walkable.
pub fn find_path(
    grid: &GridMap,
    start: Position,
    goal: Position,
    blocked: &FnvHashSet<Position>,
) -> Option<Vec<Position>> {
    find_path_bounded(grid, start, goal, blocked, MAX_EXPANSIONS)
}

pub fn find_path_bounded(
    grid: &GridMap,
    start: Position,
    goal: Position,
    blocked: &FnvHashSet<Position>,
    max_expansions: usize,
) -> Option<Vec<Position>> {
    if start == goal {
        return None;
    }

    let start_on_spawn = grid.tile_at(start) == Some(TileType::Spawn);

    let mut nodes = vec![Node {
        position: start,
        parent: None,
        g: 0,
        f: 0,
    }];
    let mut open: Vec<usize> = vec![0];
    let mut closed: FnvHashSet<Position> = FnvHashSet::default();
    let mut expansions = 0usize;

    while !open.is_empty() {
        if expansions >= max_expansions {
            trace!(
                "search {:?} -> {:?} exhausted {} expansions",
                start,
                goal,
                expansions
            );
            return None;
        }
        expansions += 1;

        // Linear scan with strict `<`: on equal f the earliest-inserted open
        // node wins, which makes tie-breaking reproducible.
        let mut best = 0;
        for index in 1..open.len() {
            if nodes[open[index]].f < nodes[open[best]].f {
                best = index;
            }
        }
        let current = open.remove(best);
        let current_pos = nodes[current].position;
        closed.insert(current_pos);

        if current_pos == goal {
            let mut path = Vec::new();
            let mut cursor = Some(current);
            while let Some(index) = cursor {
                path.push(nodes[index].position);
                cursor = nodes[index].parent;
            }
            path.reverse();
            return Some(path);
        }

        for &(dx, dy) in &NEIGHBORS_4 {
            let next = current_pos + (dx, dy);
            if !walkable(grid, next, start_on_spawn, blocked) {
                continue;
            }
            if closed.contains(&next) {
                continue;
            }
            let g = nodes[current].g + 1;
            if open
                .iter()
                .any(|&i| nodes[i].position == next && nodes[i].g <= g)
            {
                continue;
            }
            let f = g as i64 + next.squared_distance_to(goal);
            nodes.push(Node {
                position: next,
                parent: Some(current),
                g,
                f,
            });
            open.push(nodes.len() - 1);
        }
    }

    None
}

fn walkable(
    grid: &GridMap,
    cell: Position,
    start_on_spawn: bool,
    blocked: &FnvHashSet<Position>,
) -> bool {
    if blocked.contains(&cell) {
        return false;
    }
    match grid.tile_at(cell) {
        Some(TileType::Empty) => true,
        // Spawn territory acts as wall for units that did not start in it.
        Some(TileType::Spawn) => start_on_spawn,
        Some(TileType::Wall) | None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiles_from_rows(rows: &[&str]) -> Vec<Vec<TileType>> {
        let width = rows[0].len();
        (0..width)
            .map(|x| {
                rows.iter()
                    .map(|row| match row.as_bytes()[x] {
                        b'#' => TileType::Wall,
                        b'S' => TileType::Spawn,
                        _ => TileType::Empty,
                    })
                    .collect()
            })
            .collect()
    }

    fn no_blocks() -> FnvHashSet<Position> {
        FnvHashSet::default()
    }

    #[test]
    fn open_grid_path_is_manhattan_optimal() {
        let tiles = tiles_from_rows(&[".....", ".....", ".....", ".....", "....."]);
        let grid = GridMap::from_tiles(&tiles);
        for (start, goal) in [
            (Position::new(0, 0), Position::new(4, 4)),
            (Position::new(2, 1), Position::new(0, 3)),
            (Position::new(4, 0), Position::new(0, 0)),
        ] {
            let path = find_path(&grid, start, goal, &no_blocks()).expect("reachable");
            assert_eq!(path[0], start);
            assert_eq!(*path.last().unwrap(), goal);
            assert_eq!(path.len() as u32, 1 + start.manhattan_distance_to(goal));
        }
    }

    #[test]
    fn matches_oracle_on_walled_grid() {
        let rows = ["......", ".####.", "......", ".#.#..", "......"];
        let tiles = tiles_from_rows(&rows);
        let grid = GridMap::from_tiles(&tiles);
        let start = Position::new(0, 0);
        let goal = Position::new(5, 4);

        let path = find_path(&grid, start, goal, &no_blocks()).expect("reachable");

        // Reference optimal length from the pathfinding crate's A*.
        let oracle = pathfinding::directed::astar::astar(
            &(start.x, start.y),
            |&(x, y)| {
                NEIGHBORS_4
                    .iter()
                    .filter_map(|&(dx, dy)| {
                        let cell = Position::new(x + dx, y + dy);
                        match grid.tile_at(cell) {
                            Some(TileType::Empty) => Some(((cell.x, cell.y), 1u32)),
                            _ => None,
                        }
                    })
                    .collect::<Vec<_>>()
            },
            |&(x, y)| Position::new(x, y).manhattan_distance_to(goal),
            |&(x, y)| x == goal.x && y == goal.y,
        )
        .expect("oracle path");

        assert_eq!(path.len() as u32, oracle.1 + 1);
    }

    #[test]
    fn start_equals_goal_is_no_path() {
        let tiles = tiles_from_rows(&["..", ".."]);
        let grid = GridMap::from_tiles(&tiles);
        let cell = Position::new(1, 1);
        assert!(find_path(&grid, cell, cell, &no_blocks()).is_none());
    }

    #[test]
    fn blocked_cell_closes_the_only_corridor() {
        let rows = ["...", "###", "..."];
        let tiles = tiles_from_rows(&rows);
        let grid = GridMap::from_tiles(&tiles);
        assert!(find_path(
            &grid,
            Position::new(0, 0),
            Position::new(0, 2),
            &no_blocks()
        )
        .is_none());
    }

    #[test]
    fn blocked_cell_forces_a_detour() {
        let tiles = tiles_from_rows(&["...", "...", "..."]);
        let grid = GridMap::from_tiles(&tiles);
        let start = Position::new(0, 1);
        let goal = Position::new(2, 1);

        let direct = find_path(&grid, start, goal, &no_blocks()).expect("direct");
        assert_eq!(direct.len(), 3);

        let mut blocked = FnvHashSet::default();
        blocked.insert(Position::new(1, 1));
        let detour = find_path(&grid, start, goal, &blocked).expect("detour");
        assert_eq!(detour.len(), 5);
        assert!(!detour.contains(&Position::new(1, 1)));
    }

    #[test]
    fn blocking_every_route_returns_none() {
        let tiles = tiles_from_rows(&["...", "...", "..."]);
        let grid = GridMap::from_tiles(&tiles);
        let blocked: FnvHashSet<Position> =
            [Position::new(1, 0), Position::new(1, 1), Position::new(1, 2)]
                .into_iter()
                .collect();
        assert!(find_path(
            &grid,
            Position::new(0, 1),
            Position::new(2, 1),
            &blocked
        )
        .is_none());
    }

    #[test]
    fn spawn_tiles_wall_off_field_units() {
        // The only corridor to the goal runs through spawn territory.
        let rows = [".S.", ".S.", ".S."];
        let tiles = tiles_from_rows(&rows);
        let grid = GridMap::from_tiles(&tiles);
        assert!(find_path(
            &grid,
            Position::new(0, 1),
            Position::new(2, 1),
            &no_blocks()
        )
        .is_none());
    }

    #[test]
    fn spawn_start_traverses_spawn_tiles() {
        let rows = ["SS.", "...", "..."];
        let tiles = tiles_from_rows(&rows);
        let grid = GridMap::from_tiles(&tiles);
        let path = find_path(
            &grid,
            Position::new(0, 0),
            Position::new(2, 0),
            &no_blocks(),
        )
        .expect("spawn exit");
        assert_eq!(path.len(), 3);
        assert_eq!(path[1], Position::new(1, 0));
    }

    #[test]
    fn expansion_budget_is_enforced() {
        // A single 60-cell corridor needs more than MAX_EXPANSIONS pops even
        // though a path exists.
        let row: String = ".".repeat(60);
        let tiles = tiles_from_rows(&[row.as_str()]);
        let grid = GridMap::from_tiles(&tiles);
        let start = Position::new(0, 0);
        let goal = Position::new(59, 0);

        assert!(find_path(&grid, start, goal, &no_blocks()).is_none());
        let unbounded =
            find_path_bounded(&grid, start, goal, &no_blocks(), 10_000).expect("within budget");
        assert_eq!(unbounded.len(), 60);
    }
}
