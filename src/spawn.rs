//! Spawn cell selection: where to drop a fresh unit so it reaches a good
//! objective fastest.

use crate::constants::NEIGHBORS_4;
use crate::game::TileType;
use crate::grid::GridMap;
use crate::objective::{Objective, TargetPath};
use crate::position::Position;
use crate::router::nearest_objective_path;
use fnv::FnvHashSet;
use log::*;

/// Which spawn cell wins when two yield equal path lengths.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// Strict `<`: the first evaluated minimum is kept.
    FirstMin,
    /// `<=`: the last evaluated minimum is kept.
    LastMin,
}

/// The chosen spawn cell and the objective path that justified it.
#[derive(Clone, Debug)]
pub struct SpawnPlan {
    pub spawn: Position,
    pub target_path: TargetPath,
}

/// Every SPAWN cell a fresh unit could actually leave: at least one EMPTY
/// cardinal neighbor. When there are more than `max`, an evenly spaced
/// subset of at most `max` cells is kept so the optimizer's cost stays
/// bounded on maps with large spawn regions.
pub fn spawn_candidates(grid: &GridMap, max: usize) -> Vec<Position> {
    let cells: Vec<Position> = grid
        .spawn_tiles()
        .filter(|&cell| {
            NEIGHBORS_4
                .iter()
                .any(|&(dx, dy)| grid.tile_at(cell + (dx, dy)) == Some(TileType::Empty))
        })
        .collect();

    if max == 0 || cells.len() <= max {
        return cells;
    }
    let stride = cells.len().div_ceil(max);
    let sampled: Vec<Position> = cells.into_iter().step_by(stride).collect();
    debug!("spawn candidates downsampled to {} cells", sampled.len());
    sampled
}

/// Evaluates every candidate spawn cell by routing from it to the nearest
/// reachable objective, and keeps the cell with the globally shortest
/// combined path. Returns `None` when no spawn cell reaches any objective.
pub fn optimal_spawn(
    grid: &GridMap,
    spawn_cells: &[Position],
    candidates: &[Objective],
    blocked: &FnvHashSet<Position>,
    tie_break: TieBreak,
) -> Option<SpawnPlan> {
    let mut best: Option<SpawnPlan> = None;
    let mut min_distance = usize::MAX;

    for &spawn in spawn_cells {
        let Some(target_path) = nearest_objective_path(grid, spawn, candidates, blocked) else {
            continue;
        };
        let distance = target_path.distance();
        let better = match tie_break {
            TieBreak::FirstMin => distance < min_distance,
            TieBreak::LastMin => distance <= min_distance,
        };
        if better {
            min_distance = distance;
            best = Some(SpawnPlan { spawn, target_path });
        }
    }

    best
}
