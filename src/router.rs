//! Target routing: rank candidate objectives, pick a reachable one, claim it.

use crate::claims::ClaimLedger;
use crate::grid::GridMap;
use crate::objective::{Objective, TargetPath};
use crate::pathfinder::find_path;
use crate::position::Position;
use fnv::FnvHashSet;
use itertools::Itertools;
use log::*;
use std::cmp::Ordering;

/// Distance scaling applied to a candidate's value when ranking scored
/// candidates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouterMode {
    /// Value grows with distance: a far, high-value target outranks a near,
    /// cheap one.
    LongRange,
    /// Value shrinks with distance: whatever is close wins.
    ShortRange,
}

/// A candidate with a raw worth; for diamonds, `points * summon_level`.
#[derive(Clone, Debug)]
pub struct ScoredObjective {
    pub objective: Objective,
    pub value: f64,
}

/// Path to the nearest reachable candidate, with no claim bookkeeping.
///
/// Every candidate gets a full path query; the minimum length wins. The
/// comparison is `<=`, so among equal minima the last candidate scanned
/// wins. Unreachable candidates (including budget exhaustion) are skipped.
pub fn nearest_objective_path(
    grid: &GridMap,
    origin: Position,
    candidates: &[Objective],
    blocked: &FnvHashSet<Position>,
) -> Option<TargetPath> {
    let mut nearest: Option<TargetPath> = None;
    let mut min_distance = usize::MAX;
    for objective in candidates {
        let Some(path) = find_path(grid, origin, objective.position(), blocked) else {
            continue;
        };
        if path.len() <= min_distance {
            min_distance = path.len();
            nearest = Some(TargetPath {
                objective: objective.clone(),
                path,
            });
        }
    }
    nearest
}

/// Claim-aware routing: filters out candidates already claimed by other
/// units, finds the nearest reachable survivor, and registers the claim.
/// Returns `None` when no candidate is both available and reachable; the
/// fallback is the caller's concern.
pub fn route(
    grid: &GridMap,
    origin: Position,
    unit_id: &str,
    candidates: &[Objective],
    blocked: &FnvHashSet<Position>,
    ledger: &mut ClaimLedger,
) -> Option<TargetPath> {
    let available: Vec<Objective> = candidates
        .iter()
        .filter(|o| ledger.is_available_for_unit(unit_id, Some(o.position())))
        .cloned()
        .collect();
    if available.is_empty() {
        trace!("route: no available candidates for {}", unit_id);
        return None;
    }
    let best = nearest_objective_path(grid, origin, &available, blocked)?;
    if !ledger.claim_for_unit(unit_id, &best.objective) {
        return None;
    }
    Some(best)
}

/// Scored routing: rank candidates by value scaled against straight-line
/// distance per `mode`, then walk the ranking and claim the first candidate
/// that is still available and reachable.
pub fn route_by_priority(
    grid: &GridMap,
    origin: Position,
    unit_id: &str,
    candidates: &[ScoredObjective],
    blocked: &FnvHashSet<Position>,
    mode: RouterMode,
    ledger: &mut ClaimLedger,
) -> Option<TargetPath> {
    let ranked = candidates
        .iter()
        .map(|candidate| {
            // Padded distance is never zero, so the short-range division is
            // total.
            let distance = origin.padded_distance_to(candidate.objective.position());
            let score = match mode {
                RouterMode::LongRange => candidate.value * distance,
                RouterMode::ShortRange => candidate.value / distance,
            };
            (score, candidate)
        })
        .sorted_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    for (score, candidate) in ranked {
        let position = candidate.objective.position();
        if !ledger.is_available_for_unit(unit_id, Some(position)) {
            continue;
        }
        let Some(path) = find_path(grid, origin, position, blocked) else {
            continue;
        };
        if ledger.claim_for_unit(unit_id, &candidate.objective) {
            trace!(
                "route_by_priority: {} takes {:?} at score {:.2}",
                unit_id,
                position,
                score
            );
            return Some(TargetPath {
                objective: candidate.objective.clone(),
                path,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileType;

    fn open_tiles(width: usize, height: usize) -> Vec<Vec<TileType>> {
        vec![vec![TileType::Empty; height]; width]
    }

    fn cell(x: i16, y: i16) -> Objective {
        Objective::Cell {
            position: Position::new(x, y),
        }
    }

    fn ledger_for(units: &[&str]) -> ClaimLedger {
        let mut ledger = ClaimLedger::new();
        ledger.reset(units.iter().copied());
        ledger
    }

    fn no_blocks() -> FnvHashSet<Position> {
        FnvHashSet::default()
    }

    #[test]
    fn nearest_candidate_wins() {
        let tiles = open_tiles(8, 8);
        let grid = GridMap::from_tiles(&tiles);
        let found = nearest_objective_path(
            &grid,
            Position::new(0, 0),
            &[cell(6, 0), cell(2, 0), cell(4, 0)],
            &no_blocks(),
        )
        .expect("reachable");
        assert_eq!(found.objective.position(), Position::new(2, 0));
        assert_eq!(found.distance(), 3);
    }

    #[test]
    fn equal_minima_go_to_the_last_candidate() {
        let tiles = open_tiles(8, 8);
        let grid = GridMap::from_tiles(&tiles);
        // Both candidates are 2 steps away; the `<=` scan keeps the later.
        let found = nearest_objective_path(
            &grid,
            Position::new(3, 3),
            &[cell(3, 5), cell(5, 3)],
            &no_blocks(),
        )
        .expect("reachable");
        assert_eq!(found.objective.position(), Position::new(5, 3));
    }

    #[test]
    fn empty_candidate_set_is_none() {
        let tiles = open_tiles(4, 4);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a"]);
        assert!(route(
            &grid,
            Position::new(0, 0),
            "a",
            &[],
            &no_blocks(),
            &mut ledger
        )
        .is_none());
    }

    #[test]
    fn route_claims_the_winner() {
        let tiles = open_tiles(8, 8);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a", "b"]);
        let shared = [cell(4, 4)];

        let first = route(
            &grid,
            Position::new(0, 0),
            "a",
            &shared,
            &no_blocks(),
            &mut ledger,
        )
        .expect("first unit routes");
        assert_eq!(first.objective.position(), Position::new(4, 4));
        assert_eq!(ledger.get_claim("a"), Some(&shared[0]));

        // The same single candidate is now taken: the second unit gets none.
        assert!(route(
            &grid,
            Position::new(7, 7),
            "b",
            &shared,
            &no_blocks(),
            &mut ledger
        )
        .is_none());
        assert_eq!(ledger.get_claim("b"), None);
    }

    #[test]
    fn unreachable_candidates_are_skipped() {
        let tiles = open_tiles(8, 8);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a"]);
        // Wall off (4,4) with a blocked ring; (2,0) stays reachable.
        let blocked: FnvHashSet<Position> = [
            Position::new(3, 4),
            Position::new(5, 4),
            Position::new(4, 3),
            Position::new(4, 5),
        ]
        .into_iter()
        .collect();
        let found = route(
            &grid,
            Position::new(0, 0),
            "a",
            &[cell(4, 4), cell(2, 0)],
            &blocked,
            &mut ledger,
        )
        .expect("fallback candidate");
        assert_eq!(found.objective.position(), Position::new(2, 0));
    }

    #[test]
    fn long_range_mode_prefers_far_high_value() {
        let tiles = open_tiles(12, 12);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a"]);
        let candidates = [
            ScoredObjective {
                objective: cell(1, 0),
                value: 1.0,
            },
            ScoredObjective {
                objective: cell(9, 0),
                value: 10.0,
            },
        ];
        let found = route_by_priority(
            &grid,
            Position::new(0, 0),
            "a",
            &candidates,
            &no_blocks(),
            RouterMode::LongRange,
            &mut ledger,
        )
        .expect("routes");
        assert_eq!(found.objective.position(), Position::new(9, 0));
    }

    #[test]
    fn short_range_mode_prefers_the_close_target() {
        let tiles = open_tiles(12, 12);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a"]);
        let candidates = [
            ScoredObjective {
                objective: cell(1, 0),
                value: 1.0,
            },
            ScoredObjective {
                objective: cell(9, 0),
                value: 2.0,
            },
        ];
        let found = route_by_priority(
            &grid,
            Position::new(0, 0),
            "a",
            &candidates,
            &no_blocks(),
            RouterMode::ShortRange,
            &mut ledger,
        )
        .expect("routes");
        assert_eq!(found.objective.position(), Position::new(1, 0));
    }

    #[test]
    fn priority_routing_skips_claimed_targets() {
        let tiles = open_tiles(12, 12);
        let grid = GridMap::from_tiles(&tiles);
        let mut ledger = ledger_for(&["a", "b"]);
        ledger.claim_for_unit("b", &cell(9, 0));
        let candidates = [
            ScoredObjective {
                objective: cell(1, 0),
                value: 1.0,
            },
            ScoredObjective {
                objective: cell(9, 0),
                value: 10.0,
            },
        ];
        let found = route_by_priority(
            &grid,
            Position::new(0, 0),
            "a",
            &candidates,
            &no_blocks(),
            RouterMode::LongRange,
            &mut ledger,
        )
        .expect("falls through to the free target");
        assert_eq!(found.objective.position(), Position::new(1, 0));
    }
}
