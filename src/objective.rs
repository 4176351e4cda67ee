//! Objectives a unit can be routed toward, and the paths that reach them.

use crate::game::{Diamond, Unit};
use crate::position::Position;

/// Anything worth walking to: a collectible, an enemy unit, a fixed corner
/// point, or a bare destination cell. Claim bookkeeping compares objectives
/// by position, not by the entity behind them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Objective {
    Diamond { id: String, position: Position },
    Unit { id: String, position: Position },
    Corner { position: Position },
    /// A destination with no backing entity, e.g. a distance probe.
    Cell { position: Position },
}

impl Objective {
    pub fn diamond(diamond: &Diamond) -> Objective {
        Objective::Diamond {
            id: diamond.id.clone(),
            position: diamond.position,
        }
    }

    pub fn unit(unit: &Unit) -> Objective {
        Objective::Unit {
            id: unit.id.clone(),
            position: unit.position,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Objective::Diamond { position, .. }
            | Objective::Unit { position, .. }
            | Objective::Corner { position }
            | Objective::Cell { position } => *position,
        }
    }
}

/// An objective together with the full path to it, start and goal cells
/// inclusive.
#[derive(Clone, Debug)]
pub struct TargetPath {
    pub objective: Objective,
    pub path: Vec<Position>,
}

impl TargetPath {
    /// Path length as a cell count (both endpoints included).
    pub fn distance(&self) -> usize {
        self.path.len()
    }

    /// The cell to step onto this tick, or `None` for a single-cell path.
    pub fn next_step(&self) -> Option<Position> {
        self.path.get(1).copied()
    }
}
