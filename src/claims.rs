//! Per-tick exclusive target claims.

use crate::objective::Objective;
use crate::position::Position;
use fnv::{FnvHashMap, FnvHashSet};

/// Claim table for one tick: which unit has reserved which objective.
///
/// At most one unit may hold a claim on a given position at any instant
/// within a tick. Units are processed sequentially in roster order, so a
/// position claimed by an earlier unit stays unavailable to every later one
/// until the next `reset`. The reverse position index makes the availability
/// check O(1) in the number of units.
#[derive(Default)]
pub struct ClaimLedger {
    roster: FnvHashSet<String>,
    claims: FnvHashMap<String, Objective>,
    by_position: FnvHashMap<Position, String>,
}

impl ClaimLedger {
    pub fn new() -> ClaimLedger {
        ClaimLedger::default()
    }

    /// Drops all claims and installs the roster for a fresh tick. Claims are
    /// only accepted for rostered units.
    pub fn reset<I, S>(&mut self, roster: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster = roster.into_iter().map(Into::into).collect();
        self.claims.clear();
        self.by_position.clear();
    }

    pub fn get_claim(&self, unit_id: &str) -> Option<&Objective> {
        self.claims.get(unit_id)
    }

    /// Whether `unit_id` could claim `position` right now. A `None` position
    /// stands for "no specific target" and is always available. Holding the
    /// claim already counts as available.
    pub fn is_available_for_unit(&self, unit_id: &str, position: Option<Position>) -> bool {
        let Some(position) = position else {
            return true;
        };
        if !self.roster.contains(unit_id) {
            return false;
        }
        match self.by_position.get(&position) {
            None => true,
            Some(owner) => owner == unit_id,
        }
    }

    /// Records the claim iff no other unit holds the objective's position.
    /// Returns false, without mutating state, when the position is taken.
    /// A unit claiming again replaces its previous claim.
    pub fn claim_for_unit(&mut self, unit_id: &str, objective: &Objective) -> bool {
        let position = objective.position();
        if !self.is_available_for_unit(unit_id, Some(position)) {
            return false;
        }
        if let Some(previous) = self.claims.insert(unit_id.to_string(), objective.clone()) {
            self.by_position.remove(&previous.position());
        }
        self.by_position.insert(position, unit_id.to_string());
        true
    }
}
