//! Cooperative wall-clock budget for one tick of decisions.

use crate::constants::TICK_BUDGET_FRACTION;
use std::time::{Duration, Instant};

/// Soft deadline for a tick. The bot checks it between units, never inside a
/// path search; individual searches are kept cheap by the expansion budget,
/// so no preemptive cancellation is needed. When the budget runs out the
/// commands produced so far are returned and the remaining units sit the
/// tick out.
pub struct TickBudget {
    should_continue: Box<dyn Fn() -> bool>,
}

impl TickBudget {
    pub fn new<F: Fn() -> bool + 'static>(should_continue: F) -> TickBudget {
        TickBudget {
            should_continue: Box::new(should_continue),
        }
    }

    /// Unlimited budget (for offline runs and tests).
    pub fn unlimited() -> TickBudget {
        TickBudget::new(|| true)
    }

    /// Budget spanning the standard fraction of the tick's allotted time,
    /// measured from now.
    pub fn for_tick(allotted: Duration) -> TickBudget {
        let deadline = Instant::now() + allotted.mul_f64(TICK_BUDGET_FRACTION);
        TickBudget::new(move || Instant::now() < deadline)
    }

    /// True while there is budget remaining to keep working.
    pub fn has_budget(&self) -> bool {
        (self.should_continue)()
    }
}
