/// Neighbor offsets for 4-directional (cardinal) movement, in the order the
/// pathfinder expands them. Expansion order feeds the open-set tie-break, so
/// this order is part of the observable search behavior.
pub const NEIGHBORS_4: [(i16, i16); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Node-expansion budget for a single path search. Exhausting the budget is
/// reported the same way as an unreachable goal; the cap keeps the worst-case
/// cost of any one search predictable regardless of map shape.
pub const MAX_EXPANSIONS: usize = 50;

/// Maximum number of spawn cells the spawn optimizer evaluates. Larger spawn
/// regions are downsampled to an evenly spaced subset of this size.
pub const MAX_SPAWN_CANDIDATES: usize = 10;

/// Fraction of the tick's allotted wall-clock time available for decisions.
/// The remainder is headroom for serialization and transport in the driver.
pub const TICK_BUDGET_FRACTION: f64 = 0.9;

/// A diamond holder stops starting new summons when fewer than this many
/// ticks remain; a summon that cannot finish before the game ends is wasted.
pub const SUMMON_CUTOFF_TICKS: u32 = 7;

/// Padded distance under which an enemy on open ground can be attacked.
pub const ATTACK_RADIUS: f64 = 1.5;

/// Padded distance under which a diamond holder drops rather than risks a hit.
pub const DANGER_RADIUS: f64 = 2.0;

/// Added to a diamond's summon level when judging whether an enemy is close
/// enough to interrupt the summon.
pub const SUMMON_SAFETY_MARGIN: u32 = 3;
