pub mod bot;
pub mod budget;
pub mod claims;
pub mod commands;
pub mod constants;
pub mod game;
pub mod grid;
pub mod objective;
pub mod pathfinder;
pub mod position;
pub mod router;
pub mod spawn;

pub use bot::Bot;
pub use budget::TickBudget;
pub use claims::ClaimLedger;
pub use commands::{CommandAction, CommandType};
pub use game::{GameTick, TileType};
pub use grid::GridMap;
pub use objective::{Objective, TargetPath};
pub use pathfinder::find_path;
pub use position::Position;
pub use router::{RouterMode, ScoredObjective};
pub use spawn::{SpawnPlan, TieBreak};
