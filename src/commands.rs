//! Wire schema for the commands the bot emits.

use crate::position::Position;
use serde::Serialize;

/// Unit-level actions understood by the game engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandType {
    Spawn,
    Move,
    Attack,
    Drop,
    Summon,
    Vine,
    None,
}

/// One command for one unit, in the engine's wire shape:
/// `{"type": "UNIT", "action": ..., "unitId": ..., "target": ...}`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandAction {
    #[serde(rename = "type")]
    kind: &'static str,
    pub action: CommandType,
    pub unit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Position>,
}

impl CommandAction {
    pub fn new(action: CommandType, unit_id: &str, target: Option<Position>) -> Self {
        CommandAction {
            kind: "UNIT",
            action,
            unit_id: unit_id.to_string(),
            target,
        }
    }

    /// The idle command: the unit does nothing this tick.
    pub fn none(unit_id: &str) -> Self {
        CommandAction::new(CommandType::None, unit_id, None)
    }
}
