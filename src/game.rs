//! Wire schema for the per-tick world snapshot.
//!
//! Field names and shapes mirror the JSON the game server sends each tick;
//! the bot consumes these types read-only and discards them at tick end.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TileType {
    Empty,
    Wall,
    Spawn,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitLastState {
    pub position_before: Position,
    #[serde(default)]
    pub was_vined_by: Option<String>,
    #[serde(default)]
    pub was_attacked_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub team_id: String,
    pub position: Position,
    #[serde(default)]
    pub path: Vec<Position>,
    pub has_diamond: bool,
    #[serde(default)]
    pub diamond_id: Option<String>,
    pub has_spawned: bool,
    pub is_summoning: bool,
    #[serde(default)]
    pub last_state: Option<UnitLastState>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub score: i32,
    pub units: Vec<Unit>,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diamond {
    pub id: String,
    pub position: Position,
    pub summon_level: u32,
    pub points: u32,
    #[serde(default)]
    pub owner_id: Option<String>,
}

/// Tile grid plus the diamonds on it. Tiles are x-major: `tiles[x][y]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameMap {
    pub tiles: Vec<Vec<TileType>>,
    pub diamonds: Vec<Diamond>,
}

impl GameMap {
    pub fn diamond_by_id(&self, id: &str) -> Option<&Diamond> {
        self.diamonds.iter().find(|d| d.id == id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickGameConfig {
    pub points_per_diamond: u32,
    pub maximum_diamond_summon_level: u32,
    pub initial_diamond_summon_level: u32,
}

impl Default for TickGameConfig {
    fn default() -> Self {
        TickGameConfig {
            points_per_diamond: 1,
            maximum_diamond_summon_level: 5,
            initial_diamond_summon_level: 1,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTick {
    pub tick: u32,
    pub total_tick: u32,
    pub team_id: String,
    pub teams: Vec<Team>,
    pub map: GameMap,
    #[serde(default)]
    pub game_config: TickGameConfig,
    #[serde(default)]
    pub team_play_orderings: HashMap<u32, Vec<String>>,
}

impl GameTick {
    pub fn team_by_id(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// The controlled team for this snapshot.
    pub fn my_team(&self) -> Option<&Team> {
        self.team_by_id(&self.team_id)
    }
}
