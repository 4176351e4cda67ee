//! Read-only view over the tick map's tile grid.

use crate::constants::NEIGHBORS_4;
use crate::game::{GameMap, TileType};
use crate::position::Position;
use fnv::FnvHashSet;

/// Borrowed accessor over the tile grid for one tick. Classifies cells and
/// bounds-checks coordinates; out-of-range probes return `None` rather than
/// failing. No mutation: temporary obstacles are layered on top at query
/// time via per-call blocked sets.
pub struct GridMap<'a> {
    tiles: &'a [Vec<TileType>],
}

impl<'a> GridMap<'a> {
    pub fn new(map: &'a GameMap) -> GridMap<'a> {
        GridMap { tiles: &map.tiles }
    }

    pub fn from_tiles(tiles: &'a [Vec<TileType>]) -> GridMap<'a> {
        GridMap { tiles }
    }

    pub fn width(&self) -> i16 {
        self.tiles.len() as i16
    }

    pub fn height(&self) -> i16 {
        self.tiles.first().map_or(0, |column| column.len()) as i16
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    pub fn tile_at(&self, pos: Position) -> Option<TileType> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.x as usize][pos.y as usize])
    }

    /// All SPAWN cells, in x-major scan order.
    pub fn spawn_tiles(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().enumerate().flat_map(|(x, column)| {
            column.iter().enumerate().filter_map(move |(y, &tile)| {
                if tile == TileType::Spawn {
                    Some(Position::new(x as i16, y as i16))
                } else {
                    None
                }
            })
        })
    }

    /// First cardinal neighbor of `pos` that is EMPTY and not occupied by a
    /// unit. Used for drop targets and sidesteps.
    pub fn free_adjacent_tile(
        &self,
        pos: Position,
        occupied: &FnvHashSet<Position>,
    ) -> Option<Position> {
        NEIGHBORS_4
            .iter()
            .map(|&(dx, dy)| pos + (dx, dy))
            .find(|&cell| self.tile_at(cell) == Some(TileType::Empty) && !occupied.contains(&cell))
    }
}
