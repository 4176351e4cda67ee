use serde::{Deserialize, Serialize};

/// Integer cell coordinate on the tick map. Equality and hashing are by
/// value; validity of a coordinate depends entirely on the map it is probed
/// against.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    pub fn new(x: i16, y: i16) -> Position {
        Position { x, y }
    }

    pub fn manhattan_distance_to(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs() as u32 + (self.y - other.y).unsigned_abs() as u32
    }

    /// Squared Euclidean distance. Used as the search heuristic.
    #[inline]
    pub fn squared_distance_to(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }

    pub fn distance_to(self, other: Self) -> f64 {
        (self.squared_distance_to(other) as f64).sqrt()
    }

    /// Euclidean distance with a 0.1 pad on each axis. The pad keeps the
    /// value strictly positive for identical cells and pushes diagonal
    /// adjacency just past the cardinal case, which the tactical radii
    /// (`ATTACK_RADIUS`, `DANGER_RADIUS`) are calibrated against.
    pub fn padded_distance_to(self, other: Self) -> f64 {
        let dx = (self.x - other.x).abs() as f64 + 0.1;
        let dy = (self.y - other.y).abs() as f64 + 0.1;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::ops::Add<(i16, i16)> for Position {
    type Output = Self;
    fn add(self, other: (i16, i16)) -> Self {
        Self {
            x: self.x + other.0,
            y: self.y + other.1,
        }
    }
}
