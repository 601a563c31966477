//! Grid positions within a room.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A tile coordinate within the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to `other` (diagonal steps count as one).
    pub const fn range_to(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Whether `other` is within `range` tiles.
    pub const fn in_range_to(self, other: Self, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// The adjacent tile one step closer to `target`.
    ///
    /// Returns `self` when already at `target`.
    pub fn step_toward(self, target: Self) -> Self {
        Self {
            x: step_axis(self.x, target.x),
            y: step_axis(self.y, target.y),
        }
    }
}

fn step_axis(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => from.saturating_add(1),
        Ordering::Less => from.saturating_sub(1),
        Ordering::Equal => from,
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
