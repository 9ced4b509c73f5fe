use crate::{Direction, Orientation};
use serde::{Deserialize, Serialize};

/// Point-in-time counts of a counting run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountsSnapshot {
    /// Orientation the run was configured with.
    pub orientation: Orientation,
    /// Tracks that crossed the horizontal line moving up.
    pub up: usize,
    /// Tracks that crossed the horizontal line moving down.
    pub down: usize,
    /// Tracks that crossed the vertical line moving left.
    pub left: usize,
    /// Tracks that crossed the vertical line moving right.
    pub right: usize,
    /// Distinct tracks counted on any active line.
    pub total_unique: usize,
}

impl CountsSnapshot {
    /// Returns the count for a single direction
    pub fn count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Returns crossings of the horizontal line in either direction
    pub fn horizontal_total(&self) -> usize {
        self.up + self.down
    }

    /// Returns crossings of the vertical line in either direction
    pub fn vertical_total(&self) -> usize {
        self.left + self.right
    }

    /// Returns true if nothing has been counted
    pub fn is_empty(&self) -> bool {
        self.total_unique == 0
    }
}
