use serde::{Deserialize, Serialize};
use std::fmt;

/// The line a crossing was detected against.
///
/// * `Horizontal` is the line at `line_y`, crossed by moving up or down.
/// * `Vertical` is the line at `line_x`, crossed by moving left or right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Direction of travel at the moment of crossing. Image co-ordinates grow downwards,
/// so `Up` means `y` decreased through the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the axis this direction belongs to
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Horizontal,
            Direction::Left | Direction::Right => Axis::Vertical,
        }
    }

    /// Returns the opposite direction on the same axis
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

/// A track crossing a counting line, emitted once per track and axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingEvent<T> {
    /// The track that crossed.
    pub track_id: T,
    /// Direction of travel.
    pub direction: Direction,
    /// The line that was crossed.
    pub axis: Axis,
    /// Frame of the observation that completed the crossing.
    pub frame_index: u64,
}

impl<T> CrossingEvent<T> {
    pub fn new(track_id: T, direction: Direction, frame_index: u64) -> CrossingEvent<T> {
        CrossingEvent {
            track_id,
            direction,
            axis: direction.axis(),
            frame_index,
        }
    }
}
