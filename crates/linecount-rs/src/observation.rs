use serde::{Deserialize, Serialize};

/// A position in frame-pixel co-ordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }
}

/// A single sighting of a track, as fed to the counter.
///
/// Observations are ephemeral: the counter keeps only the latest position per track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackObservation<T> {
    /// Identifier assigned by the external tracker. Stable for the lifetime of the physical object.
    track_id: T,
    /// Center of the detection in frame-pixel co-ordinates. May lie outside the frame.
    center: Point,
    /// Index of the frame the observation was made in.
    frame_index: u64,
}

impl<T> TrackObservation<T> {
    /// Returns a new TrackObservation
    ///
    /// # Parameters
    ///
    /// * `track_id`: The tracker assigned identifier.
    /// * `center`: Center of the detection.
    /// * `frame_index`: Index of the source frame.
    pub fn new(track_id: T, center: Point, frame_index: u64) -> TrackObservation<T> {
        TrackObservation {
            track_id,
            center,
            frame_index,
        }
    }

    /// Returns the track identifier
    pub fn track_id(&self) -> &T {
        &self.track_id
    }

    /// Returns the observed center
    pub fn center(&self) -> Point {
        self.center
    }

    /// Returns the frame index
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Consumes the observation, returning its parts.
    pub fn into_parts(self) -> (T, Point, u64) {
        (self.track_id, self.center, self.frame_index)
    }
}
