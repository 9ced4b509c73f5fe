use std::{collections::HashMap, fmt::Debug, hash::Hash};

use crate::*;
use indexmap::IndexSet;
use log::{debug, info};

/// This is the line-crossing counter.
///
/// It remembers the last position of every track and counts a track at most once per line,
/// in the direction it first crossed.
///
/// # Examples
///
/// ```
/// use linecount_rs::{Direction, LineConfig, LineCrossingCounter, Orientation};
///
/// // count against a horizontal line half way down a 1280x720 frame
/// let config = LineConfig::new(Some(Orientation::Horizontal), Some(0.5), None);
/// let mut counter = LineCrossingCounter::new(config, 1280, 720).unwrap();
///
/// // the first sighting of a track only records its position
/// assert!(counter.observe(1, 100.0, 300.0, 1).is_empty());
///
/// // moving past the line produces a single event
/// let events = counter.observe(1, 100.0, 400.0, 2);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].direction, Direction::Down);
///
/// let snapshot = counter.snapshot();
/// assert_eq!(snapshot.down, 1);
/// assert_eq!(snapshot.total_unique, 1);
/// ```
#[derive(Debug, Clone)]
pub struct LineCrossingCounter<T = usize> {
    /// The caller supplied configuration for this run.
    config: LineConfig,
    /// The configuration resolved against the frame size.
    lines: CountingLines,
    /// The last observed center of every track seen in this run.
    previous_positions: HashMap<T, Point>,
    /// Tracks that crossed the horizontal line moving up.
    crossed_up: IndexSet<T>,
    /// Tracks that crossed the horizontal line moving down.
    crossed_down: IndexSet<T>,
    /// Tracks that crossed the vertical line moving left.
    crossed_left: IndexSet<T>,
    /// Tracks that crossed the vertical line moving right.
    crossed_right: IndexSet<T>,
}

impl<T> LineCrossingCounter<T>
where
    T: Eq + Hash + Clone + Debug,
{
    /// Returns a new LineCrossingCounter ready for a run
    ///
    /// # Arguments
    ///
    /// * `config`: The line configuration.
    /// * `frame_width`: Width of the video frames in pixels.
    /// * `frame_height`: Height of the video frames in pixels.
    pub fn new(
        config: LineConfig,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<LineCrossingCounter<T>> {
        let lines = config.resolve(frame_width, frame_height)?;

        info!(
            "counting {} crossings on {frame_width}x{frame_height} frames (line_y: {:?}, line_x: {:?})",
            config.orientation(),
            lines.line_y(),
            lines.line_x(),
        );

        Ok(LineCrossingCounter {
            config,
            lines,
            previous_positions: HashMap::new(),
            crossed_up: IndexSet::new(),
            crossed_down: IndexSet::new(),
            crossed_left: IndexSet::new(),
            crossed_right: IndexSet::new(),
        })
    }

    /// Reconfigure the counter and start a new run.
    ///
    /// On success all positions and counts are discarded. On failure the counter is left untouched.
    pub fn configure(
        &mut self,
        config: LineConfig,
        frame_width: u32,
        frame_height: u32,
    ) -> Result<()> {
        *self = Self::new(config, frame_width, frame_height)?;
        Ok(())
    }

    /// Return the line configuration
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    /// Return the resolved counting lines
    pub fn lines(&self) -> &CountingLines {
        &self.lines
    }

    /// Return the number of distinct tracks observed so far
    pub fn tracks_seen(&self) -> usize {
        self.previous_positions.len()
    }

    /// Return the last observed position of a track
    pub fn previous_position(&self, track_id: &T) -> Option<Point> {
        self.previous_positions.get(track_id).copied()
    }

    /// Return the tracks counted in a direction, in the order they crossed
    pub fn crossed(&self, direction: Direction) -> &IndexSet<T> {
        match direction {
            Direction::Up => &self.crossed_up,
            Direction::Down => &self.crossed_down,
            Direction::Left => &self.crossed_left,
            Direction::Right => &self.crossed_right,
        }
    }

    /// Feed a single observation of a track.
    ///
    /// # Parameters
    ///
    /// * `track_id`: The tracker assigned identifier.
    /// * `x`, `y`: Center of the detection. Co-ordinates outside the frame are accepted.
    /// * `frame_index`: Index of the frame. Only carried into events, ordering is not enforced.
    ///
    /// # Returns
    ///
    /// The crossings completed by this observation: none, one, or one per axis.
    pub fn observe(
        &mut self,
        track_id: T,
        x: f32,
        y: f32,
        frame_index: u64,
    ) -> Vec<CrossingEvent<T>> {
        let current = Point::new(x, y);

        // always compare against the immediately preceding observation
        let previous = match self.previous_positions.insert(track_id.clone(), current) {
            Some(previous) => previous,
            None => {
                debug!("track {track_id:?} first seen at ({x}, {y}) in frame {frame_index}");
                return Vec::new();
            }
        };

        let mut events = Vec::new();

        if let Some(line_y) = self.lines.line_y() {
            if let Some(direction) =
                crossing(previous.y, current.y, line_y, Direction::Up, Direction::Down)
            {
                events.extend(self.record(&track_id, direction, frame_index));
            }
        }

        if let Some(line_x) = self.lines.line_x() {
            if let Some(direction) =
                crossing(previous.x, current.x, line_x, Direction::Left, Direction::Right)
            {
                events.extend(self.record(&track_id, direction, frame_index));
            }
        }

        events
    }

    /// Feed every observation of a frame, in order.
    pub fn observe_frame<I>(&mut self, observations: I) -> Vec<CrossingEvent<T>>
    where
        I: IntoIterator<Item = TrackObservation<T>>,
    {
        observations
            .into_iter()
            .flat_map(|observation| {
                let (track_id, center, frame_index) = observation.into_parts();
                self.observe(track_id, center.x, center.y, frame_index)
            })
            .collect()
    }

    /// Returns the current counts. Counts never decrease within a run.
    pub fn snapshot(&self) -> CountsSnapshot {
        CountsSnapshot {
            orientation: self.lines.orientation(),
            up: self.crossed_up.len(),
            down: self.crossed_down.len(),
            left: self.crossed_left.len(),
            right: self.crossed_right.len(),
            total_unique: self.total_unique(),
        }
    }

    /// Size of the union of all crossed sets.
    fn total_unique(&self) -> usize {
        // up and down are disjoint, as are left and right
        let horizontal = self.crossed_up.len() + self.crossed_down.len();
        let vertical_only = self
            .crossed_left
            .iter()
            .chain(self.crossed_right.iter())
            .filter(|track_id| {
                !self.crossed_up.contains(*track_id) && !self.crossed_down.contains(*track_id)
            })
            .count();
        horizontal + vertical_only
    }

    fn record(
        &mut self,
        track_id: &T,
        direction: Direction,
        frame_index: u64,
    ) -> Option<CrossingEvent<T>> {
        let (counted, opposite) = match direction {
            Direction::Up => (&mut self.crossed_up, &self.crossed_down),
            Direction::Down => (&mut self.crossed_down, &self.crossed_up),
            Direction::Left => (&mut self.crossed_left, &self.crossed_right),
            Direction::Right => (&mut self.crossed_right, &self.crossed_left),
        };

        // the first crossing of a line decides the direction the track is counted in
        if opposite.contains(track_id) {
            debug!(
                "track {track_id:?} crossed {direction} in frame {frame_index} but is already counted {}",
                direction.opposite()
            );
            return None;
        }

        if !counted.insert(track_id.clone()) {
            return None;
        }

        info!(
            "track {track_id:?} crossed {direction} ({} line) in frame {frame_index}",
            direction.axis()
        );

        Some(CrossingEvent::new(track_id.clone(), direction, frame_index))
    }
}

/// Returns the direction of travel if the step from `previous` to `current` reaches or passes `line`.
///
/// Landing exactly on the line counts as having crossed it; the side of `previous` decides the direction.
fn crossing(
    previous: f32,
    current: f32,
    line: f32,
    decreasing: Direction,
    increasing: Direction,
) -> Option<Direction> {
    if previous > line && current <= line {
        Some(decreasing)
    } else if previous < line && current >= line {
        Some(increasing)
    } else {
        None
    }
}
