use crate::{Axis, CountsSnapshot, Direction, LineConfig, Orientation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share difference above which one direction is considered dominant on an axis.
const DOMINANCE_THRESHOLD: f64 = 0.3;
/// Hourly projection below which flow is considered low.
const LOW_FLOW_PER_HOUR: f64 = 50.0;
/// Hourly projection below which flow is considered medium.
const MEDIUM_FLOW_PER_HOUR: f64 = 150.0;

/// Timing of the analysed video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Frames per second of the source video.
    fps: f64,
    /// Total frames in the source video.
    total_frames: u64,
    /// Frames actually fed to the counter after sampling.
    processed_frames: u64,
}

impl VideoInfo {
    pub fn new(fps: f64, total_frames: u64, processed_frames: u64) -> VideoInfo {
        VideoInfo {
            fps,
            total_frames,
            processed_frames,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn processed_frames(&self) -> u64 {
        self.processed_frames
    }

    /// Returns the duration of the video, zero if the frame rate is unknown
    pub fn duration_seconds(&self) -> f64 {
        if self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_seconds() / 60.0
    }
}

/// Count per unit time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowRates {
    pub per_minute: f64,
    /// Hourly projection of `per_minute`.
    pub per_hour: f64,
}

impl FlowRates {
    /// Returns the rates for `count` crossings over `duration_minutes`. A zero duration gives zero rates.
    pub fn new(count: usize, duration_minutes: f64) -> FlowRates {
        let per_minute = if duration_minutes > 0.0 {
            count as f64 / duration_minutes
        } else {
            0.0
        };
        FlowRates {
            per_minute,
            per_hour: per_minute * 60.0,
        }
    }
}

/// Traffic planning category derived from the hourly projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowCategory {
    Low,
    Medium,
    High,
}

impl FlowCategory {
    pub fn from_hourly(per_hour: f64) -> FlowCategory {
        if per_hour < LOW_FLOW_PER_HOUR {
            FlowCategory::Low
        } else if per_hour < MEDIUM_FLOW_PER_HOUR {
            FlowCategory::Medium
        } else {
            FlowCategory::High
        }
    }
}

impl fmt::Display for FlowCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowCategory::Low => write!(f, "low"),
            FlowCategory::Medium => write!(f, "medium"),
            FlowCategory::High => write!(f, "high"),
        }
    }
}

/// How crossings of one line split between its two directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisBalance {
    /// Neither direction dominates.
    Balanced { axis: Axis },
    /// One direction carries a clearly larger share of the total.
    Dominant { direction: Direction, share: f64 },
}

/// The metrics record of a finished (or in progress) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    pub total_cyclists: usize,
    pub cyclists_up: usize,
    pub cyclists_down: usize,
    pub cyclists_left: usize,
    pub cyclists_right: usize,
    pub cyclists_per_minute: f64,
    pub cyclists_per_hour: f64,
    pub duration_seconds: f64,
    pub duration_minutes: f64,
    pub fps: f64,
    pub total_frames: u64,
    pub processed_frames: u64,
    pub line_config: LineConfig,
}

impl FlowMetrics {
    /// Returns the metrics for a snapshot of a run
    ///
    /// # Parameters
    ///
    /// * `snapshot`: Counts of the run.
    /// * `line_config`: The configuration the run used.
    /// * `video`: Timing of the analysed video.
    pub fn new(snapshot: &CountsSnapshot, line_config: &LineConfig, video: &VideoInfo) -> FlowMetrics {
        let rates = FlowRates::new(snapshot.total_unique, video.duration_minutes());

        FlowMetrics {
            total_cyclists: snapshot.total_unique,
            cyclists_up: snapshot.up,
            cyclists_down: snapshot.down,
            cyclists_left: snapshot.left,
            cyclists_right: snapshot.right,
            cyclists_per_minute: round2(rates.per_minute),
            cyclists_per_hour: round2(rates.per_hour),
            duration_seconds: round2(video.duration_seconds()),
            duration_minutes: round2(video.duration_minutes()),
            fps: video.fps(),
            total_frames: video.total_frames(),
            processed_frames: video.processed_frames(),
            line_config: *line_config,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.line_config.orientation()
    }

    /// Returns the count for a single direction
    pub fn count(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => self.cyclists_up,
            Direction::Down => self.cyclists_down,
            Direction::Left => self.cyclists_left,
            Direction::Right => self.cyclists_right,
        }
    }

    pub fn flow_category(&self) -> FlowCategory {
        FlowCategory::from_hourly(self.cyclists_per_hour)
    }

    /// Returns the directional balance of an axis, `None` if the axis was not counted.
    ///
    /// Shares are taken against the run's total so in `Both` mode the two axes are comparable.
    pub fn balance(&self, axis: Axis) -> Option<AxisBalance> {
        if !self.orientation().includes(axis) {
            return None;
        }

        let (first, second) = match axis {
            Axis::Horizontal => (Direction::Up, Direction::Down),
            Axis::Vertical => (Direction::Left, Direction::Right),
        };

        let share = |direction: Direction| {
            if self.total_cyclists > 0 {
                self.count(direction) as f64 / self.total_cyclists as f64
            } else {
                0.0
            }
        };
        let (first_share, second_share) = (share(first), share(second));

        if (first_share - second_share).abs() > DOMINANCE_THRESHOLD {
            Some(if first_share > second_share {
                AxisBalance::Dominant {
                    direction: first,
                    share: first_share,
                }
            } else {
                AxisBalance::Dominant {
                    direction: second,
                    share: second_share,
                }
            })
        } else {
            Some(AxisBalance::Balanced { axis })
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use crate::*;
    use assert_approx_eq::assert_approx_eq;

    fn snapshot(orientation: Orientation, counts: [usize; 4], total_unique: usize) -> CountsSnapshot {
        CountsSnapshot {
            orientation,
            up: counts[0],
            down: counts[1],
            left: counts[2],
            right: counts[3],
            total_unique,
        }
    }

    #[test]
    fn rates() {
        let rates = FlowRates::new(30, 2.0);
        assert_eq!(rates.per_minute, 15.0);
        assert_eq!(rates.per_hour, 900.0);

        let rates = FlowRates::new(30, 0.0);
        assert_eq!(rates, FlowRates { per_minute: 0.0, per_hour: 0.0 });
    }

    #[test]
    fn video_duration() {
        let video = VideoInfo::new(30.0, 3600, 1200);
        assert_eq!(video.duration_seconds(), 120.0);
        assert_eq!(video.duration_minutes(), 2.0);

        assert_eq!(VideoInfo::new(0.0, 3600, 0).duration_seconds(), 0.0);
    }

    #[test]
    fn metrics_from_snapshot() {
        let config = LineConfig::default();
        let metrics = FlowMetrics::new(
            &snapshot(Orientation::Horizontal, [12, 18, 0, 0], 30),
            &config,
            &VideoInfo::new(30.0, 3600, 3600),
        );

        assert_eq!(metrics.total_cyclists, 30);
        assert_eq!(metrics.cyclists_per_minute, 15.0);
        assert_eq!(metrics.cyclists_per_hour, 900.0);
        assert_eq!(metrics.duration_minutes, 2.0);
        assert_eq!(metrics.flow_category(), FlowCategory::High);
        assert_eq!(metrics.line_config, config);
    }

    #[test]
    fn metrics_are_rounded() {
        // 7 crossings over 3 minutes
        let metrics = FlowMetrics::new(
            &snapshot(Orientation::Horizontal, [3, 4, 0, 0], 7),
            &LineConfig::default(),
            &VideoInfo::new(25.0, 4500, 1500),
        );

        assert_approx_eq!(metrics.cyclists_per_minute, 2.33);
        assert_approx_eq!(metrics.cyclists_per_hour, 140.0);
        assert_approx_eq!(metrics.duration_seconds, 180.0);
        assert_eq!(metrics.flow_category(), FlowCategory::Medium);
    }

    #[test]
    fn flow_category_thresholds() {
        assert_eq!(FlowCategory::from_hourly(0.0), FlowCategory::Low);
        assert_eq!(FlowCategory::from_hourly(49.99), FlowCategory::Low);
        assert_eq!(FlowCategory::from_hourly(50.0), FlowCategory::Medium);
        assert_eq!(FlowCategory::from_hourly(149.99), FlowCategory::Medium);
        assert_eq!(FlowCategory::from_hourly(150.0), FlowCategory::High);
    }

    #[test]
    fn balance() {
        let video = VideoInfo::new(30.0, 1800, 1800);

        let metrics = FlowMetrics::new(
            &snapshot(Orientation::Horizontal, [8, 2, 0, 0], 10),
            &LineConfig::default(),
            &video,
        );
        match metrics.balance(Axis::Horizontal) {
            Some(AxisBalance::Dominant { direction, share }) => {
                assert_eq!(direction, Direction::Up);
                assert_approx_eq!(share, 0.8);
            }
            other => panic!("expected dominant flow, got {other:?}"),
        }
        assert_eq!(metrics.balance(Axis::Vertical), None);

        let metrics = FlowMetrics::new(
            &snapshot(Orientation::Vertical, [0, 0, 5, 4], 9),
            &LineConfig::new(Some(Orientation::Vertical), None, None),
            &video,
        );
        assert_eq!(
            metrics.balance(Axis::Vertical),
            Some(AxisBalance::Balanced { axis: Axis::Vertical })
        );
    }

    #[test]
    fn balance_without_crossings() {
        let metrics = FlowMetrics::new(
            &snapshot(Orientation::Both, [0, 0, 0, 0], 0),
            &LineConfig::new(Some(Orientation::Both), None, None),
            &VideoInfo::new(30.0, 0, 0),
        );

        assert_eq!(metrics.cyclists_per_minute, 0.0);
        assert_eq!(
            metrics.balance(Axis::Horizontal),
            Some(AxisBalance::Balanced { axis: Axis::Horizontal })
        );
        assert_eq!(
            metrics.balance(Axis::Vertical),
            Some(AxisBalance::Balanced { axis: Axis::Vertical })
        );
    }
}
