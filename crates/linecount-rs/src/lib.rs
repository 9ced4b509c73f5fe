mod bounding_box;
mod counter;
mod crossing;
mod detection;
mod error;
mod line;
mod metrics;
mod observation;
mod sampling;
mod snapshot;

pub use bounding_box::BoundingBox;
pub use counter::LineCrossingCounter;
pub use crossing::{Axis, CrossingEvent, Direction};
pub use detection::{Detection, DetectionFilter};
pub use error::{ConfigurationError, Result};
pub use line::{CountingLines, LineConfig, Orientation};
pub use metrics::{AxisBalance, FlowCategory, FlowMetrics, FlowRates, VideoInfo};
pub use observation::{Point, TrackObservation};
pub use sampling::FrameSampler;
pub use snapshot::CountsSnapshot;
