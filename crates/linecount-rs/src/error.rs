use crate::Axis;
use thiserror::Error;

/// Result type alias for counter configuration.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Errors raised while configuring a counting run. Any of these is fatal to the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("invalid line orientation '{0}', expected one of: horizontal, vertical, both")]
    InvalidOrientation(String),

    #[error("{axis} line position {value} is outside [0, 1]")]
    PositionOutOfRange { axis: Axis, value: f32 },

    #[error("frame dimensions must be positive, got {width}x{height}")]
    InvalidFrameDimension { width: u32, height: u32 },

    #[error("frame skip factor must be at least 1")]
    InvalidFrameSkip,
}
