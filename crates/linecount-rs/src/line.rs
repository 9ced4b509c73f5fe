use crate::{Axis, ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which counting line(s) are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
    Both,
}

impl Orientation {
    /// Returns true if the horizontal line (`line_y`) is counted.
    pub fn includes_horizontal(&self) -> bool {
        matches!(self, Orientation::Horizontal | Orientation::Both)
    }

    /// Returns true if the vertical line (`line_x`) is counted.
    pub fn includes_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical | Orientation::Both)
    }

    /// Returns true if the given axis is counted.
    pub fn includes(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.includes_horizontal(),
            Axis::Vertical => self.includes_vertical(),
        }
    }
}

impl FromStr for Orientation {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "both" => Ok(Orientation::Both),
            _ => Err(ConfigurationError::InvalidOrientation(s.to_string())),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
            Orientation::Both => write!(f, "both"),
        }
    }
}

/// Caller owned line configuration for a counting run.
///
/// Positions are fractions of the frame: `horizontal_position` of the height, `vertical_position` of the width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Which line(s) to count against.
    orientation: Orientation,
    /// Fraction of the frame height where the horizontal line sits.
    horizontal_position: f32,
    /// Fraction of the frame width where the vertical line sits.
    vertical_position: f32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl LineConfig {
    /// Returns a new LineConfig
    ///
    /// # Arguments
    ///
    /// * `orientation`: Which line(s) to count against. Default `Horizontal`.
    /// * `horizontal_position`: Fraction of frame height for the horizontal line. Default `0.5`.
    /// * `vertical_position`: Fraction of frame width for the vertical line. Default `0.5`.
    pub fn new(
        orientation: Option<Orientation>,
        horizontal_position: Option<f32>,
        vertical_position: Option<f32>,
    ) -> LineConfig {
        LineConfig {
            orientation: orientation.unwrap_or_default(),
            horizontal_position: horizontal_position.unwrap_or(0.5),
            vertical_position: vertical_position.unwrap_or(0.5),
        }
    }

    /// Set orientation
    pub fn with_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    /// Set horizontal_position
    pub fn with_horizontal_position(&mut self, horizontal_position: f32) -> &mut Self {
        self.horizontal_position = horizontal_position;
        self
    }

    /// Set vertical_position
    pub fn with_vertical_position(&mut self, vertical_position: f32) -> &mut Self {
        self.vertical_position = vertical_position;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn horizontal_position(&self) -> f32 {
        self.horizontal_position
    }

    pub fn vertical_position(&self) -> f32 {
        self.vertical_position
    }

    /// Checks both position fractions lie within `[0, 1]`.
    ///
    /// Both fractions are checked regardless of orientation so a configuration is valid for any orientation.
    pub fn validate(&self) -> Result<()> {
        check_fraction(Axis::Horizontal, self.horizontal_position)?;
        check_fraction(Axis::Vertical, self.vertical_position)?;
        Ok(())
    }

    /// Resolves the configured fractions into pixel positions for a frame.
    ///
    /// # Parameters
    ///
    /// * `frame_width`: Width of the video frame in pixels.
    /// * `frame_height`: Height of the video frame in pixels.
    pub fn resolve(&self, frame_width: u32, frame_height: u32) -> Result<CountingLines> {
        if frame_width == 0 || frame_height == 0 {
            return Err(ConfigurationError::InvalidFrameDimension {
                width: frame_width,
                height: frame_height,
            });
        }
        self.validate()?;

        Ok(CountingLines {
            orientation: self.orientation,
            line_y: scale(frame_height, self.horizontal_position),
            line_x: scale(frame_width, self.vertical_position),
        })
    }
}

fn check_fraction(axis: Axis, value: f32) -> Result<()> {
    // NaN fails the range check
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::PositionOutOfRange { axis, value })
    }
}

fn scale(dimension: u32, fraction: f32) -> f32 {
    (f64::from(dimension) * f64::from(fraction)).round() as f32
}

/// Counting lines resolved to pixel co-ordinates for one video.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountingLines {
    orientation: Orientation,
    /// Row of the horizontal line.
    line_y: f32,
    /// Column of the vertical line.
    line_x: f32,
}

impl CountingLines {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the horizontal line row if it is active
    pub fn line_y(&self) -> Option<f32> {
        self.orientation.includes_horizontal().then_some(self.line_y)
    }

    /// Returns the vertical line column if it is active
    pub fn line_x(&self) -> Option<f32> {
        self.orientation.includes_vertical().then_some(self.line_x)
    }
}
