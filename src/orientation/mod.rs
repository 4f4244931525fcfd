//! Orientation estimation and skew correction for scanned images.
//!
//! Both stages extract edges, vote for straight lines and reduce the line
//! angles to one representative angle. They differ on purpose:
//!
//! - [`OrientationEstimator`] uses [`EdgeThresholds::ESTIMATOR`] and the
//!   **mean** angle, then classifies the page as horizontal or vertical.
//! - [`OrientationCorrector`] uses the sharper [`EdgeThresholds::CORRECTOR`]
//!   and the **median** angle, then rotates the image to cancel the skew.
//!
//! [`EdgeThresholds::ESTIMATOR`]: crate::edges::EdgeThresholds::ESTIMATOR
//! [`EdgeThresholds::CORRECTOR`]: crate::edges::EdgeThresholds::CORRECTOR

mod corrector;
mod estimator;

pub use corrector::{Correction, OrientationCorrector};
pub use estimator::OrientationEstimator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edges::{detect_edges, EdgeThresholds};
use crate::lines::{candidate_angles, vote_lines, LineVoting};
use crate::raster::RasterImage;

/// A line angle in degrees, normalised to `[0, 180)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrientationAngle(f64);

impl OrientationAngle {
    /// Wrap an angle, folding it into `[0, 180)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docscan::orientation::OrientationAngle;
    ///
    /// assert_eq!(OrientationAngle::new(190.0).degrees(), 10.0);
    /// assert_eq!(OrientationAngle::new(-30.0).degrees(), 150.0);
    /// assert_eq!(OrientationAngle::new(180.0).degrees(), 0.0);
    /// ```
    pub fn new(degrees: f64) -> Self {
        let folded = degrees.rem_euclid(180.0);
        // rem_euclid can round up to the modulus for tiny negative inputs
        Self(if folded >= 180.0 { 0.0 } else { folded })
    }

    /// The angle in degrees.
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// True when the angle lies strictly between 45 and 135 degrees.
    pub fn is_horizontal(self) -> bool {
        45.0 < self.0 && self.0 < 135.0
    }
}

impl fmt::Display for OrientationAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

/// Coarse page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "orientation", content = "angle", rename_all = "lowercase")]
pub enum Orientation {
    /// Dominant lines run horizontally (normal angle in `(45, 135)`)
    Horizontal(OrientationAngle),
    /// Dominant lines run vertically
    Vertical(OrientationAngle),
    /// No line hypothesis cleared the vote threshold
    Unknown,
}

impl Orientation {
    /// Classify an aggregated line angle.
    pub fn from_angle(angle: OrientationAngle) -> Self {
        if angle.is_horizontal() {
            Orientation::Horizontal(angle)
        } else {
            Orientation::Vertical(angle)
        }
    }

    /// The aggregated angle, if orientation was determined.
    pub fn angle(&self) -> Option<OrientationAngle> {
        match self {
            Orientation::Horizontal(angle) | Orientation::Vertical(angle) => Some(*angle),
            Orientation::Unknown => None,
        }
    }

    /// True unless no lines were found.
    pub fn is_known(&self) -> bool {
        !matches!(self, Orientation::Unknown)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal(angle) => write!(f, "horizontal orientation ({})", angle),
            Orientation::Vertical(angle) => write!(f, "vertical orientation ({})", angle),
            Orientation::Unknown => f.write_str("could not determine orientation"),
        }
    }
}

/// Grayscale → edges → line votes → angles in degrees.
fn line_angles(image: &RasterImage, edges: EdgeThresholds, voting: LineVoting) -> Vec<f64> {
    let edge_map = detect_edges(&image.to_gray(), edges);
    candidate_angles(&vote_lines(&edge_map, voting))
}
