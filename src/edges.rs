//! Gradient edge detection shared by orientation and table analysis.
//!
//! Every caller goes through [`detect_edges`] with its own [`EdgeThresholds`];
//! the orientation estimator, the orientation corrector and the edge-based
//! table detector deliberately use different sensitivity pairs.

use image::GrayImage;
use imageproc::edges::canny;
use serde::{Deserialize, Serialize};

/// Low/high hysteresis thresholds for the gradient edge detector.
///
/// Gradient magnitudes above the larger value start an edge; magnitudes
/// above the smaller value extend one. The pair may be given in either order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    /// First threshold as configured
    pub low: f32,
    /// Second threshold as configured
    pub high: f32,
}

impl EdgeThresholds {
    /// Create a threshold pair.
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// Thresholds used when estimating orientation.
    pub const ESTIMATOR: EdgeThresholds = EdgeThresholds::new(100.0, 200.0);

    /// Sharper thresholds used when correcting orientation.
    pub const CORRECTOR: EdgeThresholds = EdgeThresholds::new(250.0, 200.0);

    /// Thresholds used by the edge-based table detector.
    pub const TABLE: EdgeThresholds = EdgeThresholds::new(100.0, 10.0);

    /// The pair as `(weak, strong)`, swapping a reversed configuration.
    pub fn ordered(&self) -> (f32, f32) {
        if self.low <= self.high {
            (self.low, self.high)
        } else {
            (self.high, self.low)
        }
    }
}

/// Binary edge map of a grayscale image.
///
/// Edge pixels are 255, everything else 0.
pub fn detect_edges(gray: &GrayImage, thresholds: EdgeThresholds) -> GrayImage {
    let (weak, strong) = thresholds.ordered();
    let edges = canny(gray, weak, strong);
    log::debug!(
        "Edge map {}x{} with thresholds ({}, {}): {} edge pixels",
        edges.width(),
        edges.height(),
        weak,
        strong,
        edges.pixels().filter(|p| p[0] > 0).count()
    );
    edges
}
