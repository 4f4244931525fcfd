use crate::edges::EdgeThresholds;
use crate::lines::{AngleAggregation, LineVoting};
use crate::raster::RasterImage;

use super::{line_angles, Orientation, OrientationAngle};

/// Detects the dominant line orientation of an image.
///
/// The mean of all line angles is classified: strictly between 45° and 135°
/// is horizontal, anything else vertical. The mean is coarse; a few stray
/// lines on a multimodal page can drag it across the 45° / 135° boundaries.
///
/// A thin vertical bar is the classic case: its two edges produce lines at 0°
/// and the near-parallel pair also votes for a line at 179°, so the mean of
/// `{0, 0, 179}` is about 59.7° and the bar is reported horizontal. A single
/// vertical edge is reported vertical. Use
/// [`with_aggregation`](Self::with_aggregation) with
/// [`AngleAggregation::Median`] when such outliers matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationEstimator {
    edges: EdgeThresholds,
    voting: LineVoting,
    aggregation: AngleAggregation,
}

impl Default for OrientationEstimator {
    fn default() -> Self {
        Self::new(EdgeThresholds::ESTIMATOR, LineVoting::default())
    }
}

impl OrientationEstimator {
    /// Create an estimator with mean aggregation.
    pub fn new(edges: EdgeThresholds, voting: LineVoting) -> Self {
        Self {
            edges,
            voting,
            aggregation: AngleAggregation::Mean,
        }
    }

    /// Override the angle aggregation strategy.
    pub fn with_aggregation(mut self, aggregation: AngleAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Estimate the orientation; [`Orientation::Unknown`] when no lines are found.
    pub fn estimate(&self, image: &RasterImage) -> Orientation {
        let angles = line_angles(image, self.edges, self.voting);
        match self.aggregation.aggregate(&angles) {
            Some(angle) => {
                let orientation = Orientation::from_angle(OrientationAngle::new(angle));
                log::debug!(
                    "{} lines, {:?} angle {:.2}: {}",
                    angles.len(),
                    self.aggregation,
                    angle,
                    orientation
                );
                orientation
            },
            None => {
                log::debug!("No line hypotheses above threshold {}", self.voting.vote_threshold);
                Orientation::Unknown
            },
        }
    }
}
