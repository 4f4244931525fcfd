//! Line-voting transform over edge maps.
//!
//! Every edge pixel votes for all `(distance, angle)` line hypotheses passing
//! through it, with 1 pixel distance bins and 1 degree angle bins. Hypotheses
//! whose vote count exceeds the configured threshold are reported.
//!
//! Angles follow the normal-angle convention: a line's angle is the direction
//! of its normal measured from the x-axis, in `[0, 180)`. A vertical line in
//! the image therefore has angle 0 and a horizontal line has angle 90.

use image::GrayImage;
use imageproc::hough::{detect_lines, LineDetectionOptions};
use serde::{Deserialize, Serialize};

use crate::utils::safe_float_cmp;

/// Parameters of the line-voting transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineVoting {
    /// A hypothesis is reported when its votes exceed this count
    pub vote_threshold: u32,
    /// Radius of the neighbourhood in which only the strongest hypothesis survives
    pub suppression_radius: u32,
}

impl Default for LineVoting {
    fn default() -> Self {
        Self {
            vote_threshold: 200,
            suppression_radius: 1,
        }
    }
}

/// A reported line hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineCandidate {
    /// Signed distance of the line from the image origin
    pub distance: f32,
    /// Normal angle in degrees, `[0, 180)`
    pub angle: f64,
}

/// Run the voting transform over a binary edge map.
pub(crate) fn vote_lines(edges: &GrayImage, voting: LineVoting) -> Vec<LineCandidate> {
    let options = LineDetectionOptions {
        // The accumulator reports `votes >= threshold`; hypotheses must exceed it.
        vote_threshold: voting.vote_threshold.saturating_add(1),
        suppression_radius: voting.suppression_radius,
    };
    let lines: Vec<LineCandidate> = detect_lines(edges, options)
        .into_iter()
        .map(|line| LineCandidate {
            distance: line.r,
            angle: line.angle_in_degrees as f64,
        })
        .collect();
    log::debug!(
        "Line voting (threshold {}): {} hypotheses",
        voting.vote_threshold,
        lines.len()
    );
    for line in &lines {
        log::trace!("r = {:.1}, angle = {}", line.distance, line.angle);
    }
    lines
}

/// How a set of line angles collapses into one representative angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleAggregation {
    /// Arithmetic mean; pulled by outlying lines
    Mean,
    /// Median (midpoint of the two central values for even counts)
    Median,
}

impl AngleAggregation {
    /// Aggregate the angles, or `None` when there are none.
    ///
    /// # Examples
    ///
    /// ```
    /// use docscan::lines::AngleAggregation;
    ///
    /// let angles = [0.0, 90.0, 93.0];
    /// assert_eq!(AngleAggregation::Mean.aggregate(&angles), Some(61.0));
    /// assert_eq!(AngleAggregation::Median.aggregate(&angles), Some(90.0));
    /// assert_eq!(AngleAggregation::Median.aggregate(&[]), None);
    /// ```
    pub fn aggregate(self, angles: &[f64]) -> Option<f64> {
        if angles.is_empty() {
            return None;
        }
        match self {
            AngleAggregation::Mean => Some(angles.iter().sum::<f64>() / angles.len() as f64),
            AngleAggregation::Median => {
                let mut sorted = angles.to_vec();
                sorted.sort_by(|a, b| safe_float_cmp(*a, *b));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    Some((sorted[mid - 1] + sorted[mid]) / 2.0)
                } else {
                    Some(sorted[mid])
                }
            },
        }
    }
}

/// Angles of the reported hypotheses, in report order.
pub(crate) fn candidate_angles(lines: &[LineCandidate]) -> Vec<f64> {
    lines.iter().map(|line| line.angle).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn horizontal_edge(width: u32, height: u32, y: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |_, py| if py == y { Luma([255]) } else { Luma([0]) })
    }

    #[test]
    fn test_horizontal_edge_votes_at_ninety() {
        let edges = horizontal_edge(300, 100, 40);
        let lines = vote_lines(&edges, LineVoting::default());
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.angle == 90.0));
        assert!(lines.iter().any(|l| (l.distance - 40.0).abs() <= 1.0));
    }

    #[test]
    fn test_vertical_edge_votes_at_zero() {
        let edges = GrayImage::from_fn(100, 300, |x, _| if x == 30 { Luma([255]) } else { Luma([0]) });
        let lines = vote_lines(&edges, LineVoting::default());
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.angle == 0.0));
    }

    #[test]
    fn test_threshold_bounds_reporting() {
        let edges = horizontal_edge(250, 50, 10);
        assert!(!vote_lines(&edges, LineVoting::default()).is_empty());

        let strict = LineVoting {
            vote_threshold: 260,
            ..LineVoting::default()
        };
        assert!(vote_lines(&edges, strict).is_empty());
    }

    #[test]
    fn test_empty_edge_map() {
        let edges = GrayImage::new(64, 64);
        assert!(vote_lines(&edges, LineVoting::default()).is_empty());
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(AngleAggregation::Median.aggregate(&[10.0, 0.0, 30.0, 20.0]), Some(15.0));
    }

    #[test]
    fn test_mean_and_median_diverge_on_outliers() {
        let angles = [90.0, 90.0, 90.0, 0.0];
        assert_eq!(AngleAggregation::Mean.aggregate(&angles), Some(67.5));
        assert_eq!(AngleAggregation::Median.aggregate(&angles), Some(90.0));
    }
}
