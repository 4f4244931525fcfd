use image::{Luma, Rgb};
use imageproc::geometric_transformations::{rotate, Interpolation};
use serde::{Deserialize, Serialize};

use crate::edges::EdgeThresholds;
use crate::lines::{AngleAggregation, LineVoting};
use crate::raster::{PixelBuffer, RasterImage};

use super::{line_angles, OrientationAngle};

/// Outcome of a correction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    /// Aggregated line angle the rotation was derived from
    pub line_angle: OrientationAngle,
    /// Applied rotation in degrees, counter-clockwise positive
    pub rotation: f64,
}

/// De-skews images by rotating their dominant lines onto the axes.
///
/// Uses the median line angle, which tolerates outlying lines better than
/// the estimator's mean. A median above 45° is taken as a skewed horizontal
/// line and rotated by `median - 90`; otherwise as a skewed vertical line
/// rotated by `median`. Exposed corners are filled with white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationCorrector {
    edges: EdgeThresholds,
    voting: LineVoting,
    aggregation: AngleAggregation,
}

impl Default for OrientationCorrector {
    fn default() -> Self {
        Self::new(EdgeThresholds::CORRECTOR, LineVoting::default())
    }
}

impl OrientationCorrector {
    /// Create a corrector with median aggregation.
    pub fn new(edges: EdgeThresholds, voting: LineVoting) -> Self {
        Self {
            edges,
            voting,
            aggregation: AngleAggregation::Median,
        }
    }

    /// Override the angle aggregation strategy.
    pub fn with_aggregation(mut self, aggregation: AngleAggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Rotation that would de-skew `image`, or `None` when no lines are found.
    pub fn correction(&self, image: &RasterImage) -> Option<Correction> {
        let angles = line_angles(image, self.edges, self.voting);
        let line_angle = OrientationAngle::new(self.aggregation.aggregate(&angles)?);
        let rotation = rotation_for(line_angle);
        log::debug!(
            "{} lines, {:?} angle {}: rotating by {:.2}°",
            angles.len(),
            self.aggregation,
            line_angle,
            rotation
        );
        Some(Correction {
            line_angle,
            rotation,
        })
    }

    /// De-skewed copy of `image`, or an unmodified copy when no lines are found.
    pub fn correct(&self, image: &RasterImage) -> RasterImage {
        self.correct_with_report(image).0
    }

    /// Like [`correct`](Self::correct), also returning the applied correction.
    pub fn correct_with_report(&self, image: &RasterImage) -> (RasterImage, Option<Correction>) {
        match self.correction(image) {
            Some(correction) => (rotate_ccw(image, correction.rotation), Some(correction)),
            None => {
                log::debug!("Orientation undetermined; image left unchanged");
                (image.clone(), None)
            },
        }
    }
}

/// Map a line angle to the rotation that brings it onto the nearest axis.
///
/// Stays within ±45° for lines near an axis; a near-vertical line reported
/// just below 180° maps to a rotation close to 90°.
fn rotation_for(angle: OrientationAngle) -> f64 {
    let degrees = angle.degrees();
    if degrees > 45.0 {
        degrees - 90.0
    } else {
        degrees
    }
}

/// Rotate counter-clockwise about the pixel center, keeping the canvas size.
fn rotate_ccw(image: &RasterImage, degrees: f64) -> RasterImage {
    let (width, height) = image.dimensions();
    let center = ((width / 2) as f32, (height / 2) as f32);
    // imageproc rotates clockwise for positive angles.
    let theta = -(degrees.to_radians() as f32);

    let buffer = match image.buffer() {
        PixelBuffer::Gray(gray) => {
            PixelBuffer::Gray(rotate(gray, center, theta, Interpolation::Bilinear, Luma([255])))
        },
        PixelBuffer::Rgb(rgb) => PixelBuffer::Rgb(rotate(
            rgb,
            center,
            theta,
            Interpolation::Bilinear,
            Rgb([255, 255, 255]),
        )),
    };
    RasterImage::from_buffer_unchecked(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn test_rotation_band() {
        assert_eq!(rotation_for(OrientationAngle::new(93.0)), 3.0);
        assert_eq!(rotation_for(OrientationAngle::new(88.0)), -2.0);
        assert_eq!(rotation_for(OrientationAngle::new(45.0)), 45.0);
        assert_eq!(rotation_for(OrientationAngle::new(46.0)), -44.0);
        assert_eq!(rotation_for(OrientationAngle::new(2.0)), 2.0);
        assert_eq!(rotation_for(OrientationAngle::new(179.0)), 89.0);
    }

    #[test]
    fn test_blank_image_passes_through() {
        let image = RasterImage::from_gray(GrayImage::from_pixel(120, 80, Luma([255]))).unwrap();
        let (corrected, correction) = OrientationCorrector::default().correct_with_report(&image);
        assert!(correction.is_none());
        assert_eq!(corrected, image);
    }

    #[test]
    fn test_rotation_keeps_canvas_and_fills_white() {
        let image = RasterImage::from_rgb(RgbImage::from_pixel(60, 40, Rgb([0, 0, 0]))).unwrap();
        let rotated = rotate_ccw(&image, 30.0);
        assert_eq!(rotated.dimensions(), (60, 40));
        match rotated.buffer() {
            PixelBuffer::Rgb(rgb) => assert_eq!(rgb.get_pixel(0, 0), &Rgb([255, 255, 255])),
            PixelBuffer::Gray(_) => panic!("rotation changed the channel layout"),
        }
    }
}
