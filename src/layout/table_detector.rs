//! Table region detection using contour analysis.
//!
//! This module finds candidate table regions in a raster image by extracting
//! the outermost contours of a binary map and taking their bounding boxes.
//! Two strategies build the binary map:
//!
//! - [`DetectionStrategy::Threshold`]: inverse binary threshold, so dark ink
//!   becomes foreground. Every outer contour is reported.
//! - [`DetectionStrategy::Edge`]: Gaussian blur followed by edge detection.
//!   Bounding boxes are then filtered by an empirical table-shape heuristic.
//!
//! Regions are returned in contour discovery order (a raster scan for the
//! first pixel of each contour), not sorted by position.

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};

use crate::edges::{detect_edges, EdgeThresholds};
use crate::geometry::Rectangle;
use crate::raster::RasterImage;

/// How the binary map for contour extraction is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Inverse intensity threshold, no shape filtering
    #[default]
    Threshold,
    /// Blur + edge detection, with shape filtering
    Edge,
}

/// Reading of the height clause in the edge-strategy shape filter.
///
/// The tuned filter was written as `w > 250 or 200 < h > 150`, a chained
/// comparison that reduces to `h > 200`. It most likely meant the band
/// `150 < h < 200`. The literal reading is the default until that intent is
/// confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightFilter {
    /// `h > 200 and h > 150`, i.e. `h > 200`
    #[default]
    Literal,
    /// `150 < h < 200`
    Band,
}

impl HeightFilter {
    fn accepts(self, height: f64) -> bool {
        match self {
            HeightFilter::Literal => 200.0 < height && height > 150.0,
            HeightFilter::Band => 150.0 < height && height < 200.0,
        }
    }
}

/// Parameters for [`TableRegionDetector`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDetectorConfig {
    /// Binary map strategy
    pub strategy: DetectionStrategy,
    /// Intensity cutoff for the threshold strategy; pixels at or below it are ink
    pub binary_threshold: u8,
    /// Gaussian sigma for the edge strategy (1.1 is the sigma of a 5×5 kernel)
    pub blur_sigma: f32,
    /// Edge-detector thresholds for the edge strategy
    pub edges: EdgeThresholds,
    /// Height clause of the edge-strategy shape filter
    pub height_filter: HeightFilter,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::Threshold,
            binary_threshold: 128,
            blur_sigma: 1.1,
            edges: EdgeThresholds::TABLE,
            height_filter: HeightFilter::Literal,
        }
    }
}

/// Extracts candidate table rectangles from an image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableRegionDetector {
    config: TableDetectorConfig,
}

impl TableRegionDetector {
    /// Create a detector from explicit parameters.
    ///
    /// A blur sigma that is not a positive finite number is replaced by the
    /// default.
    pub fn new(mut config: TableDetectorConfig) -> Self {
        if !config.blur_sigma.is_finite() || config.blur_sigma <= 0.0 {
            let fallback = TableDetectorConfig::default().blur_sigma;
            log::warn!(
                "Invalid blur sigma {}, using {}",
                config.blur_sigma,
                fallback
            );
            config.blur_sigma = fallback;
        }
        Self { config }
    }

    /// Threshold strategy with default parameters.
    pub fn threshold() -> Self {
        Self::new(TableDetectorConfig::default())
    }

    /// Edge strategy with default parameters.
    pub fn edge() -> Self {
        Self::new(TableDetectorConfig {
            strategy: DetectionStrategy::Edge,
            ..TableDetectorConfig::default()
        })
    }

    /// Parameters in use.
    pub fn config(&self) -> &TableDetectorConfig {
        &self.config
    }

    /// Detect table regions; empty when nothing qualifies.
    pub fn detect(&self, image: &RasterImage) -> Vec<Rectangle> {
        let gray = image.to_gray();
        match self.config.strategy {
            DetectionStrategy::Threshold => {
                let binary = inverse_threshold(&gray, self.config.binary_threshold);
                let regions = external_contour_boxes(&binary);
                log::debug!("Threshold strategy: {} regions", regions.len());
                regions
            },
            DetectionStrategy::Edge => {
                let blurred = gaussian_blur_f32(&*gray, self.config.blur_sigma);
                let edges = detect_edges(&blurred, self.config.edges);
                let candidates = external_contour_boxes(&edges);
                let total = candidates.len();
                let regions: Vec<Rectangle> = candidates
                    .into_iter()
                    .filter(|rect| is_table_shaped(rect, self.config.height_filter))
                    .collect();
                log::debug!("Edge strategy: kept {} of {} regions", regions.len(), total);
                regions
            },
        }
    }
}

/// Ink (intensity at or below `threshold`) becomes 255, paper becomes 0.
fn inverse_threshold(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

/// Bounding boxes of the outermost contours of the non-zero regions.
fn external_contour_boxes(binary: &GrayImage) -> Vec<Rectangle> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(|contour| Rectangle::bounding(contour.points.iter().map(|p| (p.x, p.y))))
        .collect()
}

/// Empirical table-shape filter for the edge strategy.
///
/// `(w > 250 or <height clause>) and 15 * w / h > 55`
fn is_table_shaped(rect: &Rectangle, height_filter: HeightFilter) -> bool {
    let width = rect.width() as f64;
    let height = rect.height() as f64;
    let aspect_ratio = 15.0 * width / height;
    (width > 250.0 || height_filter.accepts(height)) && aspect_ratio > 55.0
}
