//! Scan quality assessment: blur and resolution tier.
//!
//! Blur is measured as the variance of the discrete Laplacian response of the
//! grayscale image. Sharp scans have strong second derivatives along text and
//! rule lines and therefore a high variance; blurred scans do not.

use std::fmt;

use imageproc::filter::laplacian_filter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Laplacian variance below which an image counts as blurred.
pub const DEFAULT_BLUR_THRESHOLD: f64 = 100.0;

/// Blur verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurQuality {
    /// Laplacian variance under the threshold
    Poor,
    /// Sharp enough
    Good,
}

/// Resolution class of an image.
///
/// Ordered from worst to best, so tiers compare with `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResolutionTier {
    /// Below 640x360
    VeryLow,
    /// At least 640x360
    Low,
    /// At least 1280x720
    Medium,
    /// At least 1920x1080
    High,
}

impl ResolutionTier {
    /// Breakpoints checked from best to worst; both dimensions must reach them.
    const BREAKPOINTS: [(u32, u32, ResolutionTier); 3] = [
        (1920, 1080, ResolutionTier::High),
        (1280, 720, ResolutionTier::Medium),
        (640, 360, ResolutionTier::Low),
    ];

    /// Tier for an image of the given size.
    ///
    /// # Examples
    ///
    /// ```
    /// use docscan::quality::ResolutionTier;
    ///
    /// assert_eq!(ResolutionTier::classify(1920, 1080), ResolutionTier::High);
    /// assert_eq!(ResolutionTier::classify(1919, 1080), ResolutionTier::Medium);
    /// assert_eq!(ResolutionTier::classify(4000, 300), ResolutionTier::VeryLow);
    /// ```
    pub fn classify(width: u32, height: u32) -> Self {
        Self::BREAKPOINTS
            .iter()
            .find(|(min_w, min_h, _)| width >= *min_w && height >= *min_h)
            .map(|(_, _, tier)| *tier)
            .unwrap_or(ResolutionTier::VeryLow)
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResolutionTier::High => "high (1080p or above)",
            ResolutionTier::Medium => "medium (720p)",
            ResolutionTier::Low => "low (360p)",
            ResolutionTier::VeryLow => "very low (below 360p)",
        };
        f.write_str(label)
    }
}

/// Quality verdict for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Blur verdict
    pub blur_quality: BlurQuality,
    /// Variance of the Laplacian response the verdict was drawn from
    pub laplacian_variance: f64,
    /// `(width, height)` in pixels
    pub resolution: (u32, u32),
    /// Resolution class
    pub resolution_tier: ResolutionTier,
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blur = match self.blur_quality {
            BlurQuality::Poor => "poor (blurred)",
            BlurQuality::Good => "good",
        };
        write!(
            f,
            "blur: {} (variance {:.1}), resolution: {}x{}, resolution quality: {}",
            blur, self.laplacian_variance, self.resolution.0, self.resolution.1, self.resolution_tier
        )
    }
}

/// Scores images for blur and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityAssessor {
    blur_threshold: f64,
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_THRESHOLD)
    }
}

impl QualityAssessor {
    /// Create an assessor with the given Laplacian-variance blur threshold.
    pub fn new(blur_threshold: f64) -> Self {
        Self { blur_threshold }
    }

    /// Assess one image.
    pub fn assess(&self, image: &RasterImage) -> Result<QualityReport> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "cannot assess a zero-area image ({}x{})",
                width, height
            )));
        }

        let laplacian_variance = laplacian_variance(image);
        let blur_quality = if laplacian_variance < self.blur_threshold {
            BlurQuality::Poor
        } else {
            BlurQuality::Good
        };

        Ok(QualityReport {
            blur_quality,
            laplacian_variance,
            resolution: (width, height),
            resolution_tier: ResolutionTier::classify(width, height),
        })
    }
}

/// Population variance of the 4-neighbour Laplacian response.
pub fn laplacian_variance(image: &RasterImage) -> f64 {
    let response = laplacian_filter(&image.to_gray());
    let values = response.as_raw();
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n
}
