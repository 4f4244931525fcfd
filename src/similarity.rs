//! Visual similarity between two raster images.
//!
//! Both images are reduced to intensity, the second is resampled onto the
//! first one's grid, and similarity is one minus the mean absolute pixel
//! difference normalised to `[0, 1]`:
//!
//! ```text
//! similarity = 1 - sum(|a - b|) / (width_a * height_a * 255)
//! ```

use image::imageops::{self, FilterType};
use image::GrayImage;

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Default similarity threshold for a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Compares images for visual similarity against a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityComparator {
    threshold: f64,
}

impl Default for SimilarityComparator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityComparator {
    /// Create a comparator; images match when similarity is strictly above `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The match threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity score of `b` against `a`, in `[0, 1]`.
    ///
    /// `b` is resized to exactly `a`'s dimensions, distorting its aspect
    /// ratio if needed.
    pub fn similarity(&self, a: &RasterImage, b: &RasterImage) -> Result<f64> {
        gray_similarity(&a.to_gray(), &b.to_gray())
    }

    /// True iff the similarity of `b` against `a` is above the threshold.
    pub fn compare(&self, a: &RasterImage, b: &RasterImage) -> Result<bool> {
        Ok(self.similarity(a, b)? > self.threshold)
    }

    /// Same as [`compare`](Self::compare) for an intensity image prepared by the caller.
    pub(crate) fn compare_gray(&self, a: &GrayImage, b: &RasterImage) -> Result<bool> {
        Ok(gray_similarity(a, &b.to_gray())? > self.threshold)
    }
}

/// One-shot comparison with an explicit threshold.
///
/// # Examples
///
/// ```
/// use docscan::raster::{Channels, RasterImage};
/// use docscan::similarity::compare;
///
/// let image = RasterImage::from_raw(2, 2, Channels::Gray, vec![10, 20, 30, 40]).unwrap();
/// assert!(compare(&image, &image, 0.9).unwrap());
/// ```
pub fn compare(a: &RasterImage, b: &RasterImage, threshold: f64) -> Result<bool> {
    SimilarityComparator::new(threshold).compare(a, b)
}

fn gray_similarity(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    let (width, height) = a.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "similarity is undefined for a zero-area image ({}x{})",
            width, height
        )));
    }
    if b.width() == 0 || b.height() == 0 {
        return Err(Error::InvalidInput(format!(
            "cannot resample a zero-area image ({}x{})",
            b.width(),
            b.height()
        )));
    }

    let resized;
    let b = if b.dimensions() == (width, height) {
        b
    } else {
        resized = imageops::resize(b, width, height, FilterType::Triangle);
        &resized
    };

    let total_difference: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&pa, &pb)| pa.abs_diff(pb) as u64)
        .sum();

    let max_difference = width as f64 * height as f64 * 255.0;
    Ok(1.0 - total_difference as f64 / max_difference)
}
