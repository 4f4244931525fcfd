//! Single-image scan check: quality, orientation and de-skew.
//!
//! Stages, in order: assess quality, convert to monochrome, estimate the
//! orientation, correct it, then estimate again on the corrected image so
//! the effect of the correction is visible in the report.

use std::fmt;

use serde::Serialize;

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::orientation::{Correction, Orientation, OrientationCorrector, OrientationEstimator};
use crate::quality::{QualityAssessor, QualityReport};
use crate::raster::RasterImage;
use crate::writer::ImageSink;

/// Sink names of the produced images.
pub const ORIGINAL_IMAGE: &str = "original_image.png";
/// Monochrome output name.
pub const MONOCHROME_IMAGE: &str = "monochrome_image.png";
/// Corrected output name.
pub const CORRECTED_IMAGE: &str = "corrected_image.png";

/// Everything the scan check found out about one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Blur and resolution verdict
    pub quality: QualityReport,
    /// Orientation of the input
    pub orientation: Orientation,
    /// Applied rotation; `None` when no lines were found
    pub correction: Option<Correction>,
    /// Orientation after correction
    pub corrected_orientation: Orientation,
}

impl ScanReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Io(e.into()))
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image quality: {}", self.quality)?;
        writeln!(f, "Orientation: {}", self.orientation)?;
        match &self.correction {
            Some(correction) => writeln!(
                f,
                "Correction: rotated by {:.2}° (line angle {})",
                correction.rotation, correction.line_angle
            )?,
            None => writeln!(f, "Correction: none, image unchanged")?,
        }
        write!(f, "New orientation: {}", self.corrected_orientation)
    }
}

/// Images derived during a scan check.
#[derive(Debug, Clone)]
pub struct ScanOutputs {
    /// Report of the run
    pub report: ScanReport,
    /// Binary black-and-white version of the input
    pub monochrome: RasterImage,
    /// De-skewed version of the input
    pub corrected: RasterImage,
}

/// Quality → orientation → correction for one image.
#[derive(Debug, Clone, Copy)]
pub struct ScanPipeline {
    assessor: QualityAssessor,
    estimator: OrientationEstimator,
    corrector: OrientationCorrector,
    monochrome_threshold: u8,
}

impl Default for ScanPipeline {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl ScanPipeline {
    /// Pipeline with every component taken from `config`.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            assessor: config.quality_assessor(),
            estimator: config.orientation_estimator(),
            corrector: config.orientation_corrector(),
            monochrome_threshold: config.monochrome_threshold,
        }
    }

    /// Analyse `image` and derive its monochrome and corrected versions.
    pub fn analyze(&self, image: &RasterImage) -> Result<ScanOutputs> {
        let quality = self.assessor.assess(image)?;
        log::info!("Quality: {}", quality);

        let monochrome = image.to_monochrome(self.monochrome_threshold);

        let orientation = self.estimator.estimate(image);
        log::info!("Orientation: {}", orientation);

        let (corrected, correction) = self.corrector.correct_with_report(image);
        let corrected_orientation = self.estimator.estimate(&corrected);
        log::info!("New orientation: {}", corrected_orientation);

        Ok(ScanOutputs {
            report: ScanReport {
                quality,
                orientation,
                correction,
                corrected_orientation,
            },
            monochrome,
            corrected,
        })
    }

    /// [`analyze`](Self::analyze), then write the original, monochrome and
    /// corrected images to `sink`.
    pub fn run(&self, image: &RasterImage, sink: &dyn ImageSink) -> Result<ScanReport> {
        let outputs = self.analyze(image)?;
        self.write(image, &outputs, sink)?;
        Ok(outputs.report)
    }

    /// Write `image` and its derived versions to `sink` under
    /// [`ORIGINAL_IMAGE`], [`MONOCHROME_IMAGE`] and [`CORRECTED_IMAGE`].
    pub fn write(
        &self,
        image: &RasterImage,
        outputs: &ScanOutputs,
        sink: &dyn ImageSink,
    ) -> Result<()> {
        sink.put(ORIGINAL_IMAGE, image)?;
        sink.put(MONOCHROME_IMAGE, &outputs.monochrome)?;
        sink.put(CORRECTED_IMAGE, &outputs.corrected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::{BlurQuality, ResolutionTier};
    use crate::writer::MemorySink;
    use image::{GrayImage, Luma};

    #[test]
    fn test_blank_image() {
        let image = RasterImage::from_gray(GrayImage::from_pixel(200, 100, Luma([230]))).unwrap();
        let sink = MemorySink::new();
        let report = ScanPipeline::default().run(&image, &sink).unwrap();

        assert_eq!(report.quality.blur_quality, BlurQuality::Poor);
        assert_eq!(report.quality.resolution_tier, ResolutionTier::VeryLow);
        assert_eq!(report.orientation, Orientation::Unknown);
        assert_eq!(report.correction, None);
        assert_eq!(report.corrected_orientation, Orientation::Unknown);

        assert_eq!(sink.names(), vec![ORIGINAL_IMAGE, MONOCHROME_IMAGE, CORRECTED_IMAGE]);
        assert_eq!(sink.get(CORRECTED_IMAGE), Some(image.clone()));
        let white = RasterImage::from_gray(GrayImage::from_pixel(200, 100, Luma([255]))).unwrap();
        assert_eq!(sink.get(MONOCHROME_IMAGE), Some(white));
    }

    #[test]
    fn test_report_text() {
        let image = RasterImage::from_gray(GrayImage::from_pixel(50, 50, Luma([0]))).unwrap();
        let report = ScanPipeline::default().analyze(&image).unwrap().report;
        let text = report.to_string();
        assert!(text.contains("Orientation: could not determine orientation"));
        assert!(text.contains("Correction: none"));
        assert!(report.to_json().unwrap().contains("\"corrected_orientation\""));
    }
}
