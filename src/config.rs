//! Configuration for document scanning.
//!
//! [`ScanConfig`] gathers every tunable of the analysis components. Defaults
//! reproduce the tuned behaviour; a JSON file may override any subset of the
//! fields.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::edges::EdgeThresholds;
use crate::error::{Error, Result};
use crate::layout::{TableClassifier, TableDetectorConfig, TableRegionDetector};
use crate::lines::LineVoting;
use crate::orientation::{OrientationCorrector, OrientationEstimator};
use crate::quality::{QualityAssessor, DEFAULT_BLUR_THRESHOLD};
use crate::similarity::{SimilarityComparator, DEFAULT_SIMILARITY_THRESHOLD};

/// Default cutoff for monochrome conversion.
pub const DEFAULT_MONOCHROME_THRESHOLD: u8 = 127;

/// Document scanning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Similarity above which two images match.
    pub similarity_threshold: f64,

    /// Laplacian variance below which an image is blurred.
    pub blur_threshold: f64,

    /// Edge thresholds for orientation estimation.
    pub estimator_edges: EdgeThresholds,

    /// Edge thresholds for orientation correction.
    pub corrector_edges: EdgeThresholds,

    /// Line-voting parameters shared by estimation and correction.
    pub line_voting: LineVoting,

    /// Table region detection parameters.
    pub table: TableDetectorConfig,

    /// Intensity cutoff for monochrome output.
    pub monochrome_threshold: u8,

    /// Worker threads for batch processing (`None`: one per core).
    pub workers: Option<usize>,

    /// Time limit for scanning the reference corpus per image, in milliseconds.
    pub classify_deadline_ms: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            blur_threshold: DEFAULT_BLUR_THRESHOLD,
            estimator_edges: EdgeThresholds::ESTIMATOR,
            corrector_edges: EdgeThresholds::CORRECTOR,
            line_voting: LineVoting::default(),
            table: TableDetectorConfig::default(),
            monochrome_threshold: DEFAULT_MONOCHROME_THRESHOLD,
            workers: None,
            classify_deadline_ms: None,
        }
    }

    /// Load overrides from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Config(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if !self.blur_threshold.is_finite() || self.blur_threshold < 0.0 {
            return Err(Error::Config(format!(
                "blur_threshold must be a non-negative number, got {}",
                self.blur_threshold
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        if self.table.blur_sigma.is_nan() || self.table.blur_sigma <= 0.0 {
            return Err(Error::Config(format!(
                "table.blur_sigma must be positive, got {}",
                self.table.blur_sigma
            )));
        }
        Ok(())
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the blur threshold.
    pub fn with_blur_threshold(mut self, threshold: f64) -> Self {
        self.blur_threshold = threshold;
        self
    }

    /// Set the line-voting parameters.
    pub fn with_line_voting(mut self, voting: LineVoting) -> Self {
        self.line_voting = voting;
        self
    }

    /// Set the table detection parameters.
    pub fn with_table(mut self, table: TableDetectorConfig) -> Self {
        self.table = table;
        self
    }

    /// Set the monochrome cutoff.
    pub fn with_monochrome_threshold(mut self, threshold: u8) -> Self {
        self.monochrome_threshold = threshold;
        self
    }

    /// Bound the batch worker pool.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Bound the corpus scan per image.
    pub fn with_classify_deadline(mut self, deadline: Duration) -> Self {
        self.classify_deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// Comparator using the configured similarity threshold.
    pub fn similarity_comparator(&self) -> SimilarityComparator {
        SimilarityComparator::new(self.similarity_threshold)
    }

    /// Assessor using the configured blur threshold.
    pub fn quality_assessor(&self) -> QualityAssessor {
        QualityAssessor::new(self.blur_threshold)
    }

    /// Orientation estimator with the estimation edge thresholds.
    pub fn orientation_estimator(&self) -> OrientationEstimator {
        OrientationEstimator::new(self.estimator_edges, self.line_voting)
    }

    /// Orientation corrector with the correction edge thresholds.
    pub fn orientation_corrector(&self) -> OrientationCorrector {
        OrientationCorrector::new(self.corrector_edges, self.line_voting)
    }

    /// Table region detector.
    pub fn table_detector(&self) -> TableRegionDetector {
        TableRegionDetector::new(self.table)
    }

    /// Table classifier, with the deadline if one is configured.
    pub fn table_classifier(&self) -> TableClassifier {
        let classifier = TableClassifier::new(self.similarity_comparator());
        match self.classify_deadline_ms {
            Some(ms) => classifier.with_deadline(Duration::from_millis(ms)),
            None => classifier,
        }
    }
}
