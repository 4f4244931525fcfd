//! Batch table detection: classify every image against the reference corpus
//! and locate table regions in the ones that match.

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::extractors::{EncodedImage, ImageSource};
use crate::geometry::Rectangle;
use crate::layout::{ReferenceCorpus, TableClassifier, TableRegionDetector};
use crate::writer::ImageSink;

/// Result of processing one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    /// Matched the corpus; detected regions (possibly none)
    Table {
        /// Regions in detection order
        regions: Vec<Rectangle>,
    },
    /// Matched nothing in the corpus
    NoTable,
    /// Decoding, comparison or output failed
    Failed {
        /// Error message
        error: String,
    },
}

/// Outcome attributed to its source image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    /// Source image name
    pub name: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: TableOutcome,
}

impl ImageReport {
    /// True when the image contains a table.
    pub fn contains_table(&self) -> bool {
        matches!(self.outcome, TableOutcome::Table { .. })
    }

    /// True when processing the image failed.
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, TableOutcome::Failed { .. })
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TableOutcome::Table { regions } => {
                write!(f, "Image {} contains a table. Table coordinates: [", self.name)?;
                for (i, region) in regions.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", region)?;
                }
                f.write_str("]")
            },
            TableOutcome::NoTable => write!(f, "Image {} contains no table", self.name),
            TableOutcome::Failed { error } => write!(f, "Image {} failed: {}", self.name, error),
        }
    }
}

/// Reports for a whole batch, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// One entry per source image
    pub images: Vec<ImageReport>,
}

impl BatchReport {
    /// Number of images that failed.
    pub fn failures(&self) -> usize {
        self.images.iter().filter(|r| r.is_failure()).count()
    }

    /// Reports of images that contain a table.
    pub fn tables(&self) -> impl Iterator<Item = &ImageReport> {
        self.images.iter().filter(|r| r.contains_table())
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Io(e.into()))
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.images {
            writeln!(f, "{}", report)?;
        }
        Ok(())
    }
}

/// Classify → detect over every image of a source.
#[derive(Debug, Clone, Copy)]
pub struct TablePipeline {
    classifier: TableClassifier,
    detector: TableRegionDetector,
    workers: Option<usize>,
}

impl Default for TablePipeline {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

impl TablePipeline {
    /// Pipeline from explicit components, on rayon's default pool size.
    pub fn new(classifier: TableClassifier, detector: TableRegionDetector) -> Self {
        Self {
            classifier,
            detector,
            workers: None,
        }
    }

    /// Pipeline with every component taken from `config`.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            classifier: config.table_classifier(),
            detector: config.table_detector(),
            workers: config.workers,
        }
    }

    /// Bound the worker pool.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Process every image of `source`.
    ///
    /// Only a failure to list the source or start the pool is an error;
    /// per-image failures are recorded in the report. When a sink is given,
    /// every decoded image is also written to it under its source name.
    pub fn run(
        &self,
        source: &dyn ImageSource,
        corpus: &ReferenceCorpus,
        sink: Option<&dyn ImageSink>,
    ) -> Result<BatchReport> {
        let encoded = source.encoded_images()?;
        log::info!(
            "Processing {} images against {} references",
            encoded.len(),
            corpus.len()
        );
        let pool = super::worker_pool(self.workers)?;
        let images = pool.install(|| {
            encoded
                .par_iter()
                .map(|image| ImageReport {
                    name: image.name.clone(),
                    outcome: self.process(image, corpus, sink),
                })
                .collect::<Vec<_>>()
        });
        let report = BatchReport { images };
        if report.failures() > 0 {
            log::warn!("{} of {} images failed", report.failures(), report.images.len());
        }
        Ok(report)
    }

    fn process(
        &self,
        encoded: &EncodedImage,
        corpus: &ReferenceCorpus,
        sink: Option<&dyn ImageSink>,
    ) -> TableOutcome {
        match self.try_process(encoded, corpus, sink) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("{}: {}", encoded.name, e);
                TableOutcome::Failed {
                    error: e.to_string(),
                }
            },
        }
    }

    fn try_process(
        &self,
        encoded: &EncodedImage,
        corpus: &ReferenceCorpus,
        sink: Option<&dyn ImageSink>,
    ) -> Result<TableOutcome> {
        let image = encoded.decode()?;
        if let Some(sink) = sink {
            sink.put(&encoded.name, &image)?;
        }
        if !self.classifier.classify(&image, corpus)? {
            return Ok(TableOutcome::NoTable);
        }
        let regions = self.detector.detect(&image);
        log::debug!("{}: {} table regions", encoded.name, regions.len());
        Ok(TableOutcome::Table { regions })
    }
}
