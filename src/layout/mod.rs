//! Table analysis for scanned pages.
//!
//! - [`TableClassifier`]: does the page contain a table, judged by similarity
//!   to a corpus of known table images
//! - [`TableRegionDetector`]: where the candidate table regions are

pub mod table_classifier;
pub mod table_detector;

// Re-export main types
pub use table_classifier::{ReferenceCorpus, ReferenceImage, TableClassifier};
pub use table_detector::{
    DetectionStrategy, HeightFilter, TableDetectorConfig, TableRegionDetector,
};
