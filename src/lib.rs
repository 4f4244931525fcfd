// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # docscan
//!
//! Scanned-document analysis: table detection, image quality and skew correction.
//!
//! ## Core Features
//!
//! ### Tables
//! - **Table Classification**: similarity search against a corpus of known table images
//! - **Region Detection**: outer-contour bounding boxes, threshold or edge based
//!
//! ### Scan Quality
//! - **Blur Assessment**: variance of the Laplacian against a threshold
//! - **Resolution Tiers**: VeryLow / Low / Medium / High breakpoints
//!
//! ### Orientation
//! - **Estimation**: edge detection + Hough line voting, mean line angle
//! - **Correction**: median line angle, rotation onto the nearest axis
//!
//! ### Collaborators
//! - **Sources**: image directories and DOCX embedded media (`office` feature)
//! - **Sinks**: image directories and in-memory capture
//! - **Pipelines**: batch table reports and single-image scan reports, text or JSON
//!
//! ## Quick Start
//!
//! ```ignore
//! use docscan::{RasterImage, ReferenceCorpus, ScanConfig};
//! use docscan::extractors::DirectorySource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScanConfig::default();
//! let corpus = ReferenceCorpus::load(&DirectorySource::new("reference_tables"))?;
//! let page = RasterImage::open("page.png")?;
//!
//! if config.table_classifier().classify(&page, &corpus)? {
//!     for region in config.table_detector().detect(&page) {
//!         println!("table at {}", region);
//!     }
//! }
//! println!("{}", config.orientation_estimator().estimate(&page));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Image model
pub mod geometry;
pub mod raster;

// Shared primitives
pub mod edges;
pub mod lines;

// Analysis components
pub mod layout;
pub mod orientation;
pub mod quality;
pub mod similarity;

// Collaborators
pub mod extractors;
pub mod writer;

// High-level pipelines
pub mod pipeline;

// Re-exports
pub use config::ScanConfig;
pub use error::{Error, Result};
pub use geometry::Rectangle;
pub use layout::{ReferenceCorpus, TableClassifier, TableRegionDetector};
pub use orientation::{Orientation, OrientationCorrector, OrientationEstimator};
pub use quality::{QualityAssessor, QualityReport};
pub use raster::RasterImage;
pub use similarity::SimilarityComparator;

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    #[inline]
    pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
