//! Image analysis pipelines with clean collaborator boundaries.
//!
//! ```text
//! ImageSource (directory, DOCX, ...)
//!     ↓
//! EncodedImage[]
//!     ↓ decode (per image, failures recorded)
//! RasterImage
//!     ↓
//! [TablePipeline]  classify → detect      → BatchReport
//! [ScanPipeline]   quality → orientation  → ScanReport
//!     ↓
//! ImageSink (directory, memory)
//! ```
//!
//! # Key Design Principles
//!
//! 1. **Injected collaborators**: pipelines never touch the file system
//!    themselves; sources and sinks are passed in.
//!
//! 2. **Per-image failures**: one bad image is reported, never aborts the batch.
//!
//! 3. **Unified configuration**: every component comes from [`ScanConfig`].
//!
//! [`ScanConfig`]: crate::config::ScanConfig

pub mod scan;
pub mod tables;

// Re-export main types
pub use scan::{ScanOutputs, ScanPipeline, ScanReport};
pub use tables::{BatchReport, ImageReport, TableOutcome, TablePipeline};

use crate::error::{Error, Result};

/// Thread pool bounded to `workers` threads, or rayon's default size.
pub(crate) fn worker_pool(workers: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = workers {
        builder = builder.num_threads(workers);
    }
    builder
        .build()
        .map_err(|e| Error::Config(format!("Failed to start worker pool: {}", e)))
}
