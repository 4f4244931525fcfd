//! Image sinks: where analysed and corrected images go.
//!
//! ```text
//! RasterImage
//!     ↓
//! [ImageSink::put] (name → destination)
//!     ↓
//! directory file | in-memory capture | Word document (`office`)
//! ```

#[cfg(feature = "office")]
#[cfg_attr(docsrs, doc(cfg(feature = "office")))]
pub mod docx;

#[cfg(feature = "office")]
pub use docx::DocxSink;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::ImageFormat;

use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Destination for named images.
pub trait ImageSink: Send + Sync {
    /// Store one image under `name`.
    fn put(&self, name: &str, image: &RasterImage) -> Result<()>;
}

/// Writes images as files into a directory, creating it on demand.
///
/// The codec follows the name's extension; names without an extension are
/// written as PNG with `.png` appended.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Sink writing below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target(&self, name: &str) -> (PathBuf, ImageFormat) {
        let path = self.root.join(name);
        match ImageFormat::from_path(&path) {
            Ok(format) => (path, format),
            Err(_) => (self.root.join(format!("{}.png", name)), ImageFormat::Png),
        }
    }
}

impl ImageSink for DirectorySink {
    fn put(&self, name: &str, image: &RasterImage) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let (path, format) = self.target(name);
        image
            .to_dynamic()
            .save_with_format(&path, format)
            .map_err(|e| Error::Image(format!("Failed to write {}: {}", path.display(), e)))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Keeps images in memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemorySink {
    images: Mutex<Vec<(String, RasterImage)>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names stored so far.
    pub fn names(&self) -> Vec<String> {
        self.lock().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Copy of the image stored under `name`, latest first.
    pub fn get(&self, name: &str) -> Option<RasterImage> {
        self.lock()
            .iter()
            .rev()
            .find(|(stored, _)| stored == name)
            .map(|(_, image)| image.clone())
    }

    /// Take everything stored so far.
    pub fn into_images(self) -> Vec<(String, RasterImage)> {
        self.images.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, RasterImage)>> {
        self.images.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ImageSink for MemorySink {
    fn put(&self, name: &str, image: &RasterImage) -> Result<()> {
        self.lock().push((name.to_string(), image.clone()));
        Ok(())
    }
}
