//! Image sources: where page images and reference images come from.
//!
//! A source yields encoded images (file bytes plus a name) in a
//! deterministic order. Decoding happens downstream, so a single corrupt
//! image surfaces as a per-image failure instead of failing the listing.

#[cfg(feature = "office")]
#[cfg_attr(docsrs, doc(cfg(feature = "office")))]
pub mod docx;

#[cfg(feature = "office")]
pub use docx::DocxImageSource;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::layout::{ReferenceCorpus, ReferenceImage};
use crate::raster::RasterImage;

/// An undecoded image with its identifying name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Name used in reports and output file names
    pub name: String,
    /// Encoded file contents (PNG, JPEG, ...)
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// Create a named image.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Decode into a raster image.
    pub fn decode(&self) -> Result<RasterImage> {
        RasterImage::decode(&self.bytes).map_err(|e| match e {
            Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", self.name, msg)),
            other => other,
        })
    }
}

/// Something that yields a list of encoded images.
pub trait ImageSource {
    /// All images of the source, in a stable order.
    fn encoded_images(&self) -> Result<Vec<EncodedImage>>;
}

impl ImageSource for [EncodedImage] {
    fn encoded_images(&self) -> Result<Vec<EncodedImage>> {
        Ok(self.to_vec())
    }
}

impl ImageSource for Vec<EncodedImage> {
    fn encoded_images(&self) -> Result<Vec<EncodedImage>> {
        Ok(self.clone())
    }
}

/// Every regular file of a directory, sorted by file name.
///
/// Subdirectories are not descended into. No filtering by extension is
/// done here; files that are not images fail to decode later.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    /// Source over `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The directory being listed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for DirectorySource {
    fn encoded_images(&self) -> Result<Vec<EncodedImage>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut images = Vec::with_capacity(files.len());
        for path in files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            images.push(EncodedImage::new(name, std::fs::read(&path)?));
        }
        log::debug!("Listed {} files in {}", images.len(), self.path.display());
        Ok(images)
    }
}

/// Source for a single image file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source over one file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ImageSource for FileSource {
    fn encoded_images(&self) -> Result<Vec<EncodedImage>> {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(vec![EncodedImage::new(name, std::fs::read(&self.path)?)])
    }
}

/// Pick a source for a path: directories list their files, `.docx`
/// documents yield their embedded images, anything else is one image.
pub fn source_for_path(path: impl AsRef<Path>) -> Result<Box<dyn ImageSource>> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::new(path)));
    }
    let is_docx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false);
    if is_docx {
        return docx_source(path);
    }
    Ok(Box::new(FileSource::new(path)))
}

#[cfg(feature = "office")]
fn docx_source(path: &Path) -> Result<Box<dyn ImageSource>> {
    Ok(Box::new(DocxImageSource::open(path)?))
}

#[cfg(not(feature = "office"))]
fn docx_source(path: &Path) -> Result<Box<dyn ImageSource>> {
    Err(Error::Unsupported(format!(
        "{}: DOCX input requires the 'office' feature",
        path.display()
    )))
}

impl ReferenceCorpus {
    /// Decode every image of `source` into a corpus.
    ///
    /// Images that fail to decode are logged and skipped.
    pub fn load(source: &dyn ImageSource) -> Result<Self> {
        let encoded = source.encoded_images()?;
        let total = encoded.len();
        let corpus: ReferenceCorpus = encoded
            .into_iter()
            .filter_map(|image| match image.decode() {
                Ok(decoded) => Some(ReferenceImage {
                    name: image.name,
                    image: decoded,
                }),
                Err(e) => {
                    log::warn!("Skipping reference image: {}", e);
                    None
                },
            })
            .collect();
        log::info!("Loaded {} of {} reference images", corpus.len(), total);
        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    fn png_bytes(value: u8) -> Vec<u8> {
        let mut bytes = Vec::new();
        GrayImage::from_pixel(4, 4, Luma([value]))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_directory_source_sorted_and_flat() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), png_bytes(1)).unwrap();
        std::fs::write(dir.path().join("a.png"), png_bytes(2)).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let images = DirectorySource::new(dir.path()).encoded_images().unwrap();
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"));
        assert!(matches!(source.encoded_images(), Err(Error::Io(_))));
    }

    #[test]
    fn test_corpus_skips_undecodable() {
        let images = vec![
            EncodedImage::new("good.png", png_bytes(0)),
            EncodedImage::new("notes.txt", b"not an image".to_vec()),
        ];
        let corpus = ReferenceCorpus::load(&images).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.iter().next().map(|r| r.name.as_str()), Some("good.png"));
    }

    #[test]
    fn test_decode_error_names_the_image() {
        let err = EncodedImage::new("broken.png", vec![0, 1, 2]).decode().unwrap_err();
        assert!(matches!(&err, Error::InvalidInput(msg) if msg.contains("broken.png")));
    }

    #[test]
    fn test_source_for_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        std::fs::write(&path, png_bytes(9)).unwrap();
        let images = source_for_path(&path).unwrap().encoded_images().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].name, "page.png");
    }
}
