//! Embedded images of Word (DOCX) documents.
//!
//! Images are found through the main document part's relationships
//! (`word/_rels/document.xml.rels`): every relationship whose target
//! mentions `image` points at a media part, read verbatim from the archive.
//! Images are named `image1.png`, `image2.png`, ... in relationship order,
//! whatever their actual encoding.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::{EncodedImage, ImageSource};
use crate::error::{Error, Result};

const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";

/// A relationship of the main document part.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Relationship {
    target: String,
    external: bool,
}

/// Yields the images embedded in a DOCX document.
#[derive(Debug, Clone)]
pub struct DocxImageSource {
    bytes: Vec<u8>,
}

impl DocxImageSource {
    /// Read a document from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_bytes(std::fs::read(path)?))
    }

    /// Wrap document bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl ImageSource for DocxImageSource {
    fn encoded_images(&self) -> Result<Vec<EncodedImage>> {
        let mut archive = ZipArchive::new(Cursor::new(&self.bytes))
            .map_err(|e| Error::Document(format!("Failed to open DOCX archive: {}", e)))?;

        let rels = match read_part(&mut archive, DOCUMENT_RELS)? {
            Some(xml) => xml,
            None => {
                log::debug!("No {} part; document has no images", DOCUMENT_RELS);
                return Ok(Vec::new());
            },
        };
        let rels = String::from_utf8(rels)
            .map_err(|e| Error::Document(format!("{} is not UTF-8: {}", DOCUMENT_RELS, e)))?;

        let mut images = Vec::new();
        for relationship in parse_relationships(&rels)? {
            if !relationship.target.contains("image") {
                continue;
            }
            if relationship.external {
                log::warn!("Skipping externally linked image {}", relationship.target);
                continue;
            }
            let part = resolve_target(&relationship.target);
            let bytes = read_part(&mut archive, &part)?.ok_or_else(|| {
                Error::Document(format!("relationship target {} is missing", part))
            })?;
            images.push(EncodedImage::new(format!("image{}.png", images.len() + 1), bytes));
        }
        log::debug!("Extracted {} images from DOCX", images.len());
        Ok(images)
    }
}

/// Read an archive member, `None` when it does not exist.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .map_err(|e| Error::Document(format!("Failed to read {}: {}", name, e)))?;
            Ok(Some(content))
        },
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(Error::Document(format!("Failed to open {}: {}", name, e))),
    }
}

/// Relationships in document order.
fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut relationships = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let Some(target) = get_attribute(e, "Target") {
                    let external = get_attribute(e, "TargetMode")
                        .map(|mode| mode.eq_ignore_ascii_case("External"))
                        .unwrap_or(false);
                    relationships.push(Relationship { target, external });
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Document(format!("XML parse error in {}: {}", DOCUMENT_RELS, e)));
            },
            _ => {},
        }
    }
    Ok(relationships)
}

/// Archive path of a relationship target, relative to `word/` unless absolute.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = vec!["word"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}
