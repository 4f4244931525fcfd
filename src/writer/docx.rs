//! Word (DOCX) output: each stored image becomes a heading followed by an
//! inline picture, one image per page.
//!
//! Only the parts a reader needs are written: `[Content_Types].xml`, the
//! package and document relationships, `word/document.xml` and one
//! `word/media/imageN.png` per image.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::ImageFormat;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::ImageSink;
use crate::error::{Error, Result};
use crate::raster::RasterImage;

/// Picture width on the page: 6 inches in EMU.
const PICTURE_WIDTH_EMU: u64 = 6 * 914_400;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Writes stored images into a new Word document.
///
/// The heading above each picture is the sink title when one is set,
/// otherwise the image name. The document is rewritten on every
/// [`put`](ImageSink::put), so the file always holds every image stored so
/// far.
#[derive(Debug)]
pub struct DocxSink {
    path: PathBuf,
    title: Option<String>,
    images: Mutex<Vec<(String, RasterImage)>>,
}

impl DocxSink {
    /// Sink writing the document to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
            images: Mutex::new(Vec::new()),
        }
    }

    /// Use one heading text for every image.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Output document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document as it would be written now.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let images = self.images.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.build(&images)
    }

    fn build(&self, images: &[(String, RasterImage)]) -> Result<Vec<u8>> {
        let mut media = Vec::with_capacity(images.len());
        for (name, image) in images {
            let mut bytes = Vec::new();
            image
                .to_dynamic()
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                .map_err(|e| Error::Image(format!("Failed to encode {}: {}", name, e)))?;
            media.push(bytes);
        }

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        add_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
        add_part(&mut zip, "_rels/.rels", PACKAGE_RELS.as_bytes())?;
        add_part(&mut zip, "word/_rels/document.xml.rels", document_rels(images.len()).as_bytes())?;
        add_part(&mut zip, "word/document.xml", self.document(images).as_bytes())?;
        for (index, bytes) in media.iter().enumerate() {
            add_part(&mut zip, &format!("word/media/image{}.png", index + 1), bytes)?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::Document(format!("Failed to finish DOCX archive: {}", e)))?;
        Ok(cursor.into_inner())
    }

    fn document(&self, images: &[(String, RasterImage)]) -> String {
        let mut body = String::new();
        for (index, (name, image)) in images.iter().enumerate() {
            if index > 0 {
                body.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
            }
            let heading = self.title.as_deref().unwrap_or(name);
            body.push_str(&format!(
                r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                escape(heading)
            ));
            body.push_str(&inline_picture(index + 1, image.dimensions()));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>{}</w:body></w:document>"#,
            body
        )
    }
}

impl ImageSink for DocxSink {
    fn put(&self, name: &str, image: &RasterImage) -> Result<()> {
        let mut images = self.images.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        images.push((name.to_string(), image.clone()));
        let bytes = self.build(&images)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, bytes)?;
        log::debug!("Wrote {} ({} images)", self.path.display(), images.len());
        Ok(())
    }
}

fn add_part(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, bytes: &[u8]) -> Result<()> {
    zip.start_file(name, SimpleFileOptions::default())
        .map_err(|e| Error::Document(format!("Failed to add {}: {}", name, e)))?;
    zip.write_all(bytes)?;
    Ok(())
}

fn document_rels(count: usize) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for n in 1..=count {
        rels.push_str(&format!(
            r#"<Relationship Id="rId{n}" Type="{}" Target="media/image{n}.png"/>"#,
            IMAGE_RELATIONSHIP
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

/// `w:p` holding picture `n` scaled to the page width.
fn inline_picture(n: usize, (width, height): (u32, u32)) -> String {
    let cx = PICTURE_WIDTH_EMU;
    let cy = PICTURE_WIDTH_EMU * height as u64 / width as u64;
    format!(
        r#"<w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{n}" name="Picture {n}"/><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="{n}" name="image{n}.png"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId{n}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#
    )
}
