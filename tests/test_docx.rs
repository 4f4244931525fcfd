//! Integration tests for DOCX embedded-image extraction and DOCX output.

#![cfg(feature = "office")]

use std::io::{Cursor, Write};

use docscan::extractors::{source_for_path, DocxImageSource, ImageSource};
use docscan::layout::ReferenceCorpus;
use docscan::pipeline::scan::CORRECTED_IMAGE;
use docscan::pipeline::{ScanPipeline, TableOutcome, TablePipeline};
use docscan::writer::{DocxSink, ImageSink};
use docscan::RasterImage;
use image::{GrayImage, ImageFormat, Luma};
use zip::write::FileOptions;
use zip::ZipWriter;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image2.png"/>
</Relationships>"#;

fn png(value: u8) -> Vec<u8> {
    let mut bytes = Vec::new();
    GrayImage::from_pixel(40, 20, Luma([value]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn docx() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: Vec<(&str, Vec<u8>)> = vec![
        ("[Content_Types].xml", b"<Types/>".to_vec()),
        ("word/document.xml", b"<w:document/>".to_vec()),
        ("word/_rels/document.xml.rels", RELS.as_bytes().to_vec()),
        ("word/settings.xml", b"<w:settings/>".to_vec()),
        ("word/media/image1.png", png(0)),
        ("word/media/image2.png", png(255)),
    ];
    for (name, bytes) in parts {
        let options: FileOptions<()> = FileOptions::default();
        zip.start_file(name, options).unwrap();
        zip.write_all(&bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_extracts_images_in_order() {
    let images = DocxImageSource::from_bytes(docx()).encoded_images().unwrap();
    let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["image1.png", "image2.png"]);
    assert_eq!(images[0].bytes, png(0));
    assert_eq!(images[1].bytes, png(255));
}

#[test]
fn test_docx_path_selects_docx_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.docx");
    std::fs::write(&path, docx()).unwrap();
    let images = source_for_path(&path).unwrap().encoded_images().unwrap();
    assert_eq!(images.len(), 2);
}

#[test]
fn test_docx_through_table_pipeline() {
    let corpus = ReferenceCorpus::load(&vec![docscan::extractors::EncodedImage::new(
        "dark.png",
        png(0),
    )])
    .unwrap();
    let report = TablePipeline::default()
        .run(&DocxImageSource::from_bytes(docx()), &corpus, None)
        .unwrap();
    assert!(matches!(report.images[0].outcome, TableOutcome::Table { .. }));
    assert_eq!(report.images[1].outcome, TableOutcome::NoTable);
}

#[test]
fn test_corrected_image_embedded_in_new_document() {
    let page = GrayImage::from_fn(900, 600, |x, y| {
        if (50..850).contains(&x) && (295..305).contains(&y) {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    let image = RasterImage::from_gray(page).unwrap();
    let pipeline = ScanPipeline::default();
    let outputs = pipeline.analyze(&image).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let sink = DocxSink::new(dir.path().join("docs/test/test.docx")).with_title("");
    sink.put(CORRECTED_IMAGE, &outputs.corrected).unwrap();

    let images = source_for_path(sink.path()).unwrap().encoded_images().unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "image1.png");
    assert_eq!(images[0].decode().unwrap(), outputs.corrected);
}
