//! Integration tests for table region detection and classification.

use docscan::geometry::Rectangle;
use docscan::layout::{
    DetectionStrategy, HeightFilter, ReferenceCorpus, TableClassifier, TableDetectorConfig,
    TableRegionDetector,
};
use docscan::similarity::SimilarityComparator;
use docscan::RasterImage;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// White page with filled black rectangles.
fn page(width: u32, height: u32, boxes: &[Rectangle]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as i32, y as i32);
        let inked = boxes
            .iter()
            .any(|r| x >= r.x1 && x < r.x2 && y >= r.y1 && y < r.y2);
        if inked {
            Luma([0])
        } else {
            Luma([255])
        }
    })
}

#[test]
fn test_single_dark_rectangle_threshold() {
    let table = Rectangle::new(50, 60, 350, 100);
    let image = RasterImage::from_gray(page(400, 200, &[table])).unwrap();
    let regions = TableRegionDetector::threshold().detect(&image);
    assert_eq!(regions, vec![table]);
    assert_eq!((regions[0].width(), regions[0].height()), (300, 40));
}

#[test]
fn test_color_input_threshold() {
    let image = RgbImage::from_fn(120, 80, |x, y| {
        if (20..100).contains(&x) && (30..50).contains(&y) {
            Rgb([10, 20, 30])
        } else {
            Rgb([250, 250, 250])
        }
    });
    let image = RasterImage::from_rgb(image).unwrap();
    assert_eq!(
        TableRegionDetector::threshold().detect(&image),
        vec![Rectangle::new(20, 30, 100, 50)]
    );
}

#[test]
fn test_blank_page_has_no_regions() {
    let image = RasterImage::from_gray(GrayImage::from_pixel(300, 300, Luma([255]))).unwrap();
    assert!(TableRegionDetector::threshold().detect(&image).is_empty());
    assert!(TableRegionDetector::edge().detect(&image).is_empty());
}

#[test]
fn test_edge_strategy_keeps_wide_tables_only() {
    let table = Rectangle::new(40, 40, 640, 100);
    let stamp = Rectangle::new(100, 200, 200, 300);
    let image = RasterImage::from_gray(page(700, 360, &[table, stamp])).unwrap();

    let regions = TableRegionDetector::edge().detect(&image);
    assert!(!regions.is_empty());

    let around_table = Rectangle::new(table.x1 - 4, table.y1 - 4, table.x2 + 4, table.y2 + 4);
    for region in &regions {
        assert!(around_table.contains(region), "unexpected region {}", region);
        assert!(region.width() > 250);
    }
}

#[test]
fn test_edge_strategy_band_filter_same_result() {
    let table = Rectangle::new(40, 40, 640, 100);
    let image = RasterImage::from_gray(page(700, 200, &[table])).unwrap();

    let literal = TableRegionDetector::edge().detect(&image);
    let band = TableRegionDetector::new(TableDetectorConfig {
        strategy: DetectionStrategy::Edge,
        height_filter: HeightFilter::Band,
        ..TableDetectorConfig::default()
    })
    .detect(&image);
    assert_eq!(literal, band);
}

#[test]
fn test_threshold_strategy_reports_every_blob() {
    let boxes = [
        Rectangle::new(10, 10, 20, 20),
        Rectangle::new(40, 10, 60, 15),
        Rectangle::new(10, 40, 90, 70),
    ];
    let image = RasterImage::from_gray(page(100, 100, &boxes)).unwrap();
    let mut regions = TableRegionDetector::threshold().detect(&image);
    regions.sort_by_key(|r| (r.y1, r.x1));
    assert_eq!(regions, boxes.to_vec());
}

#[test]
fn test_classifier_then_detector() {
    let table = Rectangle::new(50, 60, 350, 100);
    let reference = RasterImage::from_gray(page(400, 200, &[table])).unwrap();
    let corpus = ReferenceCorpus::new().with("table.png", reference);

    // Same layout at a different size still matches after resampling.
    let scaled_table = Rectangle::new(100, 120, 700, 200);
    let candidate = RasterImage::from_gray(page(800, 400, &[scaled_table])).unwrap();
    let classifier = TableClassifier::new(SimilarityComparator::default());
    assert!(classifier.classify(&candidate, &corpus).unwrap());
    assert_eq!(TableRegionDetector::threshold().detect(&candidate), vec![scaled_table]);

    // A blank page differs on the table area only: 1 - 0.15 = 0.85, not a match.
    let blank = RasterImage::from_gray(GrayImage::from_pixel(400, 200, Luma([255]))).unwrap();
    assert!(!classifier.classify(&blank, &corpus).unwrap());
}
