//! Integration tests for the similarity comparator.

use docscan::similarity::{compare, SimilarityComparator};
use docscan::{Error, RasterImage};
use image::{GrayImage, Luma, Rgb, RgbImage};
use proptest::prelude::*;

fn uniform(width: u32, height: u32, value: u8) -> RasterImage {
    RasterImage::from_gray(GrayImage::from_pixel(width, height, Luma([value]))).unwrap()
}

fn arb_image() -> impl Strategy<Value = RasterImage> {
    (1u32..24, 1u32..24).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h) as usize).prop_map(move |pixels| {
            RasterImage::from_gray(GrayImage::from_raw(w, h, pixels).unwrap()).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn prop_self_similarity_is_one(image in arb_image()) {
        let comparator = SimilarityComparator::default();
        prop_assert_eq!(comparator.similarity(&image, &image).unwrap(), 1.0);
        prop_assert!(comparator.compare(&image, &image).unwrap());
    }

    #[test]
    fn prop_similarity_in_unit_range(a in arb_image(), b in arb_image()) {
        let score = SimilarityComparator::default().similarity(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn prop_uniform_difference(v in any::<u8>(), w in any::<u8>()) {
        let score = SimilarityComparator::default()
            .similarity(&uniform(8, 8, v), &uniform(8, 8, w))
            .unwrap();
        let expected = 1.0 - (v as f64 - w as f64).abs() / 255.0;
        prop_assert!((score - expected).abs() < 1e-9);
    }
}

#[test]
fn test_threshold_is_strict() {
    // Identical images score exactly 1.0, which is not above a 1.0 threshold.
    let image = uniform(4, 4, 100);
    assert!(!compare(&image, &image, 1.0).unwrap());
    assert!(compare(&image, &image, 0.999).unwrap());
}

#[test]
fn test_black_and_white_are_dissimilar() {
    let score = SimilarityComparator::default()
        .similarity(&uniform(10, 10, 0), &uniform(10, 10, 255))
        .unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn test_different_sizes_are_resampled() {
    let small = uniform(10, 10, 80);
    let large = uniform(100, 30, 80);
    let comparator = SimilarityComparator::default();
    assert!(comparator.similarity(&small, &large).unwrap() > 0.999);
    assert!(comparator.similarity(&large, &small).unwrap() > 0.999);
}

#[test]
fn test_color_and_gray_compare_by_intensity() {
    let color = RasterImage::from_rgb(RgbImage::from_pixel(6, 6, Rgb([255, 255, 255]))).unwrap();
    let gray = uniform(6, 6, 255);
    assert_eq!(SimilarityComparator::default().similarity(&color, &gray).unwrap(), 1.0);
}

#[test]
fn test_zero_area_rejected() {
    let err = RasterImage::from_gray(GrayImage::new(0, 10)).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
