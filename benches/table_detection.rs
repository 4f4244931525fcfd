//! Table detection benchmarks
//!
//! Measures both detection strategies and corpus classification on a
//! synthetic ruled page.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docscan::layout::{ReferenceCorpus, TableClassifier, TableRegionDetector};
use docscan::RasterImage;
use image::{GrayImage, Luma};

/// White page with a ruled grid table in the upper half.
fn ruled_page(width: u32, height: u32) -> RasterImage {
    let page = GrayImage::from_fn(width, height, |x, y| {
        let in_table = x >= width / 10 && x < width * 9 / 10 && y >= height / 10 && y < height / 2;
        let on_rule = x % 40 == 0 || y % 25 == 0;
        if in_table && on_rule {
            Luma([0])
        } else {
            Luma([255])
        }
    });
    RasterImage::from_gray(page).unwrap()
}

fn bench_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_detection");
    group.sample_size(20);

    for (width, height) in [(640, 360), (1280, 720), (1920, 1080)] {
        let page = ruled_page(width, height);
        let label = format!("{width}x{height}");

        group.bench_with_input(BenchmarkId::new("threshold", &label), &page, |b, page| {
            let detector = TableRegionDetector::threshold();
            b.iter(|| black_box(detector.detect(black_box(page))));
        });
        group.bench_with_input(BenchmarkId::new("edge", &label), &page, |b, page| {
            let detector = TableRegionDetector::edge();
            b.iter(|| black_box(detector.detect(black_box(page))));
        });
    }

    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_classification");
    group.sample_size(20);

    let page = ruled_page(1280, 720);
    for size in [8, 32] {
        let corpus: ReferenceCorpus = (0..size)
            .map(|i| docscan::layout::ReferenceImage {
                name: format!("reference{i}.png"),
                image: ruled_page(640 + i * 8, 360 + i * 4),
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &corpus, |b, corpus| {
            let classifier = TableClassifier::default();
            b.iter(|| black_box(classifier.classify(black_box(&page), corpus).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detection, bench_classification);
criterion_main!(benches);
