//! Similarity-based "does this image contain a table" classification.
//!
//! An image contains a table when it is visually similar to at least one
//! image of a reference corpus of known table patterns. Comparisons are
//! independent, so the corpus is scanned in parallel; the verdict is
//! "true iff any reference matches" and does not depend on corpus order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::raster::RasterImage;
use crate::similarity::SimilarityComparator;

/// A named reference image.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    /// Identifier, e.g. the file name it was loaded from
    pub name: String,
    /// Decoded image
    pub image: RasterImage,
}

/// Set of known table-pattern images.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    references: Vec<ReferenceImage>,
}

impl ReferenceCorpus {
    /// Empty corpus; nothing classifies as a table against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference image.
    pub fn push(&mut self, name: impl Into<String>, image: RasterImage) {
        self.references.push(ReferenceImage {
            name: name.into(),
            image,
        });
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, name: impl Into<String>, image: RasterImage) -> Self {
        self.push(name, image);
        self
    }

    /// Number of reference images.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// True if the corpus holds no images.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Iterate over the references.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.references.iter()
    }
}

impl FromIterator<ReferenceImage> for ReferenceCorpus {
    fn from_iter<I: IntoIterator<Item = ReferenceImage>>(iter: I) -> Self {
        Self {
            references: iter.into_iter().collect(),
        }
    }
}

/// Decides whether an image contains a table by corpus similarity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableClassifier {
    comparator: SimilarityComparator,
    deadline: Option<Duration>,
}

impl TableClassifier {
    /// Create a classifier around a comparator.
    pub fn new(comparator: SimilarityComparator) -> Self {
        Self {
            comparator,
            deadline: None,
        }
    }

    /// Bound the time spent scanning the corpus for one image.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// True iff any reference image is similar to `image`.
    ///
    /// Fails with [`Error::DeadlineExceeded`] when a deadline is set and the
    /// scan overruns it before finding a match.
    pub fn classify(&self, image: &RasterImage, corpus: &ReferenceCorpus) -> Result<bool> {
        if corpus.is_empty() {
            return Ok(false);
        }

        let target = image.to_gray();
        let started = Instant::now();
        let total = corpus.len();
        let compared = AtomicUsize::new(0);

        let verdict = corpus
            .references
            .par_iter()
            .map(|reference| {
                if let Some(deadline) = self.deadline {
                    if started.elapsed() > deadline {
                        return Err(Error::DeadlineExceeded {
                            compared: compared.load(Ordering::Relaxed),
                            total,
                        });
                    }
                }
                let matched = self.comparator.compare_gray(&target, &reference.image)?;
                compared.fetch_add(1, Ordering::Relaxed);
                if matched {
                    log::debug!("Matched reference '{}'", reference.name);
                }
                Ok(matched)
            })
            .find_any(|outcome| !matches!(outcome, Ok(false)));

        match verdict {
            Some(outcome) => outcome,
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn uniform(value: u8) -> RasterImage {
        RasterImage::from_gray(GrayImage::from_pixel(16, 16, Luma([value]))).unwrap()
    }

    #[test]
    fn test_empty_corpus_is_false() {
        let classifier = TableClassifier::default();
        assert!(!classifier.classify(&uniform(0), &ReferenceCorpus::new()).unwrap());
    }

    #[test]
    fn test_any_match_wins_regardless_of_position() {
        let image = uniform(40);
        let classifier = TableClassifier::default();
        for position in 0..5 {
            let corpus: ReferenceCorpus = (0..5)
                .map(|i| ReferenceImage {
                    name: format!("ref{}", i),
                    image: if i == position { uniform(40) } else { uniform(250) },
                })
                .collect();
            assert!(classifier.classify(&image, &corpus).unwrap());
        }
    }

    #[test]
    fn test_no_match() {
        let corpus = ReferenceCorpus::new().with("white", uniform(255)).with("grey", uniform(128));
        assert!(!TableClassifier::default().classify(&uniform(0), &corpus).unwrap());
    }

    #[test]
    fn test_zero_deadline_expires() {
        let corpus: ReferenceCorpus = (0..64)
            .map(|i| ReferenceImage {
                name: format!("ref{}", i),
                image: uniform(255),
            })
            .collect();
        let classifier = TableClassifier::default().with_deadline(Duration::ZERO);
        let outcome = classifier.classify(&uniform(0), &corpus);
        assert!(matches!(
            outcome,
            Err(Error::DeadlineExceeded {
                compared: 0,
                total: 64
            })
        ));
    }

    #[test]
    fn test_deadline_counts_finished_comparisons() {
        let corpus: ReferenceCorpus = (0..64)
            .map(|i| ReferenceImage {
                name: format!("ref{}", i),
                image: uniform(255),
            })
            .collect();
        let classifier = TableClassifier::default().with_deadline(Duration::from_nanos(1));
        match classifier.classify(&uniform(0), &corpus) {
            Ok(verdict) => assert!(!verdict),
            Err(Error::DeadlineExceeded { compared, total }) => {
                assert_eq!(total, 64);
                assert!(compared < total);
            },
            Err(e) => panic!("unexpected error {}", e),
        }
    }
}
