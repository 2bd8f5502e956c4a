use std::path::Path;
use std::time::Instant;

use foodquest_core::model::Restaurant;
use foodquest_core::{load_catalog, Result};

use crate::similarity::SimilarityMatrix;
use crate::sparse::SparseVector;
use crate::vectorizer::Vocabulary;

/// The restaurant catalog together with its feature vectors and
/// precomputed similarity matrix.
///
/// Built once and never mutated; queries only take `&self`, so a single
/// index can be shared between threads.
#[derive(Debug)]
pub struct CatalogIndex {
    rows: Vec<Restaurant>,
    vocabulary: Vocabulary,
    features: Vec<SparseVector>,
    similarity: SimilarityMatrix,
}

impl CatalogIndex {
    /// Vectorize the catalog and compute all pairwise similarities.
    ///
    /// Deterministic for identical rows in identical order.
    #[must_use]
    pub fn build(rows: Vec<Restaurant>) -> Self {
        let started = Instant::now();

        let texts: Vec<String> = rows.iter().map(Restaurant::feature_text).collect();
        let vocabulary = Vocabulary::fit(texts.iter().map(String::as_str));
        let features: Vec<SparseVector> = texts.iter().map(|t| vocabulary.transform(t)).collect();
        let similarity = SimilarityMatrix::build(&features);

        log::info!(
            "Indexed {} restaurants ({} terms) in {:.2?}",
            rows.len(),
            vocabulary.len(),
            started.elapsed()
        );

        Self {
            rows,
            vocabulary,
            features,
            similarity,
        }
    }

    /// Load a CSV catalog and index it.
    ///
    /// # Errors
    ///
    /// Fails if the catalog cannot be read; see
    /// [`foodquest_core::load_catalog`].
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::build(load_catalog(path)?))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[Restaurant] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, idx: usize) -> Option<&Restaurant> {
        self.rows.get(idx)
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn feature_vector(&self, idx: usize) -> Option<&SparseVector> {
        self.features.get(idx)
    }

    #[must_use]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}
