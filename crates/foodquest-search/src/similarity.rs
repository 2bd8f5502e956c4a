//! All-pairs cosine similarity over the catalog's feature vectors.

use crate::sparse::SparseVector;

/// Symmetric similarity matrix with a unit diagonal.
///
/// Only the strict upper triangle is stored, row-major, as `f32`: reads of
/// `(i, j)` and `(j, i)` hit the same cell, so symmetry holds by
/// construction. Values are clamped to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    size: usize,
    upper: Vec<f32>,
    closeness: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute cosine similarity between every pair of vectors.
    ///
    /// Dot products are accumulated through an inverted index, so each row
    /// only touches the rows it shares a term with. The mean similarity of
    /// each row to every other row is gathered in the same pass.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(vectors: &[SparseVector]) -> Self {
        let size = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(SparseVector::l2_norm).collect();

        let term_count = vectors
            .iter()
            .flat_map(|v| v.iter().map(|(term, _)| term as usize + 1))
            .max()
            .unwrap_or(0);
        let mut postings: Vec<Vec<(usize, u32)>> = vec![Vec::new(); term_count];
        for (row, vector) in vectors.iter().enumerate() {
            for (term, count) in vector.iter() {
                postings[term as usize].push((row, count));
            }
        }

        let mut upper = Vec::with_capacity(size * size.saturating_sub(1) / 2);
        let mut sums = vec![0.0_f64; size];
        let mut dots = vec![0.0_f64; size];

        for (i, vector) in vectors.iter().enumerate() {
            for (term, count) in vector.iter() {
                let list = &postings[term as usize];
                let start = list.partition_point(|&(row, _)| row <= i);
                for &(j, other) in &list[start..] {
                    dots[j] += f64::from(count) * f64::from(other);
                }
            }

            for j in (i + 1)..size {
                let denom = norms[i] * norms[j];
                let sim = if denom > 0.0 {
                    (dots[j] / denom).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                dots[j] = 0.0;

                let stored = sim as f32;
                upper.push(stored);
                sums[i] += f64::from(stored);
                sums[j] += f64::from(stored);
            }
        }

        let closeness = if size > 1 {
            let others = (size - 1) as f64;
            sums.into_iter().map(|sum| sum / others).collect()
        } else {
            vec![0.0; size]
        };

        Self {
            size,
            upper,
            closeness,
        }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Similarity of rows `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "similarity index out of range");
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => f64::from(self.upper[self.offset(i, j)]),
            std::cmp::Ordering::Greater => f64::from(self.upper[self.offset(j, i)]),
        }
    }

    /// Mean similarity of row `i` to every other row; `0.0` for a
    /// single-row matrix.
    #[must_use]
    pub fn closeness(&self, i: usize) -> f64 {
        self.closeness[i]
    }

    // Position of (i, j), i < j, in the packed strict upper triangle.
    fn offset(&self, i: usize, j: usize) -> usize {
        i * self.size - i * (i + 1) / 2 + (j - i - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> Vec<SparseVector> {
        vec![
            SparseVector::from_term_ids(vec![0, 1]),
            SparseVector::from_term_ids(vec![0, 1]),
            SparseVector::from_term_ids(vec![1, 2]),
            SparseVector::from_term_ids(vec![3]),
            SparseVector::default(),
        ]
    }

    #[test]
    fn test_matches_direct_cosine() {
        let vs = vectors();
        let m = SimilarityMatrix::build(&vs);
        assert_eq!(m.size(), 5);
        for i in 0..vs.len() {
            for j in 0..vs.len() {
                let expected = if i == j { 1.0 } else { vs[i].cosine(&vs[j]) };
                assert!((m.get(i, j) - expected).abs() < 1e-6, "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_symmetric_with_unit_diagonal() {
        let m = SimilarityMatrix::build(&vectors());
        for i in 0..m.size() {
            assert_eq!(m.get(i, i), 1.0);
            for j in 0..m.size() {
                assert_eq!(m.get(i, j), m.get(j, i));
                assert!((0.0..=1.0).contains(&m.get(i, j)));
            }
        }
    }

    #[test]
    fn test_closeness_is_mean_over_other_rows() {
        let m = SimilarityMatrix::build(&vectors());
        let expected = (1.0 + 0.5 + 0.0 + 0.0) / 4.0;
        assert!((m.closeness(0) - expected).abs() < 1e-6);
        assert_eq!(m.closeness(4), 0.0);
    }

    #[test]
    fn test_single_and_empty() {
        let one = SimilarityMatrix::build(&[SparseVector::from_term_ids(vec![0])]);
        assert_eq!(one.get(0, 0), 1.0);
        assert_eq!(one.closeness(0), 0.0);

        let none = SimilarityMatrix::build(&[]);
        assert_eq!(none.size(), 0);
    }
}
