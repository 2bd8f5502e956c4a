/// A sparse term-count vector.
///
/// Term ids are strictly ascending and every stored count is non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseVector {
    terms: Vec<u32>,
    counts: Vec<u32>,
}

impl SparseVector {
    /// Build a vector from term ids, counting repeats.
    #[must_use]
    pub fn from_term_ids(mut ids: Vec<u32>) -> Self {
        ids.sort_unstable();

        let mut terms: Vec<u32> = Vec::with_capacity(ids.len());
        let mut counts: Vec<u32> = Vec::with_capacity(ids.len());
        for id in ids {
            match terms.last() {
                Some(&last) if last == id => {
                    if let Some(count) = counts.last_mut() {
                        *count += 1;
                    }
                }
                _ => {
                    terms.push(id);
                    counts.push(1);
                }
            }
        }

        Self { terms, counts }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.terms.len()
    }

    /// `(term id, count)` pairs in ascending term order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.terms.iter().copied().zip(self.counts.iter().copied())
    }

    #[must_use]
    pub fn count(&self, term: u32) -> u32 {
        self.terms
            .binary_search(&term)
            .map(|pos| self.counts[pos])
            .unwrap_or(0)
    }

    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        let (mut a, mut b) = (0, 0);
        let mut sum = 0.0;
        while a < self.terms.len() && b < other.terms.len() {
            match self.terms[a].cmp(&other.terms[b]) {
                std::cmp::Ordering::Less => a += 1,
                std::cmp::Ordering::Greater => b += 1,
                std::cmp::Ordering::Equal => {
                    sum += f64::from(self.counts[a]) * f64::from(other.counts[b]);
                    a += 1;
                    b += 1;
                }
            }
        }
        sum
    }

    #[must_use]
    pub fn l2_norm(&self) -> f64 {
        self.counts
            .iter()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    }

    /// Cosine similarity in `[0, 1]`; `0.0` if either vector is empty.
    #[must_use]
    pub fn cosine(&self, other: &Self) -> f64 {
        let denom = self.l2_norm() * other.l2_norm();
        if denom == 0.0 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_term_ids_counts_repeats() {
        let v = SparseVector::from_term_ids(vec![3, 1, 3, 0, 3]);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 1), (3, 3)]);
        assert_eq!(v.count(3), 3);
        assert_eq!(v.count(2), 0);
        assert_eq!(v.nnz(), 3);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = SparseVector::from_term_ids(vec![0, 1, 1]);
        let b = SparseVector::from_term_ids(vec![1, 2]);
        assert!((a.dot(&b) - 2.0).abs() < 1e-12);
        assert!((a.l2_norm() - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cosine() {
        let a = SparseVector::from_term_ids(vec![0, 1]);
        let b = SparseVector::from_term_ids(vec![1, 0]);
        let c = SparseVector::from_term_ids(vec![2]);
        assert!((a.cosine(&b) - 1.0).abs() < 1e-12);
        assert_eq!(a.cosine(&c), 0.0);
        assert_eq!(a.cosine(&SparseVector::default()), 0.0);
    }
}
