//! Bag-of-words count vectorizer.
//!
//! Tokens are maximal runs of Unicode word characters (letters, combining
//! marks, digits, connector punctuation), lowercased, at least two
//! characters long and not English stop words.
//! The vocabulary is fixed by [`Vocabulary::fit`] and term ids follow the
//! alphabetical order of the terms, so the same corpus always yields the
//! same ids.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::sparse::SparseVector;
use crate::stopwords::is_stop_word;

#[allow(clippy::expect_used)]
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\w\w+").expect("token pattern is valid"))
}

/// Split text into lowercased, stop-word-filtered tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| !is_stop_word(word))
}

/// Term to id mapping learned from a corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<String, u32>,
}

impl Vocabulary {
    /// Learn the vocabulary of a corpus.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn fit<'a, I>(corpus: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let terms: BTreeSet<String> = corpus.into_iter().flat_map(|text| tokenize(text)).collect();
        let ids = terms
            .into_iter()
            .enumerate()
            .map(|(id, term)| (term, id as u32))
            .collect();
        Self { ids }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn id(&self, term: &str) -> Option<u32> {
        self.ids.get(term).copied()
    }

    /// Count vector of a document. Terms outside the vocabulary are ignored.
    #[must_use]
    pub fn transform(&self, text: &str) -> SparseVector {
        SparseVector::from_term_ids(tokenize(text).filter_map(|t| self.id(&t)).collect())
    }
}
