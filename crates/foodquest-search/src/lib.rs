//! Content-similarity recommendation engine for foodquest.
//!
//! A [`CatalogIndex`] turns every restaurant's cuisines, name and city into
//! a bag-of-words count vector and precomputes the cosine similarity of
//! every pair of rows. Two read-only queries run against it:
//!
//! - [`CatalogIndex::recommend`] ranks restaurants in a city by similarity
//!   to a named reference restaurant.
//! - [`CatalogIndex::recommend_by_preferences`] filters by cuisine, city,
//!   price and rating, relaxing the filter until something matches, and
//!   ranks survivors by their mean similarity to the whole catalog.
//!
//! [`CatalogIndex::browse`] is a plain unranked lookup by name, city and
//! cuisine fragments.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod browse;
pub mod index;
pub mod query;
pub mod similarity;
pub mod sparse;
pub mod stopwords;
pub mod vectorizer;

pub use browse::DEFAULT_BROWSE_LIMIT;
pub use index::CatalogIndex;
pub use query::{PreferenceOutcome, Preferences, RelaxationTier, DEFAULT_TOP_N};
pub use similarity::SimilarityMatrix;
