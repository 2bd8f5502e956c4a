//! The two recommendation strategies over a [`CatalogIndex`].
//!
//! Both return at most `top_n` [`Recommendation`]s, best first, with at most
//! one entry per display name. Nothing found is an empty vector, never an
//! error.

use std::collections::HashSet;
use std::fmt;

use foodquest_core::model::{Recommendation, Restaurant};
use foodquest_core::parse::normalize_key;
use serde::{Deserialize, Serialize};

use crate::index::CatalogIndex;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_TOP_N: usize = 10;

/// Declared preferences for a preference query. `None` or blank fields
/// place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    pub cuisine: Option<String>,
    pub city: Option<String>,
    pub price_tier: Option<u8>,
    pub min_rating: Option<f64>,
}

impl Preferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn with_price_tier(mut self, price_tier: u8) -> Self {
        self.price_tier = Some(price_tier);
        self
    }

    #[must_use]
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }
}

/// One step of the preference filter, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelaxationTier {
    /// City, cuisine, price and rating.
    Full,
    /// City, cuisine and rating.
    WithoutPrice,
    /// City and rating.
    CityAndRating,
    CityOnly,
    /// The whole catalog.
    Everything,
}

impl RelaxationTier {
    pub const ALL: [Self; 5] = [
        Self::Full,
        Self::WithoutPrice,
        Self::CityAndRating,
        Self::CityOnly,
        Self::Everything,
    ];

    const fn keeps_cuisine(self) -> bool {
        matches!(self, Self::Full | Self::WithoutPrice)
    }

    const fn keeps_price(self) -> bool {
        matches!(self, Self::Full)
    }

    const fn keeps_rating(self) -> bool {
        matches!(self, Self::Full | Self::WithoutPrice | Self::CityAndRating)
    }

    const fn keeps_city(self) -> bool {
        !matches!(self, Self::Everything)
    }
}

impl fmt::Display for RelaxationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Full => "all preferences",
            Self::WithoutPrice => "ignoring price",
            Self::CityAndRating => "city and rating only",
            Self::CityOnly => "city only",
            Self::Everything => "whole catalog",
        };
        f.write_str(label)
    }
}

/// Preference query results along with the tier that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceOutcome {
    pub tier: RelaxationTier,
    pub results: Vec<Recommendation>,
}

/// Normalized, blank-stripped preferences.
#[derive(Debug)]
struct Filter {
    city: Option<String>,
    cuisine: Option<String>,
    price_tier: Option<u8>,
    min_rating: Option<f64>,
}

impl Filter {
    fn new(prefs: &Preferences) -> Self {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(normalize_key)
                .filter(|v| !v.is_empty())
        };
        Self {
            city: text(&prefs.city),
            cuisine: text(&prefs.cuisine),
            price_tier: prefs.price_tier,
            min_rating: prefs.min_rating.filter(|r| !r.is_nan()),
        }
    }

    fn accepts(&self, row: &Restaurant, tier: RelaxationTier) -> bool {
        if tier.keeps_city() {
            if let Some(city) = &self.city {
                if !row.city_key().contains(city.as_str()) {
                    return false;
                }
            }
        }
        if tier.keeps_cuisine() {
            if let Some(cuisine) = &self.cuisine {
                if !row.cuisines_key().contains(cuisine.as_str()) {
                    return false;
                }
            }
        }
        if tier.keeps_price() {
            if let (Some(wanted), Some(actual)) = (self.price_tier, row.price_tier) {
                if wanted.abs_diff(actual) > 1 {
                    return false;
                }
            }
        }
        if tier.keeps_rating() {
            if let Some(min_rating) = self.min_rating {
                if row.rating < min_rating {
                    return false;
                }
            }
        }
        true
    }
}

impl CatalogIndex {
    /// Restaurants in `city` most similar to the named reference restaurant.
    ///
    /// The reference is the first row whose normalized name equals
    /// `reference_name`, or failing that the first whose name contains it,
    /// in either case with a normalized city equal to `city`. Returns an
    /// empty vector when there is no such row.
    #[must_use]
    pub fn recommend(&self, reference_name: &str, city: &str, top_n: usize) -> Vec<Recommendation> {
        let name = normalize_key(reference_name);
        let city = normalize_key(city);
        if name.is_empty() || top_n == 0 {
            return Vec::new();
        }

        let in_city = |row: &Restaurant| row.city_key() == city;
        let reference = self
            .rows()
            .iter()
            .position(|row| in_city(row) && row.name_key() == name)
            .or_else(|| {
                self.rows()
                    .iter()
                    .position(|row| in_city(row) && row.name_key().contains(name.as_str()))
            });

        let Some(reference) = reference else {
            log::debug!("No restaurant matching {name:?} in {city:?}");
            return Vec::new();
        };

        let similarity = self.similarity();
        let scored = self
            .rows()
            .iter()
            .enumerate()
            .filter(|&(idx, row)| idx != reference && in_city(row))
            .map(|(idx, _)| (idx, similarity.get(reference, idx)))
            .collect();

        self.collect_ranked(scored, top_n)
    }

    /// Restaurants matching declared preferences, ranked by how close each
    /// is to the catalog as a whole.
    ///
    /// When no row passes every preference the filter is relaxed one tier at
    /// a time (see [`RelaxationTier`]), so a non-empty catalog always yields
    /// results.
    #[must_use]
    pub fn recommend_by_preferences(&self, prefs: &Preferences, top_n: usize) -> Vec<Recommendation> {
        self.recommend_by_preferences_with_tier(prefs, top_n).results
    }

    /// Like [`recommend_by_preferences`](Self::recommend_by_preferences),
    /// also reporting which relaxation tier produced the results.
    #[must_use]
    pub fn recommend_by_preferences_with_tier(
        &self,
        prefs: &Preferences,
        top_n: usize,
    ) -> PreferenceOutcome {
        let filter = Filter::new(prefs);

        for tier in RelaxationTier::ALL {
            let survivors: Vec<usize> = self
                .rows()
                .iter()
                .enumerate()
                .filter(|(_, row)| filter.accepts(row, tier))
                .map(|(idx, _)| idx)
                .collect();

            if survivors.is_empty() {
                continue;
            }

            log::debug!("{} rows match preferences ({tier})", survivors.len());
            let similarity = self.similarity();
            let scored = survivors
                .into_iter()
                .map(|idx| (idx, similarity.closeness(idx)))
                .collect();

            return PreferenceOutcome {
                tier,
                results: self.collect_ranked(scored, top_n),
            };
        }

        PreferenceOutcome {
            tier: RelaxationTier::Everything,
            results: Vec::new(),
        }
    }

    /// Sort by score, best first (ties keep catalog order), then keep the
    /// first row per display name until `top_n` are collected.
    fn collect_ranked(&self, mut scored: Vec<(usize, f64)>, top_n: usize) -> Vec<Recommendation> {
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut seen = HashSet::new();
        let mut results = Vec::with_capacity(top_n.min(scored.len()));
        for (idx, score) in scored {
            if results.len() >= top_n {
                break;
            }
            let Some(row) = self.row(idx) else { continue };
            if seen.insert(row.display_name()) {
                results.push(Recommendation::from_restaurant(row, score));
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CatalogIndex {
        CatalogIndex::build(vec![
            Restaurant::new("Pizza Hut", "Delhi", "Italian, Pizza").with_price_tier(Some(2)),
            Restaurant::new("Pizza Express", "Delhi", "Italian, Pizza").with_price_tier(Some(3)),
            Restaurant::new("Bikanervala", "Delhi", "North Indian, Mithai").with_rating(4.1),
            Restaurant::new("Pizza Hut", "Mumbai", "Italian, Pizza"),
        ])
    }

    #[test]
    fn test_exact_match_beats_substring() {
        let index = CatalogIndex::build(vec![
            Restaurant::new("Pizza Hut Express", "Delhi", "Fast Food"),
            Restaurant::new("Pizza Hut", "Delhi", "Italian"),
            Restaurant::new("Italian Hut", "Delhi", "Italian, Pizza"),
            Restaurant::new("Burger Shack", "Delhi", "Fast Food"),
        ]);
        let results = index.recommend("pizza hut", "delhi", 1);
        assert_eq!(results[0].name, "Italian Hut");
    }

    #[test]
    fn test_substring_fallback() {
        let results = index().recommend("express", "Delhi", 10);
        assert_eq!(results[0].name, "Pizza Hut");
    }

    #[test]
    fn test_recommend_stays_in_city() {
        let results = index().recommend("Pizza Hut", "delhi", 10);
        assert!(results.iter().all(|r| r.city == "Delhi"));
        assert!(results.iter().all(|r| r.name != "Pizza Hut"));
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_blank_name_or_zero_top_n() {
        assert!(index().recommend("  ", "Delhi", 10).is_empty());
        assert!(index().recommend("Pizza Hut", "Delhi", 0).is_empty());
    }

    #[test]
    fn test_preference_filters() {
        let prefs = Preferences::new().with_cuisine("PIZZA").with_city("delhi");
        let outcome = index().recommend_by_preferences_with_tier(&prefs, 10);
        assert_eq!(outcome.tier, RelaxationTier::Full);
        let names: Vec<&str> = outcome.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Pizza Hut"));
        assert!(names.contains(&"Pizza Express"));
    }

    #[test]
    fn test_price_window_and_unknown_price() {
        let index = CatalogIndex::build(vec![
            Restaurant::new("Cheap", "Pune", "Cafe").with_price_tier(Some(1)),
            Restaurant::new("Mid", "Pune", "Cafe").with_price_tier(Some(3)),
            Restaurant::new("Posh", "Pune", "Cafe").with_price_tier(Some(4)),
            Restaurant::new("Unknown", "Pune", "Cafe"),
        ]);
        let prefs = Preferences::new().with_price_tier(4);
        let names: Vec<String> = index
            .recommend_by_preferences(&prefs, 10)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names.len(), 3);
        assert!(!names.contains(&"Cheap".to_string()));
    }

    #[test]
    fn test_relaxation_drops_price_first() {
        let prefs = Preferences::new()
            .with_city("Delhi")
            .with_cuisine("mithai")
            .with_price_tier(4)
            .with_min_rating(4.0);
        let index = CatalogIndex::build(vec![Restaurant::new("Bikanervala", "Delhi", "Mithai")
            .with_price_tier(Some(1))
            .with_rating(4.1)]);
        let outcome = index.recommend_by_preferences_with_tier(&prefs, 10);
        assert_eq!(outcome.tier, RelaxationTier::WithoutPrice);
        assert_eq!(outcome.results.len(), 1);
    }

    #[test]
    fn test_relaxation_keeps_city_before_catalog() {
        let prefs = Preferences::new()
            .with_city("mumbai")
            .with_cuisine("sushi")
            .with_min_rating(4.9);
        let outcome = index().recommend_by_preferences_with_tier(&prefs, 10);
        assert_eq!(outcome.tier, RelaxationTier::CityOnly);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].city, "Mumbai");
    }

    #[test]
    fn test_empty_catalog_yields_nothing() {
        let index = CatalogIndex::build(Vec::new());
        let outcome = index.recommend_by_preferences_with_tier(&Preferences::new(), 10);
        assert!(outcome.results.is_empty());
        assert!(index.recommend("a", "b", 10).is_empty());
    }

    #[test]
    fn test_tier_order() {
        assert!(RelaxationTier::Full < RelaxationTier::Everything);
        assert_eq!(RelaxationTier::CityOnly.to_string(), "city only");
    }
}
