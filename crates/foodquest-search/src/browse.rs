//! Plain catalog lookup by name, city or cuisine, without ranking.

use foodquest_core::model::Restaurant;
use foodquest_core::parse::normalize_key;

use crate::index::CatalogIndex;

/// Row cap used when the caller does not ask for one.
pub const DEFAULT_BROWSE_LIMIT: usize = 100;

impl CatalogIndex {
    /// Rows whose name, city and cuisines contain the given fragments
    /// (case-insensitive), in catalog order, at most `limit` of them.
    ///
    /// Blank fragments place no constraint. Returns `None` when every
    /// fragment is blank: listing the whole catalog is not a lookup.
    #[must_use]
    pub fn browse(
        &self,
        name: &str,
        city: &str,
        cuisine: &str,
        limit: usize,
    ) -> Option<Vec<&Restaurant>> {
        let name = normalize_key(name);
        let city = normalize_key(city);
        let cuisine = normalize_key(cuisine);
        if name.is_empty() && city.is_empty() && cuisine.is_empty() {
            return None;
        }

        let rows = self
            .rows()
            .iter()
            .filter(|row| row.name_key().contains(name.as_str()))
            .filter(|row| row.city_key().contains(city.as_str()))
            .filter(|row| row.cuisines_key().contains(cuisine.as_str()))
            .take(limit)
            .collect();
        Some(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> CatalogIndex {
        let mut rows = vec![
            Restaurant::new("Pizza Hut", "New Delhi", "Italian, Pizza"),
            Restaurant::new("Pizza Hut", "Mumbai", "Italian, Pizza"),
            Restaurant::new("Sushi Zen", "Mumbai", "Japanese, Sushi"),
        ];
        for i in 0..150 {
            rows.push(Restaurant::new(format!("Chai Point {i}"), "Bangalore", "Cafe"));
        }
        CatalogIndex::build(rows)
    }

    #[test]
    fn test_blank_filter_is_refused() {
        let index = index();
        assert!(index.browse("", "", "", DEFAULT_BROWSE_LIMIT).is_none());
        assert!(index.browse("  ", " ", "", DEFAULT_BROWSE_LIMIT).is_none());
    }

    #[test]
    fn test_browse_is_capped() {
        let index = index();
        let rows = index.browse("", "bangalore", "", DEFAULT_BROWSE_LIMIT).unwrap();
        assert_eq!(rows.len(), DEFAULT_BROWSE_LIMIT);
        assert_eq!(rows[0].name, "Chai Point 0");

        assert_eq!(index.browse("chai", "", "", 5).unwrap().len(), 5);
    }

    #[test]
    fn test_browse_matches_substrings_case_insensitively() {
        let index = index();

        let by_name = index.browse("PIZZA", "", "", DEFAULT_BROWSE_LIMIT).unwrap();
        assert_eq!(by_name.len(), 2);

        let combined = index.browse("pizza", "mum", "", DEFAULT_BROWSE_LIMIT).unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].city, "Mumbai");

        let by_cuisine = index.browse("", "", "japanese", DEFAULT_BROWSE_LIMIT).unwrap();
        assert_eq!(by_cuisine[0].name, "Sushi Zen");

        assert!(index.browse("tandoor", "", "", DEFAULT_BROWSE_LIMIT).unwrap().is_empty());
    }
}
