use serde::{Deserialize, Serialize};

use crate::model::Restaurant;

/// One ranked result, shaped for presentation and map layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Title-cased restaurant name.
    pub name: String,

    /// Cuisine list as it appears in the catalog.
    pub cuisines: String,

    /// Title-cased city.
    pub city: String,

    /// Similarity or closeness score, rounded to three decimals.
    pub score: f64,

    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl Recommendation {
    #[must_use]
    pub fn from_restaurant(restaurant: &Restaurant, score: f64) -> Self {
        Self {
            name: restaurant.display_name(),
            cuisines: restaurant.cuisines.clone(),
            city: restaurant.display_city(),
            score: round_score(score),
            latitude: restaurant.latitude,
            longitude: restaurant.longitude,
            address: restaurant.address.clone(),
        }
    }
}

/// Round a score to three decimal places.
#[must_use]
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score() {
        assert!((round_score(0.123_456) - 0.123).abs() < 1e-12);
        assert!((round_score(0.999_6) - 1.0).abs() < 1e-12);
        assert_eq!(round_score(0.0), 0.0);
    }

    #[test]
    fn test_from_restaurant() {
        let r = Restaurant::new("the yellow chilli", "gurgaon", "North Indian")
            .with_coordinates(28.47, 77.08)
            .with_address("Sector 29");
        let rec = Recommendation::from_restaurant(&r, 0.876_54);

        assert_eq!(rec.name, "The Yellow Chilli");
        assert_eq!(rec.city, "Gurgaon");
        assert_eq!(rec.cuisines, "North Indian");
        assert!((rec.score - 0.877).abs() < 1e-12);
        assert_eq!(rec.address, "Sector 29");
    }
}
