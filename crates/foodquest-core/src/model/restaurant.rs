use serde::Serialize;

use crate::parse::{normalize_key, title_case};

/// One row of the restaurant catalog.
///
/// Rows are immutable once loaded. Text fields keep their original casing
/// for display; the lowercased keys used for matching are derived once at
/// construction and can only be read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub name: String,
    pub city: String,

    /// Comma separated cuisine list, e.g. "North Indian, Chinese".
    pub cuisines: String,

    /// Ordinal price tier (1 = cheapest). `None` when the source cell was
    /// missing or not an integer.
    pub price_tier: Option<u8>,

    /// Aggregate rating, 0.0 when unknown.
    pub rating: f64,

    /// Always finite; 0.0 when unknown.
    pub latitude: f64,

    /// Always finite; 0.0 when unknown.
    pub longitude: f64,

    pub address: String,

    #[serde(skip)]
    name_key: String,
    #[serde(skip)]
    city_key: String,
    #[serde(skip)]
    cuisines_key: String,
}

impl Restaurant {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        cuisines: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let city = city.into();
        let cuisines = cuisines.into();
        Self {
            name_key: normalize_key(&name),
            city_key: normalize_key(&city),
            cuisines_key: cuisines.to_lowercase(),
            name,
            city,
            cuisines,
            price_tier: None,
            rating: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            address: String::new(),
        }
    }

    #[must_use]
    pub fn with_price_tier(mut self, price_tier: Option<u8>) -> Self {
        self.price_tier = price_tier;
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = finite_or_zero(rating);
        self
    }

    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = finite_or_zero(latitude);
        self.longitude = finite_or_zero(longitude);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Trimmed, lowercased name.
    #[must_use]
    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    /// Trimmed, lowercased city.
    #[must_use]
    pub fn city_key(&self) -> &str {
        &self.city_key
    }

    /// Lowercased cuisine list.
    #[must_use]
    pub fn cuisines_key(&self) -> &str {
        &self.cuisines_key
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    #[must_use]
    pub fn display_city(&self) -> String {
        title_case(&self.city)
    }

    /// Text the feature vector is built from: cuisines, name and city.
    #[must_use]
    pub fn feature_text(&self) -> String {
        format!("{} {} {}", self.cuisines, self.name, self.city)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
