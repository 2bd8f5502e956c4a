//! Loading the restaurant catalog from a CSV export.
//!
//! The catalog is a header-led CSV with at least the `Restaurant Name`,
//! `City` and `Cuisines` columns. `Price range`, `Aggregate rating`,
//! `Latitude`, `Longitude` and `Address` are optional; when a column is
//! absent every row gets that field's default. Cells are decoded lossily
//! because public exports of this dataset are not always valid UTF-8.

use std::borrow::Cow;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};

use crate::error::{Error, Result};
use crate::model::Restaurant;
use crate::parse::{normalize_key, parse_coordinate, parse_price_tier, parse_rating};

pub const COL_NAME: &str = "Restaurant Name";
pub const COL_CITY: &str = "City";
pub const COL_CUISINES: &str = "Cuisines";
pub const COL_PRICE: &str = "Price range";
pub const COL_RATING: &str = "Aggregate rating";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";
pub const COL_ADDRESS: &str = "Address";

/// Load the catalog from a CSV file.
///
/// # Errors
///
/// Returns [`Error::CatalogUnavailable`] if the file cannot be opened or
/// parsed, and [`Error::MissingColumn`] if a required column is absent.
/// Unparseable numeric cells never fail the load.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<Restaurant>> {
    let path = path.as_ref();
    let unavailable = |reason: String| Error::CatalogUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let rows = read_catalog(file).map_err(|e| match e {
        Error::Csv(err) => unavailable(err.to_string()),
        Error::Io(err) => unavailable(err.to_string()),
        other => other,
    })?;

    log::info!("Loaded {} restaurants from {}", rows.len(), path.display());
    Ok(rows)
}

/// The first row whose normalized name equals `name`, optionally
/// restricted to a city. Blank names never match.
#[must_use]
pub fn find_restaurant<'a>(
    rows: &'a [Restaurant],
    name: &str,
    city: Option<&str>,
) -> Option<&'a Restaurant> {
    let name = normalize_key(name);
    if name.is_empty() {
        return None;
    }
    let city = city.map(normalize_key).filter(|c| !c.is_empty());

    rows.iter().find(|row| {
        row.name_key() == name && city.as_deref().is_none_or(|c| row.city_key() == c)
    })
}

/// Read a catalog from any CSV source.
pub fn read_catalog<R: io::Read>(source: R) -> Result<Vec<Restaurant>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);

    let headers = reader.byte_headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        rows.push(columns.restaurant(&record?));
    }

    log::debug!("Parsed {} catalog rows", rows.len());
    Ok(rows)
}

/// Positions of the known columns within the header row.
#[derive(Debug)]
struct Columns {
    name: usize,
    city: usize,
    cuisines: usize,
    price: Option<usize>,
    rating: Option<usize>,
    latitude: Option<usize>,
    longitude: Option<usize>,
    address: Option<usize>,
}

impl Columns {
    fn locate(headers: &ByteRecord) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim_matches(is_header_padding) == column)
        };
        let require = |column: &'static str| find(column).ok_or(Error::MissingColumn { column });

        Ok(Self {
            name: require(COL_NAME)?,
            city: require(COL_CITY)?,
            cuisines: require(COL_CUISINES)?,
            price: find(COL_PRICE),
            rating: find(COL_RATING),
            latitude: find(COL_LATITUDE),
            longitude: find(COL_LONGITUDE),
            address: find(COL_ADDRESS),
        })
    }

    fn restaurant(&self, record: &ByteRecord) -> Restaurant {
        let text = |idx: Option<usize>| cell(record, idx);

        Restaurant::new(
            text(Some(self.name)).into_owned(),
            text(Some(self.city)).into_owned(),
            text(Some(self.cuisines)).into_owned(),
        )
        .with_price_tier(parse_price_tier(&text(self.price)))
        .with_rating(parse_rating(&text(self.rating)))
        .with_coordinates(
            parse_coordinate(&text(self.latitude)),
            parse_coordinate(&text(self.longitude)),
        )
        .with_address(text(self.address).into_owned())
    }
}

fn is_header_padding(c: char) -> bool {
    c == '\u{feff}' || c.is_whitespace()
}

fn cell(record: &ByteRecord, idx: Option<usize>) -> Cow<'_, str> {
    idx.and_then(|i| record.get(i))
        .map(String::from_utf8_lossy)
        .unwrap_or(Cow::Borrowed(""))
}
