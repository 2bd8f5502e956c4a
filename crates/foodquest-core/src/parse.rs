//! Parse-or-default rules for catalog fields.
//!
//! Every numeric cell in the catalog goes through exactly one of these
//! functions when the catalog is loaded. None of them fail: a cell that
//! does not parse is replaced by the field's documented default.

/// Lowercased, trimmed form of a text field, used only for matching.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Display form of a name or city.
///
/// Upper-cases the first character of every word and lower-cases the rest.
/// Letters, digits and apostrophes belong to a word; anything else ends it,
/// so `"mcdonald's"` becomes `"Mcdonald's"` and `"7th heaven"` becomes
/// `"7th Heaven"`.
#[must_use]
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for c in raw.trim().chars() {
        if c.is_alphanumeric() || c == '\'' {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

/// Price tier: an integer (or integral float such as `"2.0"`) in `0..=255`.
///
/// Anything else, including the empty string, is `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_price_tier(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if let Ok(tier) = raw.parse::<u8>() {
        return Some(tier);
    }

    let value = parse_finite(raw)?;
    if value.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

/// Aggregate rating, `0.0` when absent or not a finite number.
#[must_use]
pub fn parse_rating(raw: &str) -> f64 {
    parse_finite(raw).unwrap_or(0.0)
}

/// Latitude or longitude, `0.0` when absent or not a finite number.
#[must_use]
pub fn parse_coordinate(raw: &str) -> f64 {
    parse_finite(raw).unwrap_or(0.0)
}

// `str::parse::<f64>` accepts "NaN" and "inf"; neither is a usable value here.
fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
