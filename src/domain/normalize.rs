// src/domain/normalize.rs

//! Helpers for turning loosely formatted listing values into numbers.

const SQFT_PER_ACRE: f64 = 43_560.0;

/// Strips everything but digits: "$1,250,000" -> 1250000.
/// Ranges like "$500K-$600K" are not understood; prefer an unformatted price
/// when the source has one.
pub fn parse_price(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First number in the text, commas ignored: "2.5 ba" -> 2.5, "1,840 sqft" -> 1840.0.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let number: String = cleaned[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.trim_end_matches('.').parse().ok()
}

/// Converts a lot area to square feet. Unknown units are assumed to already be sqft.
pub fn lot_area_to_sqft(value: f64, unit: Option<&str>) -> Option<i64> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    let sqft = match unit.map(|u| u.trim().to_lowercase()) {
        Some(u) if u.starts_with("acre") => value * SQFT_PER_ACRE,
        _ => value,
    };
    Some(sqft.round() as i64)
}
