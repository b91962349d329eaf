// src/domain/listing.rs

use crate::scraper::RawListing;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A listing normalized from a raw source record.
///
/// `url` is the identity key in the store, so a `Listing` cannot exist
/// without one. Everything a source may omit is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub source: String,
    pub url: String,

    pub address: Option<String>,
    pub price: Option<i64>,
    pub beds: Option<i64>,
    pub baths: Option<f64>,
    pub living_area: Option<i64>,
    pub lot_size: Option<i64>,
    pub year_built: Option<i64>,
    pub days_on_market: Option<i64>,
    pub status: Option<String>,
    pub description: Option<String>,

    /// Source-specific diagnostic fields, kept as-is.
    pub raw_json: Value,

    // Filled in by the pipeline
    pub classified_label: Option<String>,
    pub score: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// An otherwise empty listing for `url`.
    pub fn new(source: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            address: None,
            price: None,
            beds: None,
            baths: None,
            living_area: None,
            lot_size: None,
            year_built: None,
            days_on_market: None,
            status: None,
            description: None,
            raw_json: Value::Object(Default::default()),
            classified_label: None,
            score: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    /// Normalizes a raw provider record. Fails when the record has no usable URL,
    /// since such a record could never be persisted.
    pub fn from_raw(source: &str, raw: RawListing) -> Result<Self, String> {
        let url = raw
            .url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or("Missing or empty url")?
            .to_string();

        let text = |s: Option<String>| {
            s.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Listing {
            source: source.trim().to_lowercase(),
            url,
            address: text(raw.address),
            price: raw.price.filter(|p| *p > 0),
            beds: raw.beds.filter(|b| *b >= 0),
            baths: raw.baths.filter(|b| *b >= 0.0),
            living_area: raw.living_area.filter(|a| *a > 0),
            lot_size: raw.lot_size.filter(|l| *l > 0),
            year_built: raw.year_built.filter(|y| *y > 0),
            days_on_market: raw.days_on_market.filter(|d| *d >= 0),
            status: text(raw.status),
            description: text(raw.description),
            raw_json: Value::Object(raw.raw_json),
            classified_label: None,
            score: None,
            created_at: Utc::now(),
            processed_at: None,
        })
    }

    /// `raw_json` as stored in the `listings` table.
    pub fn raw_json_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.raw_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_raw_requires_a_url() {
        let raw = RawListing {
            url: Some("   ".to_string()),
            address: Some("1 Main St".to_string()),
            ..Default::default()
        };
        assert!(Listing::from_raw("zillow", raw).is_err());
        assert!(Listing::from_raw("zillow", RawListing::default()).is_err());
    }

    #[test]
    fn from_raw_cleans_fields() {
        let mut extra = serde_json::Map::new();
        extra.insert("zpid".to_string(), json!("12345"));

        let raw = RawListing {
            url: Some(" https://www.zillow.com/homedetails/12345_zpid/ ".to_string()),
            address: Some("  12 Elm St, Newton, MA  ".to_string()),
            price: Some(0),
            beds: Some(3),
            baths: Some(2.5),
            lot_size: Some(-10),
            status: Some("".to_string()),
            raw_json: extra,
            ..Default::default()
        };

        let listing = Listing::from_raw("Zillow", raw).unwrap();
        assert_eq!(listing.source, "zillow");
        assert_eq!(listing.url, "https://www.zillow.com/homedetails/12345_zpid/");
        assert_eq!(listing.address.as_deref(), Some("12 Elm St, Newton, MA"));
        assert_eq!(listing.price, None); // zero price is "unknown"
        assert_eq!(listing.lot_size, None);
        assert_eq!(listing.status, None);
        assert_eq!(listing.beds, Some(3));
        assert_eq!(listing.raw_json["zpid"], "12345");
        assert!(listing.classified_label.is_none());
        assert!(listing.score.is_none());
    }
}
