//! Listing classification.
//!
//! A classifier maps listing text plus a few numeric fields to one label of a
//! configured set. Adapters turn their own failures into [`LABEL_ERROR`], so the
//! pipeline always gets a label back; an `Err` means the listing itself could not
//! be classified.

mod heuristic;
mod openai;

pub use heuristic::HeuristicClassifier;
pub use openai::OpenAiClassifier;

use crate::domain::Listing;
use serde::Serialize;
use thiserror::Error;

pub const LABEL_DEVELOPMENT: &str = "development";
pub const LABEL_NOT_DEVELOPMENT: &str = "not_development";
pub const LABEL_MAYBE: &str = "maybe";
/// Sentinel stored when no real label could be produced.
pub const LABEL_ERROR: &str = "error";

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid classifier input: {0}")]
    Input(String),
    #[error("classifier request failed: {0}")]
    Request(String),
    #[error("unusable classifier response: {0}")]
    Response(String),
}

/// Numeric fields sent along with the listing text.
///
/// Only price, beds, baths and living area are serialized into a prompt; lot
/// size and year built are there for the rule-based classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifierFields {
    pub price: Option<i64>,
    pub beds: Option<i64>,
    pub baths: Option<f64>,
    pub living_area: Option<i64>,
    #[serde(skip)]
    pub lot_size: Option<i64>,
    #[serde(skip)]
    pub year_built: Option<i64>,
}

impl ClassifierFields {
    pub fn from_listing(listing: &Listing) -> Self {
        Self {
            price: listing.price,
            beds: listing.beds,
            baths: listing.baths,
            living_area: listing.living_area,
            lot_size: listing.lot_size,
            year_built: listing.year_built,
        }
    }
}

/// Address and serialized raw diagnostics, separated by one space.
pub fn listing_text(listing: &Listing) -> Result<String, serde_json::Error> {
    let address = listing.address.as_deref().unwrap_or_default();
    Ok(format!("{address} {}", listing.raw_json_text()?))
}

pub trait Classifier {
    fn classify(&self, text: &str, fields: &ClassifierFields) -> Result<String, ClassifierError>;
}

/// The closed set of labels a run accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::new([LABEL_DEVELOPMENT, LABEL_NOT_DEVELOPMENT, LABEL_MAYBE])
    }
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = normalize_label(label.as_ref());
            if !label.is_empty() && label != LABEL_ERROR && !out.contains(&label) {
                out.push(label);
            }
        }
        Self { labels: out }
    }

    /// Parses a comma separated list, e.g. "development,not_development,maybe".
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Maps a classifier answer onto the set. Anything outside it becomes the
    /// error sentinel.
    pub fn resolve(&self, answer: &str) -> String {
        let label = normalize_label(answer);
        if label == LABEL_ERROR || !self.contains(&label) {
            return LABEL_ERROR.to_string();
        }
        label
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
        .trim()
        .to_lowercase()
        .replace(['-', ' '], "_")
}
