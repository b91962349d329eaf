use crate::domain::scoring::keyword_hits;
use crate::nlp::{
    Classifier, ClassifierError, ClassifierFields, LABEL_DEVELOPMENT, LABEL_MAYBE,
    LABEL_NOT_DEVELOPMENT,
};

// Lot size (sqft) from which the lot term of the score is maxed out.
const LARGE_LOT_SQFT: i64 = 10_000;
// Built before this year earns the full age bonus.
const OLD_HOUSE_YEAR: i64 = 1950;
// $/sqft of living area below which a house is mostly priced for its land.
const CHEAP_PER_SQFT: f64 = 250.0;

/// Rule-based stand-in used when no LLM is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn classify(&self, text: &str, fields: &ClassifierFields) -> Result<String, ClassifierError> {
        let large_lot = fields.lot_size.is_some_and(|lot| lot >= LARGE_LOT_SQFT);
        let old_house = fields.year_built.is_some_and(|year| year < OLD_HOUSE_YEAR);
        let cheap = match (fields.price, fields.living_area) {
            (Some(price), Some(area)) if area > 0 => (price as f64 / area as f64) < CHEAP_PER_SQFT,
            _ => false,
        };

        let label = if keyword_hits(Some(text)) > 0 || (large_lot && cheap) {
            LABEL_DEVELOPMENT
        } else if old_house || large_lot {
            LABEL_MAYBE
        } else {
            LABEL_NOT_DEVELOPMENT
        };
        Ok(label.to_string())
    }
}
