// src/domain/scoring.rs

//! Development-potential score.
//!
//! Points are accumulated per term and the classification multiplier is applied
//! last, so a listing must be classified before it is scored.

use crate::domain::Listing;
use crate::nlp::{LABEL_DEVELOPMENT, LABEL_MAYBE};

/// Phrases in a listing description that hint at a teardown or a builder deal.
pub const DEVELOPMENT_KEYWORDS: [&str; 6] = [
    "tear down",
    "tear-down",
    "builder",
    "contractor special",
    "development opportunity",
    "as is",
];

const KEYWORD_POINTS: f64 = 3.0;
const MAX_LOT_POINTS: f64 = 10.0;
// Missing year_built counts as a new house.
const UNKNOWN_YEAR: i64 = 9999;

/// Every term of a score, before and after the label multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub lot: f64,
    pub age: f64,
    pub price_per_lot: f64,
    pub keywords: f64,
    pub subtotal: f64,
    pub multiplier: f64,
    /// `subtotal * multiplier`, rounded to 3 decimals.
    pub total: f64,
}

pub fn score_listing(listing: &Listing) -> f64 {
    score_breakdown(listing).total
}

pub fn score_breakdown(listing: &Listing) -> ScoreBreakdown {
    let lot = listing.lot_size.filter(|l| *l > 0).unwrap_or(0);
    let year = listing.year_built.filter(|y| *y != 0).unwrap_or(UNKNOWN_YEAR);
    let price = listing.price.filter(|p| *p != 0).unwrap_or(1);

    let lot_term = (lot as f64 / 1000.0).min(MAX_LOT_POINTS);

    let age_term = if year < 1950 {
        5.0
    } else if year < 1980 {
        2.0
    } else {
        0.0
    };

    let pps = price as f64 / (lot as f64 + 1.0);
    let price_term = if pps < 50.0 {
        5.0
    } else if pps < 200.0 {
        2.0
    } else {
        0.0
    };

    let keyword_term = keyword_hits(listing.description.as_deref()) as f64 * KEYWORD_POINTS;

    let subtotal = lot_term + age_term + price_term + keyword_term;
    let multiplier = label_multiplier(listing.classified_label.as_deref());

    ScoreBreakdown {
        lot: lot_term,
        age: age_term,
        price_per_lot: price_term,
        keywords: keyword_term,
        subtotal,
        multiplier,
        total: round3(subtotal * multiplier),
    }
}

/// Number of distinct development keywords present in the description.
pub fn keyword_hits(description: Option<&str>) -> usize {
    let text = description.unwrap_or_default().to_lowercase();
    DEVELOPMENT_KEYWORDS
        .iter()
        .filter(|k| text.contains(*k))
        .count()
}

fn label_multiplier(label: Option<&str>) -> f64 {
    match label {
        Some(LABEL_DEVELOPMENT) => 1.5,
        Some(LABEL_MAYBE) => 1.1,
        _ => 1.0,
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::LABEL_ERROR;

    fn listing() -> Listing {
        Listing::new("test", "https://example.com/1")
    }

    #[test]
    fn contractor_special_scores_33() {
        let mut l = listing();
        l.price = Some(300_000);
        l.lot_size = Some(6000);
        l.year_built = Some(1930);
        l.description = Some("Contractor special, AS IS".to_string());
        l.classified_label = Some("development".to_string());

        let b = score_breakdown(&l);
        assert_eq!(b.lot, 6.0);
        assert_eq!(b.age, 5.0);
        assert_eq!(b.price_per_lot, 5.0);
        assert_eq!(b.keywords, 6.0);
        assert_eq!(b.subtotal, 22.0);
        assert_eq!(score_listing(&l), 33.0);
    }

    #[test]
    fn empty_listing_scores_5() {
        // price defaults to 1 -> pps = 1 / (0 + 1) < 50
        assert_eq!(score_listing(&listing()), 5.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let mut l = listing();
        l.price = Some(725_000);
        l.lot_size = Some(8_712);
        l.year_built = Some(1962);
        l.description = Some("Builder opportunity on a quiet street".to_string());
        l.classified_label = Some("maybe".to_string());

        let first = score_listing(&l);
        for _ in 0..10 {
            assert_eq!(score_listing(&l), first);
        }
    }

    #[test]
    fn terms_stay_in_bounds() {
        let mut l = listing();
        l.lot_size = Some(250_000);
        l.year_built = Some(1890);
        l.price = Some(50);
        l.description = Some(DEVELOPMENT_KEYWORDS.join(" / "));

        let b = score_breakdown(&l);
        assert_eq!(b.lot, 10.0);
        assert_eq!(b.age, 5.0);
        assert_eq!(b.price_per_lot, 5.0);
        assert_eq!(b.keywords, 18.0);

        l.year_built = Some(1975);
        assert_eq!(score_breakdown(&l).age, 2.0);
        l.year_built = Some(1980);
        assert_eq!(score_breakdown(&l).age, 0.0);
    }

    #[test]
    fn price_per_lot_bands() {
        let mut l = listing();
        l.lot_size = Some(4999);

        l.price = Some(600_000); // 120 per sqft
        assert_eq!(score_breakdown(&l).price_per_lot, 2.0);

        l.price = Some(1_500_000); // 300 per sqft
        assert_eq!(score_breakdown(&l).price_per_lot, 0.0);
    }

    #[test]
    fn multiplier_is_applied_last() {
        let mut base = listing();
        base.price = Some(450_000);
        base.lot_size = Some(12_000);
        base.year_built = Some(1948);
        base.description = Some("Tear-down, builder welcome".to_string());

        let neutral = score_breakdown(&base);
        assert_eq!(neutral.multiplier, 1.0);

        let mut dev = base.clone();
        dev.classified_label = Some("development".to_string());
        assert_eq!(score_listing(&dev), round3(neutral.subtotal * 1.5));

        let mut maybe = base.clone();
        maybe.classified_label = Some("maybe".to_string());
        assert_eq!(score_listing(&maybe), round3(neutral.subtotal * 1.1));

        let mut errored = base.clone();
        errored.classified_label = Some(LABEL_ERROR.to_string());
        assert_eq!(score_listing(&errored), neutral.total);

        let mut not_dev = base;
        not_dev.classified_label = Some("not_development".to_string());
        assert_eq!(score_listing(&not_dev), neutral.total);
    }

    #[test]
    fn keywords_stack_but_count_once_each() {
        assert_eq!(keyword_hits(Some("as is, as is, AS IS")), 1);
        assert_eq!(keyword_hits(Some("tear down or tear-down")), 2);
        assert_eq!(keyword_hits(None), 0);
    }
}
