// fallback.rs
use crate::domain::Listing;
use crate::scraper::{MockGenerator, SourceProvider};
use rand::Rng;

/// Why a source's live results were not used.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The provider answered with nothing usable.
    NoResults,
    /// The provider failed; the message is kept for the run report.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Live,
    Mock(FallbackReason),
    Empty(FallbackReason),
}

/// Everything one source contributed to a run.
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub source: String,
    pub outcome: FetchOutcome,
    pub listings: Vec<Listing>,
    /// Raw records thrown away because they could not be normalized.
    pub dropped: usize,
}

/// Calls the provider once. Failures and empty answers are not errors: they are
/// replaced by mock listings when `mock` is given, and by nothing otherwise.
pub fn fetch_with_fallback<R: Rng>(
    provider: &dyn SourceProvider,
    max_pages: Option<u32>,
    mock: Option<&MockGenerator>,
    rng: &mut R,
) -> SourceBatch {
    let source = provider.name().trim().to_lowercase();
    tracing::info!(source = %source, "attempting to scrape");

    let mut dropped = 0;
    let reason = match provider.fetch(max_pages) {
        Ok(records) => {
            let total = records.len();
            let listings: Vec<Listing> = records
                .into_iter()
                .filter_map(|raw| match Listing::from_raw(&source, raw) {
                    Ok(l) => Some(l),
                    Err(e) => {
                        tracing::warn!(source = %source, reason = %e, "dropping raw record");
                        None
                    }
                })
                .collect();
            dropped = total - listings.len();

            if !listings.is_empty() {
                tracing::info!(source = %source, count = listings.len(), dropped, "source succeeded");
                return SourceBatch {
                    source,
                    outcome: FetchOutcome::Live,
                    listings,
                    dropped,
                };
            }
            tracing::warn!(source = %source, dropped, "source returned no results");
            FallbackReason::NoResults
        }
        Err(e) => {
            tracing::error!(source = %source, error = %e, "source failed");
            FallbackReason::Failed(e.to_string())
        }
    };

    match mock {
        Some(generator) => {
            let listings = generator.generate(&source, rng);
            tracing::info!(source = %source, count = listings.len(), "using mock data");
            SourceBatch {
                source,
                outcome: FetchOutcome::Mock(reason),
                listings,
                dropped,
            }
        }
        None => {
            tracing::warn!(source = %source, "mock data disabled, source contributes nothing");
            SourceBatch {
                source,
                outcome: FetchOutcome::Empty(reason),
                listings: Vec::new(),
                dropped,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::{RawListing, SourceError, UnsupportedSource};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FixedSource {
        name: &'static str,
        records: Vec<RawListing>,
    }

    impl SourceProvider for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch(&self, _max_pages: Option<u32>) -> Result<Vec<RawListing>, SourceError> {
            Ok(self.records.clone())
        }
    }

    fn raw(url: Option<&str>) -> RawListing {
        RawListing {
            url: url.map(String::from),
            price: Some(500_000),
            ..Default::default()
        }
    }

    fn mock() -> MockGenerator {
        MockGenerator::new("Newton, MA", 2..=5)
    }

    #[test]
    fn live_results_pass_through() {
        let provider = FixedSource {
            name: "Zillow",
            records: vec![raw(Some("https://z.com/1")), raw(Some("https://z.com/2"))],
        };
        let batch = fetch_with_fallback(&provider, Some(1), Some(&mock()), &mut StdRng::seed_from_u64(1));

        assert_eq!(batch.outcome, FetchOutcome::Live);
        assert_eq!(batch.listings.len(), 2);
        assert!(batch.listings.iter().all(|l| l.source == "zillow"));
    }

    #[test]
    fn failure_with_mock_gives_tagged_listings() {
        let provider = UnsupportedSource::new("redfin");
        let batch = fetch_with_fallback(&provider, None, Some(&mock()), &mut StdRng::seed_from_u64(3));

        assert!(matches!(batch.outcome, FetchOutcome::Mock(FallbackReason::Failed(_))));
        assert!((2..=5).contains(&batch.listings.len()));
        assert!(batch.listings.iter().all(|l| l.source == "redfin"));
    }

    #[test]
    fn failure_without_mock_gives_nothing() {
        let provider = UnsupportedSource::new("redfin");
        let batch = fetch_with_fallback(&provider, None, None, &mut StdRng::seed_from_u64(3));

        assert!(matches!(batch.outcome, FetchOutcome::Empty(FallbackReason::Failed(_))));
        assert!(batch.listings.is_empty());
    }

    #[test]
    fn empty_answer_falls_back() {
        let provider = FixedSource { name: "realtor", records: vec![] };
        let batch = fetch_with_fallback(&provider, None, Some(&mock()), &mut StdRng::seed_from_u64(9));
        assert_eq!(batch.outcome, FetchOutcome::Mock(FallbackReason::NoResults));
        assert!(!batch.listings.is_empty());

        let batch = fetch_with_fallback(&provider, None, None, &mut StdRng::seed_from_u64(9));
        assert_eq!(batch.outcome, FetchOutcome::Empty(FallbackReason::NoResults));
        assert!(batch.listings.is_empty());
    }

    #[test]
    fn records_without_urls_count_as_nothing() {
        let provider = FixedSource {
            name: "realtor",
            records: vec![raw(None), raw(Some(""))],
        };
        let batch = fetch_with_fallback(&provider, None, None, &mut StdRng::seed_from_u64(2));
        assert_eq!(batch.outcome, FetchOutcome::Empty(FallbackReason::NoResults));
        assert_eq!(batch.dropped, 2);
    }
}
