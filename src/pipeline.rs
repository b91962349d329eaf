// pipeline.rs
//
// Init -> Scrape (every source, with fallback) -> Merge -> per listing
// [Classify -> Score -> Persist] -> Export. Stages run one after another on
// the calling thread.

use crate::config::Config;
use crate::db::{get_listing_by_url, init_db, upsert_listing, Database};
use crate::domain::{score_listing, Listing};
use crate::errors::{DbError, RecordFailure};
use crate::nlp::{listing_text, Classifier, ClassifierFields, LabelSet, LABEL_ERROR};
use crate::scraper::{fetch_with_fallback, FetchOutcome, MockGenerator, SourceProvider};
use crate::spreadsheets::ExportSink;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// What one source contributed to a run.
#[derive(Debug, Clone)]
pub struct SourceSummary {
    pub source: String,
    pub outcome: FetchOutcome,
    pub listings: usize,
    pub dropped: usize,
}

/// A listing that did not make it through classify/score/persist.
#[derive(Debug)]
pub struct SkippedListing {
    pub url: String,
    pub reason: RecordFailure,
}

#[derive(Debug)]
pub struct ExportResult {
    pub sink: String,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub sources: Vec<SourceSummary>,
    pub merged: usize,
    pub processed: Vec<Listing>,
    /// Processed listings whose URL was not in the store before this run.
    pub new_listings: usize,
    pub skipped: Vec<SkippedListing>,
    /// Empty when nothing was processed and no sink was called.
    pub exports: Vec<ExportResult>,
}

impl RunReport {
    pub fn label_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for l in &self.processed {
            let label = l.classified_label.clone().unwrap_or_default();
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// (min, max, mean) over listings with a price.
    pub fn price_stats(&self) -> Option<(i64, i64, f64)> {
        let prices: Vec<i64> = self.processed.iter().filter_map(|l| l.price).collect();
        let min = *prices.iter().min()?;
        let max = *prices.iter().max()?;
        let sum: i128 = prices.iter().map(|&p| i128::from(p)).sum();
        let mean = sum as f64 / prices.len() as f64;
        Some((min, max, mean))
    }
}

pub struct Pipeline {
    db: Database,
    providers: Vec<Box<dyn SourceProvider>>,
    classifier: Box<dyn Classifier>,
    labels: LabelSet,
    sinks: Vec<Box<dyn ExportSink>>,
    mock: Option<MockGenerator>,
    max_pages: Option<u32>,
    rng: StdRng,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        db: Database,
        providers: Vec<Box<dyn SourceProvider>>,
        classifier: Box<dyn Classifier>,
        sinks: Vec<Box<dyn ExportSink>>,
    ) -> Self {
        let mock = config
            .use_mock_data
            .then(|| MockGenerator::new(&config.target_city, config.mock_count.clone()));

        Self {
            db,
            providers,
            classifier,
            labels: config.labels.clone(),
            sinks,
            mock,
            max_pages: config.max_pages,
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixes the mock data RNG, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Runs every stage once. Only a failure to set up the store is an error;
    /// failing sources, listings and sinks are logged and reported.
    pub fn run(&mut self) -> Result<RunReport, DbError> {
        tracing::info!("pipeline started");
        init_db(&self.db)?;

        let mut report = RunReport::default();

        // Scrape + merge
        let mut merged = Vec::new();
        for provider in &self.providers {
            let batch =
                fetch_with_fallback(provider.as_ref(), self.max_pages, self.mock.as_ref(), &mut self.rng);
            report.sources.push(SourceSummary {
                source: batch.source,
                outcome: batch.outcome,
                listings: batch.listings.len(),
                dropped: batch.dropped,
            });
            merged.extend(batch.listings);
        }
        report.merged = merged.len();
        tracing::info!(total = merged.len(), "scraped listings");

        // Classify -> score -> persist
        let total = merged.len();
        for (i, listing) in merged.into_iter().enumerate() {
            let url = listing.url.clone();
            match self.process_listing(listing) {
                Ok((done, is_new)) => {
                    if is_new {
                        report.new_listings += 1;
                    }
                    tracing::info!(
                        url = %done.url,
                        label = done.classified_label.as_deref().unwrap_or_default(),
                        score = done.score.unwrap_or_default(),
                        "processed {}/{}",
                        i + 1,
                        total
                    );
                    report.processed.push(done);
                }
                Err(reason) => {
                    tracing::error!(url = %url, error = %reason, "skipping listing");
                    report.skipped.push(SkippedListing { url, reason });
                }
            }
        }

        // Export
        if report.processed.is_empty() {
            tracing::warn!("no listings were successfully processed, nothing to export");
            log_summary(&report);
            return Ok(report);
        }

        for sink in &self.sinks {
            let error = match sink.export(&report.processed) {
                Ok(()) => None,
                Err(e) => {
                    tracing::error!(sink = sink.name(), error = %e, "export failed");
                    Some(e.to_string())
                }
            };
            report.exports.push(ExportResult {
                sink: sink.name().to_string(),
                error,
            });
        }

        log_summary(&report);
        Ok(report)
    }

    /// Classification runs before scoring: the score depends on the label.
    /// Returns the finished listing and whether its URL was new to the store.
    fn process_listing(&self, mut listing: Listing) -> Result<(Listing, bool), RecordFailure> {
        let text = listing_text(&listing)?;
        let fields = ClassifierFields::from_listing(&listing);

        let answer = self.classifier.classify(&text, &fields)?;
        let label = self.labels.resolve(&answer);
        if label == LABEL_ERROR && answer != LABEL_ERROR {
            tracing::warn!(url = %listing.url, answer = %answer, "label outside the configured set");
        }
        listing.classified_label = Some(label);

        listing.score = Some(score_listing(&listing));
        listing.processed_at = Some(Utc::now());

        let is_new = get_listing_by_url(&self.db, &listing.url)?.is_none();
        upsert_listing(&self.db, &listing)?;
        Ok((listing, is_new))
    }
}

fn log_summary(report: &RunReport) {
    tracing::info!(
        merged = report.merged,
        processed = report.processed.len(),
        new = report.new_listings,
        skipped = report.skipped.len(),
        "pipeline complete"
    );
    for s in &report.sources {
        tracing::info!(
            source = %s.source,
            listings = s.listings,
            dropped = s.dropped,
            outcome = ?s.outcome,
            "source summary"
        );
    }
    for s in &report.skipped {
        tracing::warn!(url = %s.url, reason = %s.reason, "skipped listing");
    }
    tracing::info!(labels = ?report.label_counts(), "classifications");
    if let Some((min, max, mean)) = report.price_stats() {
        tracing::info!(min, max, mean = mean.round(), "price range");
    }
}
