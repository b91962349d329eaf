use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{all_listings, count_listings, Database};
use crate::nlp::{Classifier, HeuristicClassifier, OpenAiClassifier};
use crate::pipeline::Pipeline;
use crate::scraper::provider_for;
use crate::spreadsheets::{CsvExport, ExportSink, XlsxExport};

mod config;
mod db;
mod domain;
mod errors;
mod nlp;
mod pipeline;
mod scraper;
mod spreadsheets;

#[cfg(test)]
mod tests;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(city = %config.target_city, sources = ?config.sources, mock = config.use_mock_data, "configuration loaded");

    let providers = config
        .sources
        .iter()
        .map(|name| provider_for(name, &config))
        .collect();

    let classifier = build_classifier(&config)?;

    let mut sinks: Vec<Box<dyn ExportSink>> = vec![Box::new(CsvExport::new(&config.csv_export_path))];
    if let Some(path) = &config.xlsx_export_path {
        sinks.push(Box::new(XlsxExport::new(path)));
    }

    let db = Database::new(&config.database_path);
    let mut pipeline = Pipeline::new(&config, db.clone(), providers, classifier, sinks);

    let report = pipeline.run().context("Pipeline could not start")?;

    if report.processed.is_empty() {
        tracing::warn!("run finished without any listings");
        return Ok(());
    }

    for export in &report.exports {
        match &export.error {
            Some(e) => tracing::warn!(sink = %export.sink, error = %e, "export not written"),
            None => tracing::info!(sink = %export.sink, "export written"),
        }
    }

    let stored = count_listings(&db).context("Failed to count stored listings")?;
    tracing::info!(stored, "listings in database");

    for top in all_listings(&db)
        .context("Failed to read stored listings")?
        .iter()
        .take(5)
    {
        tracing::info!(
            id = top.id,
            url = %top.listing.url,
            score = top.listing.score.unwrap_or_default(),
            label = top.listing.classified_label.as_deref().unwrap_or_default(),
            "top lead"
        );
    }
    Ok(())
}

fn build_classifier(config: &Config) -> Result<Box<dyn Classifier>> {
    let Some(api_key) = config.openai_api_key.clone() else {
        tracing::info!("OPENAI_API_KEY not set, using the heuristic classifier");
        return Ok(Box::new(HeuristicClassifier));
    };

    let classifier = OpenAiClassifier::new(
        api_key,
        config.openai_model.clone(),
        config.labels.clone(),
        config.http_timeout,
    )
    .context("Failed to build the OpenAI client")?;

    Ok(match &config.openai_endpoint {
        Some(endpoint) => Box::new(classifier.with_endpoint(endpoint)),
        None => Box::new(classifier),
    })
}
