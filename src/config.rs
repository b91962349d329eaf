use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::nlp::LabelSet;

/// Run configuration, built once and passed to every component.
#[derive(Debug, Clone)]
pub struct Config {
    pub target_city: String,
    pub use_mock_data: bool,
    pub database_path: PathBuf,
    pub csv_export_path: PathBuf,
    pub xlsx_export_path: Option<PathBuf>,
    pub sources: Vec<String>,
    pub labels: LabelSet,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_endpoint: Option<String>,
    pub max_pages: Option<u32>,
    pub mock_count: RangeInclusive<usize>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_city: "Newton, MA".to_string(),
            use_mock_data: true,
            database_path: PathBuf::from("./data/development_leads.db"),
            csv_export_path: PathBuf::from("./data/classified_listings.csv"),
            xlsx_export_path: None,
            sources: vec!["zillow".into(), "redfin".into(), "realtor".into()],
            labels: LabelSet::default(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_endpoint: None,
            max_pages: Some(1),
            mock_count: 2..=5,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mock_min = parse_or(get("MOCK_MIN_COUNT"), *defaults.mock_count.start())
            .context("MOCK_MIN_COUNT must be a whole number")?;
        let mock_max = parse_or(get("MOCK_MAX_COUNT"), *defaults.mock_count.end())
            .context("MOCK_MAX_COUNT must be a whole number")?;
        if mock_min == 0 || mock_min > mock_max {
            bail!("mock count range {mock_min}..={mock_max} is invalid");
        }

        let labels = match get("CLASSIFIER_LABELS") {
            Some(list) => LabelSet::parse(&list),
            None => defaults.labels,
        };
        if labels.is_empty() {
            bail!("CLASSIFIER_LABELS must name at least one label");
        }

        let sources = match get("SOURCES") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.sources,
        };

        let max_pages = match get("MAX_PAGES") {
            Some(v) => Some(v.parse().context("MAX_PAGES must be a whole number")?),
            None => defaults.max_pages,
        };

        let timeout_secs = parse_or(get("HTTP_TIMEOUT_SECS"), defaults.http_timeout.as_secs())
            .context("HTTP_TIMEOUT_SECS must be a whole number")?;

        Ok(Self {
            target_city: get("TARGET_CITY").unwrap_or(defaults.target_city),
            use_mock_data: match get("USE_MOCK_DATA") {
                Some(v) => parse_bool(&v).context("USE_MOCK_DATA must be true or false")?,
                None => defaults.use_mock_data,
            },
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            csv_export_path: get("CSV_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_export_path),
            xlsx_export_path: get("XLSX_EXPORT_PATH").map(PathBuf::from),
            sources,
            labels,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_model: get("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_endpoint: get("OPENAI_ENDPOINT"),
            max_pages,
            mock_count: mock_min..=mock_max,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => Ok(v.parse()?),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => bail!("not a boolean: {other}"),
    }
}
