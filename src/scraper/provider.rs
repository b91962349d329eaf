use crate::config::Config;
use crate::scraper::{NextDataProvider, RawListing, SourceError};

/// Anything that can produce raw listing records for one named source.
pub trait SourceProvider {
    fn name(&self) -> &str;

    /// One attempt, no retries. `max_pages` of `None` leaves paging to the provider.
    fn fetch(&self, max_pages: Option<u32>) -> Result<Vec<RawListing>, SourceError>;
}

/// Stands in for a configured source we have no provider for. Always fails,
/// which sends the source straight to the fallback.
pub struct UnsupportedSource {
    name: String,
}

impl UnsupportedSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl SourceProvider for UnsupportedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, _max_pages: Option<u32>) -> Result<Vec<RawListing>, SourceError> {
        Err(SourceError::Unsupported(self.name.clone()))
    }
}

/// Builds the provider for a configured source name.
pub fn provider_for(name: &str, config: &Config) -> Box<dyn SourceProvider> {
    let key = name.trim().to_lowercase();
    let built = match key.as_str() {
        "realtor" => NextDataProvider::realtor(&config.target_city, config.http_timeout),
        "zillow" => NextDataProvider::zillow(&config.target_city, config.http_timeout),
        _ => return Box::new(UnsupportedSource::new(key)),
    };

    match built {
        Ok(provider) => Box::new(provider),
        Err(e) => {
            tracing::error!(source = %key, error = %e, "could not build source provider");
            Box::new(UnsupportedSource::new(key))
        }
    }
}
