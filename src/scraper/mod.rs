mod fallback;
mod mock;
mod models;
mod next_data;
mod provider;
mod scraper_error;

pub use fallback::{fetch_with_fallback, FallbackReason, FetchOutcome};
pub use mock::MockGenerator;
pub use models::RawListing;
pub use next_data::NextDataProvider;
pub use provider::{provider_for, SourceProvider, UnsupportedSource};
pub use scraper_error::SourceError;
