use thiserror::Error;

/// Why a source produced no records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Blocked by site: {0}")]
    Blocked(String),
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("__NEXT_DATA__ not found")]
    MissingNextData,
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Unexpected data shape: {0}")]
    UnexpectedShape(String),
    #[error("No provider for source '{0}'")]
    Unsupported(String),
}
