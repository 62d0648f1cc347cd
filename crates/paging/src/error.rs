use connectors::error::SourceError;
use model::pagination::paging_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PagingError {
    /// No further elements are available.
    #[error("No more elements to iterate")]
    Exhausted,

    /// The iterator is read-only.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The source failed while preparing its cache or fetching a page.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The iterator was constructed with invalid parameters.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl PagingError {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PagingError::Exhausted)
    }
}
