use std::error::Error;
use thiserror::Error;

/// All errors coming from a paged query source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The backing store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    /// A stored row could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] bincode::Error),

    /// Pending changes could not be flushed before a fetch.
    #[error("Flush error: {0}")]
    Flush(String),

    /// The page query itself failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Error raised by a third-party source implementation.
    #[error("Source error: {0}")]
    Other(Box<dyn Error + Send + Sync>),
}

impl SourceError {
    pub fn other<E>(err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        SourceError::Other(err.into())
    }
}
