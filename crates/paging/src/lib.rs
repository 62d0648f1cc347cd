//! Streams a large ordered query result one page at a time, clearing the
//! source's unit-of-work cache before each page so memory stays bounded.

pub mod error;
pub mod iterator;
pub mod metrics;

pub use error::PagingError;
pub use iterator::PagedIterator;
pub use metrics::{PagingMetrics, PagingMetricsSnapshot};
