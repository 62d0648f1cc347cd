use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct InnerMetrics {
    pages_fetched: AtomicU64,
    rows_yielded: AtomicU64,
    cache_clears: AtomicU64,
    short_pages: AtomicU64,
}

/// Counters for one paged iteration. Clones share the same counters.
#[derive(Debug, Clone)]
pub struct PagingMetrics {
    inner: Arc<InnerMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingMetricsSnapshot {
    pub pages_fetched: u64,
    pub rows_yielded: u64,
    pub cache_clears: u64,
    /// Fetches that returned fewer rows than requested.
    pub short_pages: u64,
}

impl PagingMetrics {
    pub fn new() -> Self {
        PagingMetrics {
            inner: Arc::new(InnerMetrics::default()),
        }
    }

    pub fn increment_pages(&self, count: u64) {
        self.inner.pages_fetched.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_rows(&self, count: u64) {
        self.inner.rows_yielded.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_cache_clears(&self, count: u64) {
        self.inner.cache_clears.fetch_add(count, Ordering::Relaxed);
    }

    pub fn increment_short_pages(&self, count: u64) {
        self.inner.short_pages.fetch_add(count, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> PagingMetricsSnapshot {
        PagingMetricsSnapshot {
            pages_fetched: self.inner.pages_fetched.load(Ordering::Relaxed),
            rows_yielded: self.inner.rows_yielded.load(Ordering::Relaxed),
            cache_clears: self.inner.cache_clears.load(Ordering::Relaxed),
            short_pages: self.inner.short_pages.load(Ordering::Relaxed),
        }
    }
}

impl Default for PagingMetrics {
    fn default() -> Self {
        Self::new()
    }
}
