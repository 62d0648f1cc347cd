use crate::{error::PagingError, metrics::PagingMetrics};
use connectors::source::{CountedSource, PagedSource};
use model::pagination::{cursor::PageCursor, page::PageRequest, paging_config::PagingConfig};
use tracing::{debug, warn};

/// Iterator that fetches rows from a [`PagedSource`] on demand, one page at a time.
///
/// `total_size` is the number of rows the query yields. It is trusted as given;
/// if the source runs dry earlier, iteration ends with [`PagingError::Exhausted`]
/// even though [`has_next`](Self::has_next) reported more rows.
///
/// Before every page fetch the source is asked to flush and clear its cache,
/// so at most one page of rows is held at a time.
pub struct PagedIterator<S: PagedSource> {
    source: S,
    total_size: usize,
    page_size: usize,
    cursor: PageCursor<S::Item>,
    metrics: PagingMetrics,
}

impl<S: PagedSource> PagedIterator<S> {
    pub fn new(source: S, total_size: usize, page_size: usize) -> Result<Self, PagingError> {
        PagingConfig::new(page_size).validate()?;

        Ok(PagedIterator {
            source,
            total_size,
            page_size,
            cursor: PageCursor::new(),
            metrics: PagingMetrics::new(),
        })
    }

    pub fn with_config(
        source: S,
        total_size: usize,
        config: &PagingConfig,
    ) -> Result<Self, PagingError> {
        Self::new(source, total_size, config.page_size)
    }

    /// Reports into `metrics` instead of a private set of counters.
    pub fn with_metrics(mut self, metrics: PagingMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// True while fewer than `total_size` rows have been returned. Never fetches.
    pub fn has_next(&self) -> bool {
        self.cursor.consumed() < self.total_size
    }

    /// Returns the next row, fetching a new page when the current one is used up.
    pub fn try_next(&mut self) -> Result<S::Item, PagingError> {
        if !self.has_next() {
            return Err(PagingError::Exhausted);
        }

        if self.cursor.needs_page() {
            self.fetch_next()?;
        }

        match self.cursor.take_next() {
            Some(item) => {
                self.metrics.increment_rows(1);
                Ok(item)
            }
            None => {
                warn!(
                    consumed = self.cursor.consumed(),
                    total_size = self.total_size,
                    "Source ran out of rows before the expected total"
                );
                Err(PagingError::Exhausted)
            }
        }
    }

    /// Removing rows is not supported.
    pub fn remove(&mut self) -> Result<(), PagingError> {
        Err(PagingError::UnsupportedOperation("remove"))
    }

    pub fn consumed(&self) -> usize {
        self.cursor.consumed()
    }

    pub fn remaining(&self) -> usize {
        self.total_size.saturating_sub(self.cursor.consumed())
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn metrics(&self) -> &PagingMetrics {
        &self.metrics
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Access to the session, e.g. to stage writes between rows.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    // The cursor is only touched once the fetch succeeded.
    fn fetch_next(&mut self) -> Result<(), PagingError> {
        self.source.prepare_cache()?;
        self.metrics.increment_cache_clears(1);

        let request = PageRequest::new(self.cursor.next_offset(), self.page_size);
        let page = self.source.fetch_page(request.offset, request.limit)?;
        let rows = page.len();

        debug!(%request, rows, "Fetched page");
        self.metrics.increment_pages(1);
        if rows > request.limit {
            warn!(%request, rows, "Source returned more rows than requested");
        } else if !request.is_full(rows) {
            self.metrics.increment_short_pages(1);
        }

        self.cursor.install_page(page);
        Ok(())
    }
}

impl<S: CountedSource> PagedIterator<S> {
    /// Runs the source's count query once and iterates over that many rows.
    pub fn counted(mut source: S, page_size: usize) -> Result<Self, PagingError> {
        PagingConfig::new(page_size).validate()?;
        let total_size = source.count()?;
        Self::new(source, total_size, page_size)
    }
}

impl<S: PagedSource> Iterator for PagedIterator<S> {
    type Item = Result<S::Item, PagingError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Err(err) if err.is_exhausted() => None,
            other => Some(other),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // A short source may stop early, so only the upper bound is known.
        (0, Some(self.remaining()))
    }
}
