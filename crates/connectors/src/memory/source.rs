use crate::{
    error::SourceError,
    source::{CountedSource, PagedSource},
};
use model::pagination::page::PageRequest;
use tracing::trace;

/// In-memory session with a unit-of-work cache.
///
/// Committed rows form the ordered result set. Writes are staged until the
/// next flush, and every row handed out by a fetch stays in the identity
/// cache until the session is cleared.
#[derive(Debug, Clone)]
pub struct UnitOfWorkSource<T> {
    committed: Vec<T>,
    pending: Vec<T>,
    identity_cache: Vec<T>,
    flush_count: usize,
    requests: Vec<PageRequest>,
}

impl<T: Clone> UnitOfWorkSource<T> {
    pub fn new(rows: Vec<T>) -> Self {
        UnitOfWorkSource {
            committed: rows,
            pending: Vec::new(),
            identity_cache: Vec::new(),
            flush_count: 0,
            requests: Vec::new(),
        }
    }

    /// Queues a row to be appended on the next flush.
    pub fn stage(&mut self, row: T) {
        self.pending.push(row);
    }

    /// Rows loaded since the cache was last cleared.
    pub fn cached_len(&self) -> usize {
        self.identity_cache.len()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn committed_len(&self) -> usize {
        self.committed.len()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Page requests served so far, in order.
    pub fn requests(&self) -> &[PageRequest] {
        &self.requests
    }
}

impl<T: Clone> PagedSource for UnitOfWorkSource<T> {
    type Item = T;

    fn prepare_cache(&mut self) -> Result<(), SourceError> {
        let flushed = self.pending.len();
        self.committed.append(&mut self.pending);
        let evicted = self.identity_cache.len();
        self.identity_cache.clear();
        self.flush_count += 1;

        trace!(flushed, evicted, "Unit of work flushed and cleared");
        Ok(())
    }

    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<T>, SourceError> {
        self.requests.push(PageRequest::new(offset, limit));

        let start = offset.min(self.committed.len());
        let end = offset.saturating_add(limit).min(self.committed.len());
        let rows = self.committed[start..end].to_vec();

        self.identity_cache.extend(rows.iter().cloned());
        Ok(rows)
    }
}

impl<T: Clone> CountedSource for UnitOfWorkSource<T> {
    fn count(&mut self) -> Result<usize, SourceError> {
        Ok(self.committed.len() + self.pending.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_returns_requested_slice() {
        let mut source = UnitOfWorkSource::new((0..10).collect::<Vec<u32>>());

        assert_eq!(source.fetch_page(0, 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(source.fetch_page(8, 3).unwrap(), vec![8, 9]);
        assert!(source.fetch_page(12, 3).unwrap().is_empty());
        assert_eq!(
            source.requests(),
            &[
                PageRequest::new(0, 3),
                PageRequest::new(8, 3),
                PageRequest::new(12, 3)
            ]
        );
    }

    #[test]
    fn fetched_rows_stay_cached_until_cleared() {
        let mut source = UnitOfWorkSource::new(vec!["a", "b", "c", "d"]);

        source.fetch_page(0, 2).unwrap();
        source.fetch_page(2, 2).unwrap();
        assert_eq!(source.cached_len(), 4);

        source.prepare_cache().unwrap();
        assert_eq!(source.cached_len(), 0);
        assert_eq!(source.flush_count(), 1);
    }

    #[test]
    fn staged_rows_become_visible_after_flush() {
        let mut source = UnitOfWorkSource::new(vec![1, 2]);
        source.stage(3);

        assert_eq!(source.pending_len(), 1);
        assert_eq!(source.count().unwrap(), 3);
        assert_eq!(source.fetch_page(0, 5).unwrap(), vec![1, 2]);

        source.prepare_cache().unwrap();
        assert_eq!(source.pending_len(), 0);
        assert_eq!(source.committed_len(), 3);
        assert_eq!(source.fetch_page(0, 5).unwrap(), vec![1, 2, 3]);
    }
}
