use crate::error::SourceError;

/// A query whose ordered results can be read one offset/limit slice at a time.
///
/// Implementations wrap a session with a unit-of-work cache. The caller must
/// supply a query with a stable sort so repeated requests for the same slice
/// return the same rows.
pub trait PagedSource {
    type Item;

    /// Flushes pending changes and clears cached objects.
    ///
    /// Called before every page fetch, including the first.
    fn prepare_cache(&mut self) -> Result<(), SourceError>;

    /// Returns up to `limit` rows starting at zero-based `offset`.
    ///
    /// Fewer than `limit` rows are returned only at the end of the result set.
    fn fetch_page(&mut self, offset: usize, limit: usize)
    -> Result<Vec<Self::Item>, SourceError>;
}

/// A source that can also run the matching count query.
pub trait CountedSource: PagedSource {
    fn count(&mut self) -> Result<usize, SourceError>;
}

impl<S: PagedSource + ?Sized> PagedSource for &mut S {
    type Item = S::Item;

    fn prepare_cache(&mut self) -> Result<(), SourceError> {
        (**self).prepare_cache()
    }

    fn fetch_page(
        &mut self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Self::Item>, SourceError> {
        (**self).fetch_page(offset, limit)
    }
}

impl<S: CountedSource + ?Sized> CountedSource for &mut S {
    fn count(&mut self) -> Result<usize, SourceError> {
        (**self).count()
    }
}
