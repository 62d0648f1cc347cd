use crate::{
    error::SourceError,
    source::{CountedSource, PagedSource},
};
use serde::{Serialize, de::DeserializeOwned};
use sled::IVec;
use std::{marker::PhantomData, ops::Bound, path::Path};
use tracing::{debug, trace};

type Entries = Box<dyn Iterator<Item = sled::Result<(IVec, IVec)>>>;

/// Pages over a sled tree in key order.
///
/// Keys define the sort order, values are bincode-encoded rows.
pub struct SledSource<T> {
    tree: sled::Tree,

    /// Keys of rows materialized since the last cache clear.
    loaded: Vec<IVec>,

    /// Offset following the last page and the last key it returned,
    /// so a sequential read can continue from the key instead of skipping.
    resume: Option<(usize, IVec)>,

    _row: PhantomData<fn() -> T>,
}

impl<T> SledSource<T> {
    pub fn open(path: impl AsRef<Path>, tree: &str) -> Result<Self, SourceError> {
        let db = sled::open(path)?;
        let tree = db.open_tree(tree)?;
        Ok(Self::from_tree(tree))
    }

    pub fn from_tree(tree: sled::Tree) -> Self {
        SledSource {
            tree,
            loaded: Vec::new(),
            resume: None,
            _row: PhantomData,
        }
    }

    /// Direct writes on the tree bypass the resume position; use
    /// [`insert`](Self::insert) while paging.
    pub fn tree(&self) -> &sled::Tree {
        &self.tree
    }

    /// Rows materialized since the last cache clear.
    pub fn loaded_len(&self) -> usize {
        self.loaded.len()
    }

    fn entries_from(&self, offset: usize) -> Entries {
        match &self.resume {
            Some((next_offset, last_key)) if *next_offset == offset => {
                let after = last_key.clone();
                Box::new(
                    self.tree
                        .range::<IVec, _>((Bound::Excluded(after), Bound::Unbounded)),
                )
            }
            _ => Box::new(self.tree.iter().skip(offset)),
        }
    }
}

impl<T: Serialize> SledSource<T> {
    /// Encodes `row` and stores it under `key`.
    ///
    /// The next page is located by offset again, since the write may
    /// shift rows past the last returned key.
    pub fn insert(&mut self, key: impl AsRef<[u8]>, row: &T) -> Result<(), SourceError> {
        let bytes = bincode::serialize(row)?;
        self.tree.insert(key.as_ref(), bytes)?;
        self.resume = None;
        Ok(())
    }
}

impl<T: DeserializeOwned> PagedSource for SledSource<T> {
    type Item = T;

    fn prepare_cache(&mut self) -> Result<(), SourceError> {
        let flushed = self.tree.flush()?;
        let evicted = self.loaded.len();
        self.loaded.clear();

        trace!(flushed, evicted, "Sled tree flushed and row cache cleared");
        Ok(())
    }

    fn fetch_page(&mut self, offset: usize, limit: usize) -> Result<Vec<T>, SourceError> {
        let mut rows = Vec::with_capacity(limit);
        let mut last_key = None;

        for entry in self.entries_from(offset).take(limit) {
            let (key, value) = entry?;
            rows.push(bincode::deserialize::<T>(&value)?);
            self.loaded.push(key.clone());
            last_key = Some(key);
        }

        self.resume = last_key.map(|key| (offset + rows.len(), key));

        debug!(offset, limit, rows = rows.len(), "Fetched page from sled tree");
        Ok(rows)
    }
}

impl<T: DeserializeOwned> CountedSource for SledSource<T> {
    fn count(&mut self) -> Result<usize, SourceError> {
        Ok(self.tree.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
    struct Actor {
        id: u64,
        name: String,
    }

    fn actor(id: u64) -> Actor {
        Actor {
            id,
            name: format!("actor-{id}"),
        }
    }

    fn seeded(dir: &Path, count: u64) -> SledSource<Actor> {
        let mut source = SledSource::open(dir, "actor").unwrap();
        for id in 0..count {
            source.insert(id.to_be_bytes(), &actor(id)).unwrap();
        }
        source
    }

    #[test]
    fn pages_follow_key_order() {
        let dir = tempdir().unwrap();
        let mut source = seeded(dir.path(), 5);

        let first = source.fetch_page(0, 2).unwrap();
        let second = source.fetch_page(2, 2).unwrap();
        let last = source.fetch_page(4, 2).unwrap();

        assert_eq!(first, vec![actor(0), actor(1)]);
        assert_eq!(second, vec![actor(2), actor(3)]);
        assert_eq!(last, vec![actor(4)]);
        assert!(source.fetch_page(5, 2).unwrap().is_empty());
    }

    #[test]
    fn non_sequential_offset_skips_from_start() {
        let dir = tempdir().unwrap();
        let mut source = seeded(dir.path(), 6);

        source.fetch_page(0, 2).unwrap();
        let rows = source.fetch_page(3, 2).unwrap();
        assert_eq!(rows, vec![actor(3), actor(4)]);

        // Same slice again must match.
        let again = source.fetch_page(3, 2).unwrap();
        assert_eq!(again, rows);
    }

    #[test]
    fn insert_between_pages_keeps_offset_semantics() {
        let dir = tempdir().unwrap();
        let mut source = SledSource::open(dir.path(), "actor").unwrap();
        for id in [0u64, 2, 4, 6, 8] {
            source.insert(id.to_be_bytes(), &actor(id)).unwrap();
        }

        assert_eq!(source.fetch_page(0, 2).unwrap(), vec![actor(0), actor(2)]);
        source.insert(1u64.to_be_bytes(), &actor(1)).unwrap();

        // Rows are now 0, 1, 2, 4, ... so offset 2 starts at id 2.
        assert_eq!(source.fetch_page(2, 2).unwrap(), vec![actor(2), actor(4)]);
    }

    #[test]
    fn prepare_cache_drops_loaded_rows() {
        let dir = tempdir().unwrap();
        let mut source = seeded(dir.path(), 4);

        source.fetch_page(0, 3).unwrap();
        assert_eq!(source.loaded_len(), 3);

        source.prepare_cache().unwrap();
        assert_eq!(source.loaded_len(), 0);
    }

    #[test]
    fn count_matches_tree_length() {
        let dir = tempdir().unwrap();
        let mut source = seeded(dir.path(), 7);
        assert_eq!(source.count().unwrap(), 7);
    }

    #[test]
    fn undecodable_row_is_reported() {
        let dir = tempdir().unwrap();
        let mut source = seeded(dir.path(), 1);
        source.tree().insert(1u64.to_be_bytes(), &[0xff][..]).unwrap();

        let err = source.fetch_page(0, 5).unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }
}
