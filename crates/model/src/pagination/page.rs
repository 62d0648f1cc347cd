use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A single offset/limit slice of an ordered result set.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based position of the first row.
    pub offset: usize,
    /// Maximum number of rows to return.
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        PageRequest { offset, limit }
    }

    /// Whether `row_count` rows satisfy the request completely.
    pub fn is_full(&self, row_count: usize) -> bool {
        row_count >= self.limit
    }
}

impl Display for PageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "offset={} limit={}", self.offset, self.limit)
    }
}
