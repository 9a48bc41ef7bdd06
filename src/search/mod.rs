//! Search strategies.
//!
//! Transport code only sees the [`Searcher`] capability. Two strategies
//! implement it: [`ScanSearcher`] always scans the file tree, and
//! [`IndexedSearcher`] answers from the inverted index when it can and falls
//! back to scanning otherwise.

pub mod indexed;
pub mod scan;

pub use indexed::{IndexState, IndexedSearcher};
pub use scan::ScanSearcher;

use crate::error::Result;
use crate::store::FileRef;
use serde::{Deserialize, Serialize};

/// Single-word search capability
pub trait Searcher: Send + Sync {
    /// Files containing `word` as a whole word, case-insensitively.
    /// No match is an empty result, not an error.
    fn search(&self, word: &str) -> Result<SearchHits>;
}

/// Which retrieval path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Index,
    Scan,
}

/// Matching file refs, rendered as strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHits {
    pub files: Vec<String>,
    pub source: SearchSource,
}

impl SearchHits {
    pub fn new(files: Vec<FileRef>, source: SearchSource) -> Self {
        Self {
            files: files.into_iter().map(FileRef::into_string).collect(),
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
