//! Error types shared by the index, the scanner and the search coordinator.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, SearchError>;

/// Rejection reasons for a raw query string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty string")]
    Empty,
    #[error("invalid string: {0:?}")]
    Invalid(String),
}

/// Errors surfaced by `Searcher::search` and the index builder
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query was rejected before any lookup or scan happened
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The whole-word pattern for a query could not be compiled
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A file could not be opened or read
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The file tree could not be enumerated
    #[error("failed to walk file tree: {0}")]
    Walk(#[from] ignore::Error),

    /// The scan worker pool could not be started
    #[error("failed to start scan workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

impl SearchError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        SearchError::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse classification used by transport code
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Validation(_) | SearchError::Pattern(_) => ErrorKind::Validation,
            SearchError::Io { .. } | SearchError::Walk(_) | SearchError::Pool(_) => ErrorKind::Io,
        }
    }
}

/// Error class reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad query; the caller should fix its input
    Validation,
    /// Internal failure while reading the file tree
    Io,
}
