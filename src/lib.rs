//! # wordsearch - whole-word file search
//!
//! Answers "which files contain word W?" over a read-only tree of text
//! files. An inverted index is built once at startup; whenever it has
//! nothing to offer, a concurrent brute-force scan of the tree answers
//! instead.
//!
//! ## Architecture
//!
//! - [`utils`] - Character filter, filtering reader and tokenizer
//! - [`query`] - Query validation
//! - [`store`] - File store abstraction (directory or in-memory)
//! - [`index`] - Inverted index build and lookup
//! - [`scan`] - Whole-word matcher and the worker-pool scanner
//! - [`search`] - The `Searcher` strategies: index-first and scan-only
//! - [`server`] - TCP search server and client
//! - [`output`] - Terminal output
//!
//! ## Quick Start
//!
//! ```no_run
//! use wordsearch::config::WordSearchConfig;
//! use wordsearch::search::{IndexedSearcher, Searcher};
//!
//! let config = WordSearchConfig::default();
//! let mut searcher = IndexedSearcher::from_config(&config).unwrap();
//! searcher.build_index().unwrap();
//!
//! let hits = searcher.search("hello").unwrap();
//! for file in &hits.files {
//!     println!("{file}");
//! }
//! ```
//!
//! Matches are reported as file refs: the store-relative path with the
//! extension removed.

pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod query;
pub mod scan;
pub mod search;
pub mod server;
pub mod store;
pub mod utils;

pub use error::{ErrorKind, Result, SearchError, ValidationError};
