//! Brute-force full-text scanning.
//!
//! Used whenever the index has nothing to offer. Every file is read through
//! the filtering reader and matched against a whole-word pattern on a fixed
//! pool of workers.

pub mod matcher;
pub mod scanner;

pub use matcher::WordMatcher;
pub use scanner::{ScanOutcome, Scanner};
