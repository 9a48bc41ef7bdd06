//! Text utilities shared by the index builder and the scanner.
//!
//! ## Modules
//!
//! - [`filter`] - Configurable set of filtered characters and non-words
//! - [`reader`] - Streaming reader that skips filtered characters
//! - [`tokenizer`] - Whitespace tokenizer with edge trimming
//! - [`progress`] - Spinner that becomes a no-op without the `progress` feature
//!
//! ```no_run
//! use std::io::Cursor;
//! use wordsearch::utils::{words, TextFilter};
//!
//! let tokens = words(Cursor::new("-  a, b.   (c)  d-e "), &TextFilter::default()).unwrap();
//! // Returns: ["a", "b", "c", "d-e"]
//! ```

pub mod filter;
pub mod progress;
pub mod reader;
pub mod tokenizer;

pub use filter::*;
pub use reader::*;
pub use tokenizer::*;
