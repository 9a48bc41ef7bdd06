//! Query validation.
//!
//! Only single whole words are searchable; the validator is the gate every
//! search passes before touching the index or the file tree.

pub mod validate;

pub use validate::{validate, ValidatedQuery, SEARCH_WORD_PATTERN};
