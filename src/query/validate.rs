use crate::error::ValidationError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Letters, digits, underscore and hyphen, plus the Cyrillic alphabet
pub const SEARCH_WORD_PATTERN: &str = "^[a-zA-Z0-9_а-яА-Я-]+$";

static SEARCH_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SEARCH_WORD_PATTERN).expect("search word pattern is valid")
});

/// A search word that passed validation. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    value: String,
}

impl ValidatedQuery {
    /// Validate a raw query: non-empty, trimmed of surrounding spaces,
    /// and made only of allowed characters.
    pub fn new(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::Empty);
        }

        let trimmed = raw.trim_matches(' ');
        if !SEARCH_WORD.is_match(trimmed) {
            return Err(ValidationError::Invalid(raw.to_string()));
        }

        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Case-folded form used as an index key
    pub fn lowercase(&self) -> String {
        self.value.to_lowercase()
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Shorthand for [`ValidatedQuery::new`]
pub fn validate(raw: &str) -> Result<ValidatedQuery, ValidationError> {
    ValidatedQuery::new(raw)
}
