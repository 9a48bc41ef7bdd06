use crate::config::TextConfig;
use rustc_hash::FxHashSet;

/// Character and token filter applied before matching.
///
/// `chars` are stripped from token edges by the tokenizer and skipped
/// anywhere in the text by [`FilteredReader`](super::FilteredReader).
/// A stripped token equal to one of `non_words` is dropped.
#[derive(Debug, Clone)]
pub struct TextFilter {
    chars: FxHashSet<char>,
    non_words: FxHashSet<String>,
}

impl TextFilter {
    /// Filter over `chars` with the default non-word set
    pub fn new(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().collect(),
            non_words: TextConfig::default().non_words.into_iter().collect(),
        }
    }

    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            chars: config.filtered_chars.iter().copied().collect(),
            non_words: config.non_words.iter().cloned().collect(),
        }
    }

    /// Replace the non-word set
    pub fn with_non_words<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.non_words = words.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn is_filtered(&self, ch: char) -> bool {
        self.chars.contains(&ch)
    }

    #[inline]
    pub fn is_non_word(&self, token: &str) -> bool {
        self.non_words.contains(token)
    }

    /// Strip filtered chars from both ends of `token`
    pub fn trim<'a>(&self, token: &'a str) -> &'a str {
        token.trim_matches(|c| self.is_filtered(c))
    }
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::from_config(&TextConfig::default())
    }
}
