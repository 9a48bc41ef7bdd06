use crate::query::ValidatedQuery;
use crate::utils::{FilteredReader, TextFilter};
use regex::Regex;
use std::io::{self, BufRead};

/// Case-insensitive whole-word matcher for one query.
///
/// A match must be preceded and followed by whitespace or a text boundary.
/// Compiled once per query and shared read-only by all scan workers.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    regex: Regex,
}

impl WordMatcher {
    pub fn new(query: &ValidatedQuery) -> Result<Self, regex::Error> {
        let pattern = format!(r"(?i)(^|\s){}(\s|$)", regex::escape(query.as_str()));
        Ok(Self {
            regex: Regex::new(&pattern)?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Match against `reader` with filtered characters removed. Stops at the
    /// first matching line; newlines are whitespace, so matching line by
    /// line finds the same words as matching the whole text.
    pub fn matches_reader<R: BufRead>(&self, reader: R, filter: &TextFilter) -> io::Result<bool> {
        let mut reader = FilteredReader::new(reader, filter);
        let mut line = String::new();
        while reader.read_line(&mut line)? {
            if self.regex.is_match(&line) {
                return Ok(true);
            }
            line.clear();
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOFT_HYPHEN;
    use crate::query::validate;
    use std::io::Cursor;

    fn matcher(word: &str) -> WordMatcher {
        WordMatcher::new(&validate(word).unwrap()).unwrap()
    }

    fn found(word: &str, text: &str) -> bool {
        matcher(word)
            .matches_reader(Cursor::new(text), &TextFilter::default())
            .unwrap()
    }

    #[test]
    fn test_whole_word_only() {
        assert!(found("hello", "hello"));
        assert!(found("hello", "say hello there"));
        assert!(!found("hello", "hellothere"));
        assert!(!found("hello", "othello"));
        assert!(!found("hello", "hello-world"));
        assert!(found("hello-world", "a hello-world b"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(found("HELLO", "Hello World"));
        assert!(found("world", "Hello WORLD"));
        assert!(found("привет", "Всем ПРИВЕТ"));
    }

    #[test]
    fn test_filtered_runes_do_not_break_boundaries() {
        assert!(found("world", "Hello, world."));
        assert!(found("hello", "(hello)"));
        assert!(found("hello", &format!("hel{}lo friend", SOFT_HYPHEN)));
        assert!(found("word", "a wo.rd inside"));
        assert!(!found("hello", "hello;"));
    }

    #[test]
    fn test_line_boundaries() {
        assert!(found("there", "hello\nthere\n"));
        assert!(found("hello", "hello\r\nthere"));
        assert!(!found("hello", "hel\nlo"));
    }

    #[test]
    fn test_hyphen_is_literal() {
        let m = matcher("a-b");
        assert!(m.is_match("x a-b y"));
        assert!(!m.is_match("x a b y"));
    }
}
