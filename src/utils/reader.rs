use super::TextFilter;
use std::io::{self, BufRead};

/// Streaming reader that drops filtered characters as the text is consumed.
///
/// The input is pulled one line at a time and decoded lossily, so the whole
/// file is never held in memory and invalid UTF-8 never fails a read.
pub struct FilteredReader<'f, R> {
    inner: R,
    filter: &'f TextFilter,
    raw: Vec<u8>,
    line: String,
    pos: usize,
}

impl<'f, R: BufRead> FilteredReader<'f, R> {
    pub fn new(inner: R, filter: &'f TextFilter) -> Self {
        Self {
            inner,
            filter,
            raw: Vec::new(),
            line: String::new(),
            pos: 0,
        }
    }

    /// Next unfiltered character, `None` at end of input
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(ch) = self.line[self.pos..].chars().next() {
                self.pos += ch.len_utf8();
                if self.filter.is_filtered(ch) {
                    continue;
                }
                return Ok(Some(ch));
            }

            if !self.fill()? {
                return Ok(None);
            }
        }
    }

    /// Append the rest of the current line (newline included) to `buf`,
    /// minus filtered characters. Returns false at end of input.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<bool> {
        if self.pos >= self.line.len() && !self.fill()? {
            return Ok(false);
        }

        let filter = self.filter;
        buf.extend(
            self.line[self.pos..]
                .chars()
                .filter(|&c| !filter.is_filtered(c)),
        );
        self.pos = self.line.len();
        Ok(true)
    }

    fn fill(&mut self) -> io::Result<bool> {
        self.raw.clear();
        if self.inner.read_until(b'\n', &mut self.raw)? == 0 {
            return Ok(false);
        }
        self.line = String::from_utf8_lossy(&self.raw).into_owned();
        self.pos = 0;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOFT_HYPHEN;
    use std::io::Cursor;

    fn first_char(input: &str, filter: &TextFilter) -> Option<char> {
        FilteredReader::new(Cursor::new(input), filter)
            .read_char()
            .unwrap()
    }

    #[test]
    fn test_read_char_skips_filtered() {
        assert_eq!(first_char("4.", &TextFilter::new(['.'])), Some('4'));
        assert_eq!(first_char(".4", &TextFilter::new(['.'])), Some('4'));
        assert_eq!(
            first_char(&format!("{}4", SOFT_HYPHEN), &TextFilter::new([SOFT_HYPHEN])),
            Some('4')
        );
        assert_eq!(first_char("(4)", &TextFilter::new(['(', ')'])), Some('4'));
        assert_eq!(first_char("...", &TextFilter::new(['.'])), None);
    }

    #[test]
    fn test_read_char_crosses_lines() {
        let filter = TextFilter::default();
        let mut reader = FilteredReader::new(Cursor::new("a,\n(b)"), &filter);
        let mut out = String::new();
        while let Some(ch) = reader.read_char().unwrap() {
            out.push(ch);
        }
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn test_read_line() {
        let filter = TextFilter::default();
        let mut reader = FilteredReader::new(Cursor::new("Hello, world.\n?!\nbye"), &filter);

        let mut line = String::new();
        assert!(reader.read_line(&mut line).unwrap());
        assert_eq!(line, "Hello world\n");

        line.clear();
        assert!(reader.read_line(&mut line).unwrap());
        assert_eq!(line, "\n");

        line.clear();
        assert!(reader.read_line(&mut line).unwrap());
        assert_eq!(line, "bye");

        line.clear();
        assert!(!reader.read_line(&mut line).unwrap());
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let filter = TextFilter::default();
        let mut reader = FilteredReader::new(Cursor::new(vec![b'a', 0xff, b'b']), &filter);
        let mut line = String::new();
        assert!(reader.read_line(&mut line).unwrap());
        assert_eq!(line, "a\u{FFFD}b");
    }
}
