use super::TextFilter;
use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Whitespace tokenizer over a buffered reader.
///
/// Each raw token has filtered chars trimmed from both ends; tokens equal to
/// a non-word are skipped. Tokens that trim down to the empty string are
/// still yielded. Case is preserved, callers fold it themselves.
pub struct Tokens<'f, R> {
    reader: R,
    filter: &'f TextFilter,
    buf: Vec<u8>,
    pending: VecDeque<String>,
    done: bool,
}

impl<'f, R: BufRead> Tokens<'f, R> {
    pub fn new(reader: R, filter: &'f TextFilter) -> Self {
        Self {
            reader,
            filter,
            buf: Vec::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Tokens<'_, R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }

            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&self.buf);
                    for raw in line.split_whitespace() {
                        let token = self.filter.trim(raw);
                        if self.filter.is_non_word(token) {
                            continue;
                        }
                        self.pending.push_back(token.to_string());
                    }
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Collect every token of `reader`
pub fn words<R: BufRead>(reader: R, filter: &TextFilter) -> io::Result<Vec<String>> {
    Tokens::new(reader, filter).collect()
}
