#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use wordsearch::utils::{words, FilteredReader, TextFilter};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes, including invalid UTF-8, must tokenize without panicking
    let filter = TextFilter::default();
    let tokens = words(Cursor::new(data), &filter).unwrap();
    for token in &tokens {
        assert!(!token.chars().any(char::is_whitespace));
        assert_eq!(filter.trim(token), token.as_str());
    }

    let mut reader = FilteredReader::new(Cursor::new(data), &filter);
    while let Some(ch) = reader.read_char().unwrap() {
        assert!(!filter.is_filtered(ch));
    }
});
