#![no_main]

use libfuzzer_sys::fuzz_target;
use wordsearch::query::ValidatedQuery;
use wordsearch::scan::WordMatcher;

fuzz_target!(|data: &str| {
    // Any accepted query must compile to a matcher that finds itself
    if let Ok(query) = ValidatedQuery::new(data) {
        assert!(!query.as_str().is_empty());
        let matcher = WordMatcher::new(&query).unwrap();
        assert!(matcher.is_match(query.as_str()));
        assert!(matcher.is_match(&format!("x {} y", query.lowercase())));
    }
});
