use super::{ScanSearcher, SearchHits, SearchSource, Searcher};
use crate::config::WordSearchConfig;
use crate::error::Result;
use crate::index::{IndexStats, InvertedIndex};
use crate::query::ValidatedQuery;
use crate::utils::TextFilter;
use tracing::debug;

/// Whether the inverted index has been built yet
#[derive(Debug)]
pub enum IndexState {
    Unbuilt,
    Built(InvertedIndex),
}

/// Index-first strategy with a scan fallback.
///
/// A lookup with at least one hit is returned as is. Anything else (no index
/// yet, or the word is absent) is rescanned, because the index only trims
/// punctuation at token edges while the scanner drops it everywhere. Set
/// `trust_index_misses` to answer misses from the index alone.
///
/// The index is built through `&mut self`, before the searcher is shared,
/// and is never modified afterwards.
pub struct IndexedSearcher {
    scanner: ScanSearcher,
    filter: TextFilter,
    state: IndexState,
    trust_index_misses: bool,
}

impl IndexedSearcher {
    pub fn new(scanner: ScanSearcher) -> Self {
        let filter = scanner.scanner().filter().clone();
        Self {
            scanner,
            filter,
            state: IndexState::Unbuilt,
            trust_index_misses: false,
        }
    }

    /// Directory-backed searcher for `config`, index not yet built
    pub fn from_config(config: &WordSearchConfig) -> Result<Self> {
        Ok(Self::new(ScanSearcher::from_config(config)?)
            .with_trust_index_misses(config.trust_index_misses))
    }

    pub fn with_trust_index_misses(mut self, trust: bool) -> Self {
        self.trust_index_misses = trust;
        self
    }

    /// Build the index from a full pass over the store. Calling it again
    /// once built keeps the existing index.
    pub fn build_index(&mut self) -> Result<IndexStats> {
        if let IndexState::Built(index) = &self.state {
            return Ok(index.stats().clone());
        }

        let index = InvertedIndex::build_all(self.scanner.store(), &self.filter)?;
        let stats = index.stats().clone();
        self.state = IndexState::Built(index);
        Ok(stats)
    }

    pub fn state(&self) -> &IndexState {
        &self.state
    }

    pub fn index(&self) -> Option<&InvertedIndex> {
        match &self.state {
            IndexState::Built(index) => Some(index),
            IndexState::Unbuilt => None,
        }
    }
}

impl Searcher for IndexedSearcher {
    fn search(&self, word: &str) -> Result<SearchHits> {
        let query = ValidatedQuery::new(word)?;

        if let IndexState::Built(index) = &self.state {
            let files = index.lookup(query.as_str());
            if !files.is_empty() || self.trust_index_misses {
                debug!(query = %query, hits = files.len(), "search from index");
                return Ok(SearchHits::new(files, SearchSource::Index));
            }
        }

        debug!(query = %query, "search from files");
        Ok(SearchHits::new(self.scanner.scan(&query)?, SearchSource::Scan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::scan::Scanner;
    use crate::store::MemoryStore;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn searcher(store: MemoryStore) -> IndexedSearcher {
        let scanner = Scanner::new(2, TextFilter::default()).unwrap();
        IndexedSearcher::new(ScanSearcher::new(Arc::new(store), scanner))
    }

    fn docs() -> MemoryStore {
        MemoryStore::new()
            .with_file("doc1.txt", "Hello World")
            .with_file("doc2.txt", "hello there")
    }

    fn file_set(hits: &SearchHits) -> BTreeSet<&str> {
        hits.files.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_end_to_end() {
        let mut s = searcher(docs());
        s.build_index().unwrap();

        let hits = s.search("hello").unwrap();
        assert_eq!(file_set(&hits), BTreeSet::from(["doc1", "doc2"]));
        assert_eq!(hits.source, SearchSource::Index);

        let hits = s.search("World").unwrap();
        assert_eq!(file_set(&hits), BTreeSet::from(["doc1"]));

        let hits = s.search("xyz").unwrap();
        assert!(hits.is_empty());
        assert_eq!(hits.source, SearchSource::Scan);

        let err = s.search("foo bar").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unbuilt_index_scans() {
        let s = searcher(docs());
        assert!(matches!(s.state(), IndexState::Unbuilt));

        let hits = s.search("HELLO").unwrap();
        assert_eq!(file_set(&hits), BTreeSet::from(["doc1", "doc2"]));
        assert_eq!(hits.source, SearchSource::Scan);
    }

    #[test]
    fn test_index_miss_falls_back_to_scan() {
        // The index keeps "sp.ecial" whole, the scanner reads it as "special"
        let mut s = searcher(docs().with_file("doc3.txt", "sp.ecial"));
        s.build_index().unwrap();

        let hits = s.search("special").unwrap();
        assert_eq!(file_set(&hits), BTreeSet::from(["doc3"]));
        assert_eq!(hits.source, SearchSource::Scan);
    }

    #[test]
    fn test_trusted_miss_skips_scan() {
        let mut s = searcher(docs().with_file("doc3.txt", "sp.ecial")).with_trust_index_misses(true);
        s.build_index().unwrap();

        let hits = s.search("special").unwrap();
        assert!(hits.is_empty());
        assert_eq!(hits.source, SearchSource::Index);

        let hits = s.search("there").unwrap();
        assert_eq!(file_set(&hits), BTreeSet::from(["doc2"]));
    }

    #[test]
    fn test_index_and_scan_agree_on_standalone_words() {
        let store = MemoryStore::new()
            .with_file("a.txt", "say HELLO")
            .with_file("b/c.md", "Hello.\nbye")
            .with_file("d.txt", "(hello) there")
            .with_file("e.txt", "nothing here");
        let scan = searcher(store.clone());
        let mut indexed = searcher(store);
        indexed.build_index().unwrap();

        let from_index = indexed.search("hello").unwrap();
        let from_scan = scan.search("hello").unwrap();
        assert_eq!(from_index.source, SearchSource::Index);
        assert_eq!(file_set(&from_index), file_set(&from_scan));
        assert_eq!(file_set(&from_index), BTreeSet::from(["a", "b/c", "d"]));
    }

    #[test]
    fn test_build_failure_leaves_index_unbuilt() {
        let mut store = docs();
        store.insert_unreadable("locked.txt");
        let mut s = searcher(store);

        assert!(s.build_index().is_err());
        assert!(s.index().is_none());
    }

    #[test]
    fn test_build_index_is_once() {
        let mut s = searcher(docs());
        let files = s.build_index().unwrap().files;
        assert_eq!(files, 2);
        assert_eq!(s.build_index().unwrap().files, 2);
        assert!(s.index().is_some());
    }
}
