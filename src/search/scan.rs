use super::{SearchHits, SearchSource, Searcher};
use crate::config::WordSearchConfig;
use crate::error::Result;
use crate::query::ValidatedQuery;
use crate::scan::Scanner;
use crate::store::{DirStore, FileRef, FileStore};
use crate::utils::TextFilter;
use std::sync::Arc;

/// Scan-only strategy: enumerate the whole tree on every search
pub struct ScanSearcher {
    store: Arc<dyn FileStore>,
    scanner: Scanner,
}

impl ScanSearcher {
    pub fn new(store: Arc<dyn FileStore>, scanner: Scanner) -> Self {
        Self { store, scanner }
    }

    /// Directory-backed scanner for `config`
    pub fn from_config(config: &WordSearchConfig) -> Result<Self> {
        let store: Arc<dyn FileStore> = Arc::new(DirStore::new(&config.root));
        let scanner = Scanner::new(config.workers, TextFilter::from_config(&config.text))?;
        Ok(Self::new(store, scanner))
    }

    pub fn store(&self) -> &dyn FileStore {
        self.store.as_ref()
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub(crate) fn scan(&self, query: &ValidatedQuery) -> Result<Vec<FileRef>> {
        let files = self.store.files()?;
        self.scanner.scan(self.store.as_ref(), query, &files)
    }
}

impl Searcher for ScanSearcher {
    fn search(&self, word: &str) -> Result<SearchHits> {
        let query = ValidatedQuery::new(word)?;
        Ok(SearchHits::new(self.scan(&query)?, SearchSource::Scan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SearchError};
    use crate::store::MemoryStore;

    fn searcher(store: MemoryStore) -> ScanSearcher {
        ScanSearcher::new(Arc::new(store), Scanner::new(2, TextFilter::default()).unwrap())
    }

    #[test]
    fn test_scan_search() {
        let s = searcher(
            MemoryStore::new()
                .with_file("doc1.txt", "Hello World")
                .with_file("doc2.txt", "hello there"),
        );

        let mut hits = s.search("  hello ").unwrap();
        hits.files.sort();
        assert_eq!(hits.files, vec!["doc1", "doc2"]);
        assert_eq!(hits.source, SearchSource::Scan);
    }

    #[test]
    fn test_validation_happens_before_scanning() {
        let mut store = MemoryStore::new();
        store.insert_unreadable("broken.txt");
        let s = searcher(store);

        let err = s.search("foo bar").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = s.search("foo").unwrap_err();
        assert!(matches!(err, SearchError::Io { .. }));
    }
}
