use crate::error::{Result, SearchError};
use crate::index::stats::IndexStats;
use crate::store::{FileRef, FileStore};
use crate::utils::{TextFilter, Tokens};
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Word -> files mapping built in one pass over the file tree.
///
/// File refs are interned to dense ids and each posting list is a bitmap of
/// those ids. The index has no mutating methods; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InvertedIndex {
    refs: Vec<FileRef>,
    postings: FxHashMap<String, RoaringBitmap>,
    stats: IndexStats,
}

impl InvertedIndex {
    /// Enumerate `store` and index every file in it
    pub fn build_all(store: &dyn FileStore, filter: &TextFilter) -> Result<Self> {
        let files = store.files()?;
        Self::build(store, &files, filter)
    }

    /// Index `files`. The first open or read failure aborts the whole build.
    pub fn build(store: &dyn FileStore, files: &[String], filter: &TextFilter) -> Result<Self> {
        let start = Instant::now();
        info!(files = files.len(), "indexing");

        let mut builder = IndexBuilder::default();
        for path in files {
            builder.add_file(store, path, filter)?;
        }

        let index = builder.finish(files.len(), start);
        info!(
            words = index.stats.words,
            file_refs = index.stats.file_refs,
            duration_ms = index.stats.duration_ms,
            "indexed"
        );
        Ok(index)
    }

    /// Files containing `word`, compared case-insensitively. A miss is an
    /// empty vector. Results come in file enumeration order.
    pub fn lookup(&self, word: &str) -> Vec<FileRef> {
        match self.postings.get(&word.to_lowercase()) {
            Some(bitmap) => bitmap
                .iter()
                .map(|id| self.refs[id as usize].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.postings.contains_key(&word.to_lowercase())
    }

    /// True when no word was indexed at all
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// The `n` words present in the most files, ties broken alphabetically
    pub fn top_words(&self, n: usize) -> Vec<(&str, u64)> {
        let mut words: Vec<_> = self
            .postings
            .iter()
            .map(|(word, bitmap)| (word.as_str(), bitmap.len()))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}

#[derive(Default)]
struct IndexBuilder {
    refs: Vec<FileRef>,
    ref_ids: FxHashMap<FileRef, u32>,
    postings: FxHashMap<String, RoaringBitmap>,
    tokens: u64,
}

impl IndexBuilder {
    fn add_file(&mut self, store: &dyn FileStore, path: &str, filter: &TextFilter) -> Result<()> {
        let id = self.ref_id(FileRef::from_path(path));
        let reader = store.open(path).map_err(|e| SearchError::io(path, e))?;

        let mut count = 0u64;
        for token in Tokens::new(reader, filter) {
            let token = token.map_err(|e| SearchError::io(path, e))?;
            self.postings
                .entry(token.to_lowercase())
                .or_default()
                .insert(id);
            count += 1;
        }

        debug!(path, tokens = count, "indexed file");
        self.tokens += count;
        Ok(())
    }

    fn ref_id(&mut self, file_ref: FileRef) -> u32 {
        if let Some(&id) = self.ref_ids.get(&file_ref) {
            return id;
        }
        let id = self.refs.len() as u32;
        self.refs.push(file_ref.clone());
        self.ref_ids.insert(file_ref, id);
        id
    }

    fn finish(self, files: usize, start: Instant) -> InvertedIndex {
        let stats = IndexStats {
            files,
            file_refs: self.refs.len(),
            words: self.postings.len(),
            tokens: self.tokens,
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        InvertedIndex {
            refs: self.refs,
            postings: self.postings,
            stats,
        }
    }
}
