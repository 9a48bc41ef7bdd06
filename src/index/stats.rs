use crate::index::InvertedIndex;
use serde::{Deserialize, Serialize};

/// Summary of a finished index build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files read during the build
    pub files: usize,
    /// Distinct file refs (files differing only by extension count once)
    pub file_refs: usize,
    /// Distinct lowercased words
    pub words: usize,
    /// Tokens seen across all files
    pub tokens: u64,
    pub duration_ms: f64,
}

/// Display index statistics
pub fn show_stats(index: &InvertedIndex) {
    let stats = index.stats();

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Files read:       {}", stats.files);
    println!("File refs:        {}", stats.file_refs);
    println!("Distinct words:   {}", stats.words);
    println!("Tokens:           {}", stats.tokens);
    println!("Build time:       {:.1} ms", stats.duration_ms);

    let top = index.top_words(15);
    if !top.is_empty() {
        println!();
        println!("Most widespread words:");
        for (word, files) in top {
            println!("  {:20} {}", word, files);
        }
    }
}
