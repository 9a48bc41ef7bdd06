//! Runtime configuration.
//!
//! Every field has a serde default so a partial JSON file is valid; command
//! line flags override whatever the file provides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runes stripped from token edges and skipped by the filtering reader
pub const SOFT_HYPHEN: char = '\u{00AD}';
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSearchConfig {
    /// Root of the read-only file tree
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Scan worker count. 0 means use the number of CPU cores.
    #[serde(default)]
    pub workers: usize,

    /// Treat an index miss as a definitive "no match" instead of rescanning
    #[serde(default)]
    pub trust_index_misses: bool,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for WordSearchConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            workers: 0,
            trust_index_misses: false,
            text: TextConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl WordSearchConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: WordSearchConfig =
            serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Worker count with the CPU-count fallback applied
    pub fn effective_workers(&self) -> usize {
        effective_workers(self.workers)
    }
}

/// Resolve a requested worker count, 0 meaning one per core
pub fn effective_workers(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Text normalization settings shared by the tokenizer and the scanner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_filtered_chars")]
    pub filtered_chars: Vec<char>,

    /// Stripped tokens equal to one of these are dropped
    #[serde(default = "default_non_words")]
    pub non_words: Vec<String>,
}

fn default_filtered_chars() -> Vec<char> {
    vec![
        '.',
        ',',
        SOFT_HYPHEN,
        ZERO_WIDTH_SPACE,
        '(',
        ')',
        '?',
        '!',
    ]
}

fn default_non_words() -> Vec<String> {
    vec!["-".to_string()]
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            filtered_chars: default_filtered_chars(),
            non_words: default_non_words(),
        }
    }
}

/// Search server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Result cache entries. 0 disables caching.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
}

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_cache_size() -> usize {
    128
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            cache_size: default_cache_size(),
        }
    }
}
