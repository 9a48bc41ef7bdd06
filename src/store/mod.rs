//! File store abstraction.
//!
//! The search core only needs two capabilities from the file tree: open a
//! file by path and list every non-directory path under the root. Paths are
//! store-relative and `/`-separated.

mod dir;
mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead};

/// Read-only hierarchical file store
pub trait FileStore: Send + Sync {
    /// Open a file for buffered reading
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + Send + '_>>;

    /// All non-directory paths under the root, recursively, in sorted order
    fn files(&self) -> Result<Vec<String>>;
}

/// Externally visible identifier of a matched file: its path without the
/// extension. `notes/a.txt` and `notes/a.md` share the ref `notes/a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileRef(String);

impl FileRef {
    /// The extension starts at the last `.` of the final path element,
    /// so a dotfile has an empty name left.
    pub fn from_path(path: &str) -> Self {
        let name_start = path.rfind('/').map_or(0, |i| i + 1);
        let stem_end = path[name_start..]
            .rfind('.')
            .map_or(path.len(), |dot| name_start + dot);
        FileRef(path[..stem_end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_ref_strips_extension() {
        assert_eq!(FileRef::from_path("doc1.txt").as_str(), "doc1");
        assert_eq!(FileRef::from_path("a/b/c.tar.gz").as_str(), "a/b/c.tar");
        assert_eq!(FileRef::from_path("README").as_str(), "README");
        assert_eq!(FileRef::from_path("v1.2/notes").as_str(), "v1.2/notes");
        assert_eq!(FileRef::from_path("dir/.bashrc").as_str(), "dir/");
    }

    #[test]
    fn test_extension_variants_collapse() {
        assert_eq!(FileRef::from_path("a.txt"), FileRef::from_path("a.md"));
        assert_ne!(FileRef::from_path("a.txt"), FileRef::from_path("b.txt"));
    }
}
