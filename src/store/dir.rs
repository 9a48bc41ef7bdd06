use super::FileStore;
use crate::error::Result;
use ignore::WalkBuilder;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// File store backed by a directory on disk.
///
/// Listed paths are UTF-8 strings. A file whose name is not valid UTF-8 is
/// listed under its lossy form, and the real relative path is remembered so
/// `open` still reaches it.
#[derive(Debug)]
pub struct DirStore {
    root: PathBuf,
    lossy_paths: RwLock<FxHashMap<String, PathBuf>>,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lossy_paths: RwLock::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store path for `path` and whether it lost bytes in decoding
    fn relative<'p>(&self, path: &'p Path) -> Option<(String, &'p Path, bool)> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some((parts.join("/"), rel, rel.to_str().is_none()))
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let lossy = self.lossy_paths.read().unwrap_or_else(PoisonError::into_inner);
        match lossy.get(path) {
            Some(real) => self.root.join(real),
            None => self.root.join(path),
        }
    }
}

impl FileStore for DirStore {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + Send + '_>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn files(&self) -> Result<Vec<String>> {
        // Every file counts: no hidden-file or ignore-file filtering
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        let mut lossy = FxHashMap::default();
        for entry in walker {
            let entry = entry?;
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            if is_dir {
                continue;
            }
            if let Some((name, rel, lossy_name)) = self.relative(entry.path()) {
                if lossy_name {
                    lossy.insert(name.clone(), rel.to_path_buf());
                }
                files.push(name);
            }
        }
        files.sort();

        *self.lossy_paths.write().unwrap_or_else(PoisonError::into_inner) = lossy;
        Ok(files)
    }
}
