use super::FileStore;
use crate::error::Result;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Cursor};

/// In-memory file store. Entries inserted with `insert_unreadable` are
/// listed by `files` but fail to open.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), Some(content.into()));
    }

    pub fn insert_unreadable(&mut self, path: impl Into<String>) {
        self.files.insert(path.into(), None);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileStore for MemoryStore {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufRead + Send + '_>> {
        match self.files.get(path) {
            Some(Some(content)) => Ok(Box::new(Cursor::new(content.as_slice()))),
            Some(None) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "file does not exist")),
        }
    }

    fn files(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_and_list() {
        let mut store = MemoryStore::new().with_file("b.txt", "bee").with_file("a.txt", "ay");
        store.insert_unreadable("c.txt");

        assert_eq!(store.files().unwrap(), vec!["a.txt", "b.txt", "c.txt"]);

        let mut text = String::new();
        store.open("b.txt").unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "bee");

        assert_eq!(
            store.open("c.txt").err().map(|e| e.kind()),
            Some(io::ErrorKind::PermissionDenied)
        );
        assert_eq!(
            store.open("d.txt").err().map(|e| e.kind()),
            Some(io::ErrorKind::NotFound)
        );
    }
}
