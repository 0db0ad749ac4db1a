//! In-memory storage backend
//!
//! Holds files in a map keyed by normalized path (no leading or trailing
//! `/`). Directories exist implicitly whenever a file lies beneath them.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::collections::BTreeMap;

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Storage backend over an in-memory file map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageBackend {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: &str, content: impl Into<Vec<u8>>) {
        self.files
            .insert(normalize(path).to_string(), content.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Relative names of files directly inside `dir`
    fn children<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        let dir = normalize(dir);
        self.files.keys().filter_map(move |path| {
            let rest = if dir.is_empty() {
                path.as_str()
            } else {
                path.strip_prefix(dir)?.strip_prefix('/')?
            };
            Some(rest)
        })
    }
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.files
            .get(normalize(path))
            .cloned()
            .ok_or_else(|| StorageError::FileNotFound(path.to_string()))
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let mut any = false;
        let mut files = Vec::new();
        for rest in self.children(dir) {
            any = true;
            if !rest.contains('/') {
                files.push(rest.to_string());
            }
        }
        if !any {
            return Err(StorageError::DirectoryNotFound(dir.to_string()));
        }
        Ok(files)
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.files.contains_key(normalize(path)))
    }

    async fn dir_exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.children(path).next().is_some())
    }
}
