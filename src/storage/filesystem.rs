//! File system storage backend
//!
//! Reads schema fragments from a directory tree on disk.
//!
//! ## Security
//!
//! Paths are resolved relative to the base directory. Paths containing ".."
//! are rejected and existing paths are canonicalized and required to stay
//! inside the base directory (symlinks cannot escape it).

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// File system storage backend
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a backend rooted at `base_path`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use csdl_schema_sdk::storage::filesystem::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/srv/schemas");
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = path.trim_start_matches('/');
        let full = self.base_path.join(relative);
        if relative.contains("..")
            || full
                .components()
                .any(|component| matches!(component, Component::ParentDir))
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path traversal not allowed: {}",
                path
            )));
        }

        if !full.exists() {
            return Ok(full);
        }

        let canonical = full
            .canonicalize()
            .map_err(|e| StorageError::IoError(format!("Failed to resolve {}: {}", path, e)))?;
        let base = self
            .base_path
            .canonicalize()
            .unwrap_or_else(|_| self.base_path.clone());
        if !canonical.starts_with(&base) {
            return Err(StorageError::PermissionDenied(format!(
                "Path escapes base directory: {}",
                path
            )));
        }
        Ok(canonical)
    }

    async fn metadata(&self, path: &str) -> Result<Option<std::fs::Metadata>, StorageError> {
        let full_path = self.resolve_path(path)?;
        match fs::metadata(&full_path).await {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(format!(
                "Failed to stat {}: {}",
                path, e
            ))),
        }
    }
}

#[async_trait(?Send)]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to read file {}: {}", path, e))
            }
        })
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let full_path = self.resolve_path(dir)?;

        let mut read_dir = fs::read_dir(&full_path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::DirectoryNotFound(dir.to_string())
            } else {
                StorageError::IoError(format!("Failed to read directory {}: {}", dir, e))
            }
        })?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to read directory entry: {}", e)))?
        {
            if let Ok(file_type) = entry.file_type().await
                && file_type.is_file()
                && let Some(file_name) = entry.file_name().to_str()
            {
                entries.push(file_name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    async fn file_exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.metadata(path).await?.is_some_and(|m| m.is_file()))
    }

    async fn dir_exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(self.metadata(path).await?.is_some_and(|m| m.is_dir()))
    }
}
