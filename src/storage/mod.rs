//! Storage backend abstraction
//!
//! Schema fragments are read through the StorageBackend trait:
//! - MemoryStorageBackend: fragments held in memory (tests, embedded schemas)
//! - FileSystemStorageBackend: Native file system (feature `native-fs`)

use async_trait::async_trait;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

/// Trait for storage backends
///
/// Read-only access to the files holding schema fragments.
#[async_trait(?Send)]
pub trait StorageBackend: Send + Sync {
    /// Read a file from storage
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// List the files (not subdirectories) directly inside a directory
    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StorageError>;

    /// Check if a file exists
    async fn file_exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Check if a directory exists
    async fn dir_exists(&self, path: &str) -> Result<bool, StorageError>;
}

pub mod memory;

#[cfg(feature = "native-fs")]
pub mod filesystem;

pub use memory::MemoryStorageBackend;
