//! Schema loading functionality
//!
//! Loads schema fragments from storage backends. Fragments are JSON or YAML
//! renditions of a [`SchemaDocument`]; the file extension picks the parser.
//!
//! Loading is all-or-nothing: any unreadable or unparsable fragment fails
//! the load, and the store is only built once every fragment has been read.

use crate::graph::{SchemaStore, StoreError};
use crate::models::SchemaDocument;
use crate::storage::{StorageBackend, StorageError};
use tracing::{debug, info, warn};

/// Errors raised while loading schema fragments
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Fragment {path} is not valid UTF-8")]
    InvalidUtf8 { path: String },

    #[error("Failed to parse fragment {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Unsupported fragment format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Failed to build schema store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentFormat {
    Json,
    Yaml,
}

impl FragmentFormat {
    fn from_path(path: &str) -> Option<Self> {
        let extension = path.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(FragmentFormat::Json),
            "yaml" | "yml" => Some(FragmentFormat::Yaml),
            _ => None,
        }
    }
}

/// Schema loader that uses a storage backend
pub struct SchemaLoader<B: StorageBackend> {
    storage: B,
}

impl<B: StorageBackend> SchemaLoader<B> {
    /// Create a new schema loader with the given storage backend
    pub fn new(storage: B) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &B {
        &self.storage
    }

    /// Load a single fragment. An empty label is replaced by the path.
    pub async fn load_document(&self, path: &str) -> Result<SchemaDocument, LoadError> {
        let format = FragmentFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_string(),
        })?;
        let content = self.storage.read_file(path).await?;
        let text = String::from_utf8(content).map_err(|_| LoadError::InvalidUtf8 {
            path: path.to_string(),
        })?;

        let parse_error = |reason: String| LoadError::Parse {
            path: path.to_string(),
            reason,
        };
        let mut document: SchemaDocument = match format {
            FragmentFormat::Json => {
                serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?
            }
            FragmentFormat::Yaml => {
                serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
            }
        };
        if document.label.is_empty() {
            document.label = path.to_string();
        }

        debug!(
            "Loaded fragment {} ({} namespaces)",
            path,
            document.namespaces.len()
        );
        Ok(document)
    }

    /// Load every `.json`, `.yaml` and `.yml` fragment directly inside `dir`,
    /// in file name order
    pub async fn load_documents(&self, dir: &str) -> Result<Vec<SchemaDocument>, LoadError> {
        let mut files = self.storage.list_files(dir).await?;
        files.sort();

        let mut documents = Vec::new();
        for file_name in files {
            if FragmentFormat::from_path(&file_name).is_none() {
                warn!("Skipping non-schema file {}/{}", dir, file_name);
                continue;
            }
            let path = format!("{}/{}", dir.trim_end_matches('/'), file_name);
            documents.push(self.load_document(&path).await?);
        }

        info!("Loaded {} schema fragments from {}", documents.len(), dir);
        Ok(documents)
    }

    /// Load root and override directories and build the store from them
    pub async fn load_store(
        &self,
        root_dirs: &[&str],
        override_dirs: &[&str],
    ) -> Result<SchemaStore, LoadError> {
        let mut roots = Vec::new();
        for dir in root_dirs {
            roots.extend(self.load_documents(dir).await?);
        }
        let mut overrides = Vec::new();
        for dir in override_dirs {
            overrides.extend(self.load_documents(dir).await?);
        }

        info!(
            "Building schema store from {} root and {} override fragments",
            roots.len(),
            overrides.len()
        );
        let store = SchemaStore::builder()
            .extend_roots(roots)
            .extend_overrides(overrides)
            .build()?;
        Ok(store)
    }
}
