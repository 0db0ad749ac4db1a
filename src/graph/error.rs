//! Error types for schema graph construction

use thiserror::Error;

/// Errors raised while building a [`SchemaStore`](super::SchemaStore)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Namespace name is empty or malformed
    #[error("Invalid namespace name '{name}' in {document}: {reason}")]
    InvalidNamespaceName {
        document: String,
        name: String,
        reason: String,
    },

    /// A definition is filed under a key that differs from its own name
    #[error("Definition '{name}' is filed under key '{key}' in namespace {namespace}")]
    DefinitionKeyMismatch {
        namespace: String,
        key: String,
        name: String,
    },
}
