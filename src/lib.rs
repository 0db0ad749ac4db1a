//! CSDL Schema SDK - type resolution and document validation over versioned schema graphs
//!
//! Provides unified interfaces for:
//! - Schema fragment loading (via storage backends)
//! - An immutable schema graph store with versioned namespace lookup
//! - Type reference resolution (collections, aliases, latest shared versions, inheritance)
//! - JSON document validation against the graph
//! - Reference alias usage analysis
//! - URI template matching
//! - Schema consistency checks
//!
//! ## Example
//!
//! ```rust,ignore
//! use csdl_schema_sdk::{DocumentValidator, SchemaStore, TypeResolver, ValidatorConfig};
//!
//! let store = SchemaStore::builder().add_root(document).build()?;
//! let config = ValidatorConfig::default();
//! let validator = DocumentValidator::new(TypeResolver::new(&store, &config));
//! validator.validate(&json, "Chassis.json")?;
//! ```

pub mod config;
pub mod graph;
pub mod model;
pub mod models;
pub mod resolve;
pub mod storage;
pub mod validation;

// Re-export commonly used types
pub use config::{ValidatorConfig, ValidatorConfigBuilder};
pub use graph::{DefinitionRef, SchemaProvider, SchemaStore, SchemaStoreBuilder, StoreError};
pub use model::{LoadError, SchemaLoader};
#[cfg(feature = "native-fs")]
pub use storage::filesystem::FileSystemStorageBackend;
pub use storage::{MemoryStorageBackend, StorageBackend, StorageError};

pub use resolve::{
    PrimitiveType, PropertyMatch, ResolveError, Resolved, ResolvedType, TypeResolver,
};
pub use validation::{
    ConsistencyIssue, ConsistencyReport, DocumentReport, DocumentValidator, PublishedVersions,
    SchemaConsistencyChecker, UriCheck, UriTemplate, UriTemplateMatcher, Validated,
    ValidationError, find_unused_aliases, find_unused_document_aliases,
};

// Re-export models
pub use models::{
    AnnotationValue, Definition, Namespace, NamespaceName, Property, Reference, SchemaDocument,
    SchemaVersion, TypeRef,
};
