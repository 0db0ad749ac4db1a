//! Validation functionality
//!
//! Provides validation logic for:
//! - JSON documents against the schema graph
//! - Reference alias usage (unused aliases)
//! - Resource identifiers against URI templates
//! - Schema graph consistency (base types, terms, cycles, published versions)

pub mod consistency;
pub mod document;
mod error;
pub mod primitives;
pub mod uri_template;
pub mod usage;

pub use consistency::{
    ConsistencyIssue, ConsistencyReport, PublishedVersions, SchemaConsistencyChecker,
};
pub use document::{DocumentReport, DocumentValidator, SkipReason, Validated};
pub use error::ValidationError;
pub use uri_template::{NearMiss, TemplateMatch, TemplateSource, UriCheck, UriTemplate, UriTemplateMatcher};
pub use usage::{find_unused_aliases, find_unused_document_aliases, find_unused_namespace_aliases};
