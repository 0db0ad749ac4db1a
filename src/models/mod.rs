//! Models module for the SDK
//!
//! Defines the in-memory schema graph: namespaces, definitions, annotations,
//! references and the version and type-reference value types used to query it.

pub mod annotation;
pub mod definition;
pub mod namespace;
pub mod type_ref;
pub mod version;

pub use annotation::{AnnotationValue, Annotations};
pub use definition::{
    Action, Definition, DefinitionKind, EnumMember, EnumType, Parameter, Property, PropertyKind,
    ReturnType, StructuredType, Term, TypeDefinition,
};
pub use namespace::{EntityContainer, Namespace, Reference, SchemaDocument};
pub use type_ref::{TypeRef, TypeRefError, split_qualified, strip_collection};
pub use version::{NamespaceName, SchemaVersion, VersionParseError};
