//! Error types for type reference resolution

use crate::models::TypeRefError;
use thiserror::Error;

/// Errors that can occur while resolving a type reference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Nothing in the graph matches the reference
    #[error("Unable to locate type \"{type_ref}\"")]
    Unresolved { type_ref: String },

    /// `Collection(Collection(...))`
    #[error("Type reference \"{type_ref}\" nests Collection(...) wrappers")]
    NestedCollection { type_ref: String },

    /// The reference is not of the form `Namespace.Name`
    #[error("Type reference \"{type_ref}\" is malformed")]
    MalformedReference { type_ref: String },

    /// A base type chain loops back on itself
    #[error("Cyclic inheritance detected: {}", chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },

    /// Two namespaces of the same base name carry the same version
    #[error("Namespaces {first} and {second} share version {version}")]
    AmbiguousVersion {
        first: String,
        second: String,
        version: String,
    },

    /// A base type or lookup target resolved to something without properties
    #[error("Type \"{type_ref}\" is a {kind}, expected an EntityType or ComplexType")]
    NotStructured { type_ref: String, kind: String },
}

impl From<TypeRefError> for ResolveError {
    fn from(e: TypeRefError) -> Self {
        match e {
            TypeRefError::NestedCollection(type_ref) => ResolveError::NestedCollection { type_ref },
            TypeRefError::Malformed(type_ref) => ResolveError::MalformedReference { type_ref },
        }
    }
}
