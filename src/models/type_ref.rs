//! Type reference strings
//!
//! A type reference is a qualified name (`Namespace.Name`) optionally wrapped
//! once in `Collection(...)`.

use std::fmt;

const COLLECTION_PREFIX: &str = "Collection(";

/// A parsed type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// The qualified name with any collection wrapper removed
    pub qualified: String,
    /// Whether the reference was wrapped in `Collection(...)`
    pub collection: bool,
}

/// Error parsing a type reference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeRefError {
    #[error("Type reference '{0}' nests Collection(...) wrappers")]
    NestedCollection(String),
    #[error("Type reference '{0}' is empty or has an unbalanced Collection(...) wrapper")]
    Malformed(String),
}

impl TypeRef {
    /// Parse a type reference string
    pub fn parse(raw: &str) -> Result<Self, TypeRefError> {
        let trimmed = raw.trim();
        let (inner, collection) = match strip_collection(trimmed) {
            Some(inner) => (inner.trim(), true),
            None => (trimmed, false),
        };
        if collection && inner.starts_with(COLLECTION_PREFIX) {
            return Err(TypeRefError::NestedCollection(raw.to_string()));
        }
        if inner.is_empty() || inner.contains('(') || inner.contains(')') {
            return Err(TypeRefError::Malformed(raw.to_string()));
        }
        Ok(Self {
            qualified: inner.to_string(),
            collection,
        })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection {
            write!(f, "{}{})", COLLECTION_PREFIX, self.qualified)
        } else {
            write!(f, "{}", self.qualified)
        }
    }
}

/// Strip one `Collection(...)` wrapper, if present
pub fn strip_collection(raw: &str) -> Option<&str> {
    raw.strip_prefix(COLLECTION_PREFIX)
        .and_then(|rest| rest.strip_suffix(')'))
}

/// Split a qualified name into namespace and local name on the last `.`
pub fn split_qualified(qualified: &str) -> Option<(&str, &str)> {
    let (namespace, local) = qualified.rsplit_once('.')?;
    if namespace.is_empty() || local.is_empty() {
        return None;
    }
    Some((namespace, local))
}
