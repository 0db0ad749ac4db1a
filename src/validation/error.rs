//! Error types for document validation

use super::uri_template::NearMiss;
use crate::resolve::ResolveError;
use thiserror::Error;

/// A document violation. Every variant carries the JSON path of the
/// offending value (`$.Status.Health`, `$.Members[2]`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The document's `@odata.type` does not resolve
    #[error("{path}: unable to locate type \"{type_name}\"")]
    UnknownType { path: String, type_name: String },

    /// A reference reached during the walk failed to resolve
    #[error("{path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: ResolveError,
    },

    /// A key has no property on the type or its ancestors and the type is closed
    #[error("{path}: property \"{name}\" is not defined on {type_name}")]
    UnknownProperty {
        path: String,
        name: String,
        type_name: String,
    },

    /// The JSON kind of a value disagrees with the schema
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A string fails the lexical pattern of its primitive or `Validation.Pattern`
    #[error("{path}: \"{value}\" does not match {format}")]
    Format {
        path: String,
        format: String,
        value: String,
    },

    #[error("{path}: \"{value}\" is not a member of {enum_type}")]
    EnumMember {
        path: String,
        value: String,
        enum_type: String,
    },

    /// An entity-typed value is not a link
    #[error("{path}: {type_name} value has no @odata.id")]
    MissingIdentifier { path: String, type_name: String },

    /// The primitive is outside the accepted closed set
    #[error("{path}: unsupported primitive type {primitive}")]
    UnsupportedPrimitive { path: String, primitive: String },

    /// An entry of an operations map is not a valid action
    #[error("{path}: invalid action \"{name}\": {reason}")]
    InvalidAction {
        path: String,
        name: String,
        reason: String,
    },

    /// A `Validation.Pattern` annotation is not a valid regular expression
    #[error("{path}: invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        path: String,
        pattern: String,
        reason: String,
    },

    /// A property's declared type resolves to something that cannot hold a value
    #[error("{path}: property type {type_ref} is a {kind}")]
    InvalidPropertyType {
        path: String,
        type_ref: String,
        kind: String,
    },

    /// Nesting exceeded the configured depth
    #[error("{path}: nesting deeper than {max_depth} levels, possible cyclic type")]
    CyclicType { path: String, max_depth: usize },

    /// `@odata.id` matches none of the type's URI templates
    #[error("{path}: \"{uri}\" matches no URI template of {type_name}{}", describe_near_misses(.near_misses))]
    UriTemplateMismatch {
        path: String,
        uri: String,
        type_name: String,
        near_misses: Vec<NearMiss>,
    },
}

fn describe_near_misses(near_misses: &[NearMiss]) -> String {
    if near_misses.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = near_misses
        .iter()
        .map(|miss| format!("{} (extra \"{}\")", miss.template, miss.remainder))
        .collect();
    format!("; closest: {}", parts.join(", "))
}

impl ValidationError {
    /// JSON path of the offending value
    pub fn path(&self) -> &str {
        match self {
            ValidationError::UnknownType { path, .. }
            | ValidationError::Resolve { path, .. }
            | ValidationError::UnknownProperty { path, .. }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::Format { path, .. }
            | ValidationError::EnumMember { path, .. }
            | ValidationError::MissingIdentifier { path, .. }
            | ValidationError::UnsupportedPrimitive { path, .. }
            | ValidationError::InvalidAction { path, .. }
            | ValidationError::InvalidPattern { path, .. }
            | ValidationError::InvalidPropertyType { path, .. }
            | ValidationError::CyclicType { path, .. }
            | ValidationError::UriTemplateMismatch { path, .. } => path,
        }
    }
}
