//! Annotation values attached to definitions, properties and members

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annotations keyed by term name as written in the schema (e.g. `OData.Description`)
pub type Annotations = BTreeMap<String, AnnotationValue>;

/// A typed annotation value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AnnotationValue {
    Bool(bool),
    String(String),
    EnumMember(String),
    Collection(Vec<AnnotationValue>),
    Record(BTreeMap<String, AnnotationValue>),
    /// A term applied without a value
    Empty,
}

impl AnnotationValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::String(s) | AnnotationValue::EnumMember(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the annotation switches a flag on. A term applied without a
    /// value takes the default `true` of boolean terms.
    pub fn is_enabled(&self) -> bool {
        matches!(self, AnnotationValue::Bool(true) | AnnotationValue::Empty)
    }

    /// String items of a collection value, or the single string of a scalar
    pub fn strings(&self) -> Vec<&str> {
        match self {
            AnnotationValue::Collection(items) => {
                items.iter().filter_map(AnnotationValue::as_str).collect()
            }
            other => other.as_str().into_iter().collect(),
        }
    }
}
