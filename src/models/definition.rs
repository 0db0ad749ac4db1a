//! Schema definitions
//!
//! A [`Definition`] is any named construct inside a namespace. Structured
//! types (entity and complex types) share [`StructuredType`]; navigation
//! properties live in the same property map, marked by [`PropertyKind`].

use super::annotation::Annotations;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named schema construct
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum Definition {
    EntityType(StructuredType),
    ComplexType(StructuredType),
    EnumType(EnumType),
    TypeDefinition(TypeDefinition),
    Action(Action),
    Term(Term),
}

/// Discriminant of a [`Definition`], used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    EntityType,
    ComplexType,
    EnumType,
    TypeDefinition,
    Action,
    Term,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DefinitionKind::EntityType => "EntityType",
            DefinitionKind::ComplexType => "ComplexType",
            DefinitionKind::EnumType => "EnumType",
            DefinitionKind::TypeDefinition => "TypeDefinition",
            DefinitionKind::Action => "Action",
            DefinitionKind::Term => "Term",
        };
        f.write_str(name)
    }
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::EntityType(t) | Definition::ComplexType(t) => &t.name,
            Definition::EnumType(t) => &t.name,
            Definition::TypeDefinition(t) => &t.name,
            Definition::Action(a) => &a.name,
            Definition::Term(t) => &t.name,
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::EntityType(_) => DefinitionKind::EntityType,
            Definition::ComplexType(_) => DefinitionKind::ComplexType,
            Definition::EnumType(_) => DefinitionKind::EnumType,
            Definition::TypeDefinition(_) => DefinitionKind::TypeDefinition,
            Definition::Action(_) => DefinitionKind::Action,
            Definition::Term(_) => DefinitionKind::Term,
        }
    }

    /// The qualified name of the parent definition, if any
    pub fn base_type(&self) -> Option<&str> {
        match self {
            Definition::EntityType(t) | Definition::ComplexType(t) => t.base_type.as_deref(),
            Definition::Term(t) => t.base_term.as_deref(),
            _ => None,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Definition::EntityType(t) | Definition::ComplexType(t) => &t.annotations,
            Definition::EnumType(t) => &t.annotations,
            Definition::TypeDefinition(t) => &t.annotations,
            Definition::Action(a) => &a.annotations,
            Definition::Term(t) => &t.annotations,
        }
    }

    pub fn is_abstract(&self) -> bool {
        match self {
            Definition::EntityType(t) | Definition::ComplexType(t) => t.is_abstract,
            _ => false,
        }
    }

    /// The structured body of an entity or complex type
    pub fn as_structured(&self) -> Option<&StructuredType> {
        match self {
            Definition::EntityType(t) | Definition::ComplexType(t) => Some(t),
            _ => None,
        }
    }
}

/// Body of an entity type or complex type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StructuredType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl StructuredType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}

/// Whether a property is structural or a navigation link
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyKind {
    #[default]
    Structural,
    Navigation,
}

/// A property or navigation property of a structured type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    /// Type reference, possibly wrapped in `Collection(...)`
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub kind: PropertyKind,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Property {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            nullable: None,
            kind: PropertyKind::Structural,
            annotations: Annotations::new(),
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.kind == PropertyKind::Navigation
    }
}

/// An enumeration type
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnumType {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_type: Option<String>,
    #[serde(default)]
    pub members: BTreeMap<String, EnumMember>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnumMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default)]
    pub annotations: Annotations,
}

/// A named alias over a primitive type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    pub name: String,
    pub underlying_type: String,
    #[serde(default)]
    pub annotations: Annotations,
}

/// An action. The first parameter is the binding parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub is_bound: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<ReturnType>,
    #[serde(default)]
    pub annotations: Annotations,
}

impl Action {
    pub fn binding_parameter(&self) -> Option<&Parameter> {
        self.parameters.first()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnType {
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

/// An annotation term
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
}
