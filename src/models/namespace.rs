//! Namespaces, references and schema documents

use super::annotation::Annotations;
use super::definition::Definition;
use super::version::NamespaceName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named, optionally versioned collection of definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    /// `Base` or `Base.vMAJOR_MINOR_PATCH`
    pub name: String,
    #[serde(default)]
    pub definitions: BTreeMap<String, Definition>,
    /// Annotations on the schema element itself
    #[serde(default)]
    pub annotations: Annotations,
    /// Out-of-line annotation sets keyed by their target path
    #[serde(default)]
    pub targeted_annotations: BTreeMap<String, Annotations>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_container: Option<EntityContainer>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn parsed_name(&self) -> NamespaceName {
        NamespaceName::parse(&self.name)
    }

    pub fn definition(&self, local_name: &str) -> Option<&Definition> {
        self.definitions.get(local_name)
    }

    /// Insert a definition under its own name
    pub fn insert(&mut self, definition: Definition) {
        self.definitions
            .insert(definition.name().to_string(), definition);
    }
}

/// The service entity container of a namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntityContainer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

/// A cross-document import record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub uri: String,
    /// Alias (or the namespace itself when no alias is declared) to included namespace
    #[serde(default)]
    pub includes: BTreeMap<String, String>,
}

impl Reference {
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.includes.keys().map(String::as_str)
    }
}

/// One schema document: its references and the namespaces it declares
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    /// Source label (file name or URI) used in diagnostics
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
}

impl SchemaDocument {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Every alias declared across this document's references
    pub fn declared_aliases(&self) -> impl Iterator<Item = &str> {
        self.references.iter().flat_map(Reference::aliases)
    }
}
