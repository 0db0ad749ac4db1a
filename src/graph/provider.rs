//! Query interface over a schema graph

use crate::models::{Definition, Namespace, Reference, SchemaVersion};

/// A definition together with the namespace that declares it
#[derive(Debug, Clone, Copy)]
pub struct DefinitionRef<'s> {
    pub namespace: &'s Namespace,
    pub definition: &'s Definition,
}

impl<'s> DefinitionRef<'s> {
    pub fn name(&self) -> &'s str {
        self.definition.name()
    }

    pub fn namespace_name(&self) -> &'s str {
        &self.namespace.name
    }

    /// `Namespace.Name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace.name, self.definition.name())
    }

    pub fn version(&self) -> Option<SchemaVersion> {
        self.namespace.parsed_name().version
    }
}

/// Read-only queries the resolver and validators need from a schema graph.
///
/// Implementations must be fully populated before the first query; a
/// namespace that is not present is reported absent, never "pending".
pub trait SchemaProvider {
    /// Look up a definition by exact namespace and local name
    fn definition(&self, namespace: &str, local_name: &str) -> Option<DefinitionRef<'_>>;

    /// Look up a namespace by its full name
    fn namespace(&self, name: &str) -> Option<&Namespace>;

    /// All namespaces sharing a base name, newest version first
    fn namespaces_by_base_name(&self, base_name: &str) -> Vec<&Namespace>;

    /// References declared by the document that holds `namespace`
    fn references(&self, namespace: &str) -> &[Reference];

    /// The namespace an include alias stands for
    fn alias_target(&self, alias: &str) -> Option<&str>;

    /// Every namespace in lookup order
    fn namespaces(&self) -> Vec<&Namespace>;
}
