//! Schema graph store
//!
//! The store is an immutable index over one or more root schema documents
//! plus any override documents supplied for types whose authoritative
//! definition lives outside the root set. It is produced once by
//! [`SchemaStoreBuilder::build`] and only read afterwards, so a single
//! store can be shared across threads without locking.

mod error;
mod provider;

pub use error::StoreError;
pub use provider::{DefinitionRef, SchemaProvider};

use crate::models::{Namespace, NamespaceName, Reference, SchemaDocument, SchemaVersion};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Position of a namespace inside the store: (document index, namespace index)
type Slot = (usize, usize);

/// Collects schema documents until the graph is complete
#[derive(Debug, Default)]
pub struct SchemaStoreBuilder {
    roots: Vec<SchemaDocument>,
    overrides: Vec<SchemaDocument>,
}

impl SchemaStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root document. Roots are searched before overrides.
    pub fn add_root(mut self, document: SchemaDocument) -> Self {
        self.roots.push(document);
        self
    }

    /// Add an override document. Overrides are searched in the order added.
    pub fn add_override(mut self, document: SchemaDocument) -> Self {
        self.overrides.push(document);
        self
    }

    pub fn extend_roots(mut self, documents: impl IntoIterator<Item = SchemaDocument>) -> Self {
        self.roots.extend(documents);
        self
    }

    pub fn extend_overrides(
        mut self,
        documents: impl IntoIterator<Item = SchemaDocument>,
    ) -> Self {
        self.overrides.extend(documents);
        self
    }

    /// Validate and index every collected document
    pub fn build(self) -> Result<SchemaStore, StoreError> {
        let root_count = self.roots.len();
        let mut documents = self.roots;
        documents.extend(self.overrides);

        let mut by_name: HashMap<String, Vec<Slot>> = HashMap::new();
        let mut by_base: HashMap<String, Vec<Slot>> = HashMap::new();
        let mut aliases: HashMap<String, String> = HashMap::new();

        for (doc_idx, document) in documents.iter().enumerate() {
            for reference in &document.references {
                for (alias, target) in &reference.includes {
                    if alias == target {
                        continue;
                    }
                    match aliases.get(alias) {
                        Some(existing) if existing != target => {
                            warn!(
                                "Alias {} in {} points to {}, keeping earlier target {}",
                                alias, document.label, target, existing
                            );
                        }
                        Some(_) => {}
                        None => {
                            aliases.insert(alias.clone(), target.clone());
                        }
                    }
                }
            }

            for (ns_idx, namespace) in document.namespaces.iter().enumerate() {
                check_namespace_name(&document.label, &namespace.name)?;
                for (key, definition) in &namespace.definitions {
                    if key != definition.name() {
                        return Err(StoreError::DefinitionKeyMismatch {
                            namespace: namespace.name.clone(),
                            key: key.clone(),
                            name: definition.name().to_string(),
                        });
                    }
                }

                let slots = by_name.entry(namespace.name.clone()).or_default();
                if slots.is_empty() {
                    by_base
                        .entry(namespace.parsed_name().base)
                        .or_default()
                        .push((doc_idx, ns_idx));
                }
                slots.push((doc_idx, ns_idx));
            }
        }

        for slots in by_base.values_mut() {
            slots.sort_by(|a, b| {
                let va = version_of(&documents, *a);
                let vb = version_of(&documents, *b);
                vb.cmp(&va)
            });
        }

        info!(
            "Built schema store: {} documents ({} overrides), {} namespaces, {} aliases",
            documents.len(),
            documents.len() - root_count,
            by_name.len(),
            aliases.len()
        );

        Ok(SchemaStore {
            documents,
            root_count,
            by_name,
            by_base,
            aliases,
        })
    }
}

fn version_of(documents: &[SchemaDocument], (doc, ns): Slot) -> Option<SchemaVersion> {
    documents[doc].namespaces[ns].parsed_name().version
}

fn check_namespace_name(document: &str, name: &str) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidNamespaceName {
        document: document.to_string(),
        name: name.to_string(),
        reason: reason.to_string(),
    };
    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.split('.').any(|segment| segment.is_empty()) {
        return Err(invalid("name has an empty segment"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid("name contains whitespace"));
    }
    let last = name.rsplit('.').next().unwrap_or(name);
    let looks_versioned = last.len() > 1
        && last.starts_with('v')
        && last[1..].starts_with(|c: char| c.is_ascii_digit());
    if name.contains('.') && looks_versioned && NamespaceName::parse(name).version.is_none() {
        return Err(invalid("version segment is not vMAJOR_MINOR_PATCH"));
    }
    Ok(())
}

/// Immutable index over a complete schema graph
#[derive(Debug)]
pub struct SchemaStore {
    documents: Vec<SchemaDocument>,
    root_count: usize,
    by_name: HashMap<String, Vec<Slot>>,
    by_base: HashMap<String, Vec<Slot>>,
    aliases: HashMap<String, String>,
}

impl SchemaStore {
    pub fn builder() -> SchemaStoreBuilder {
        SchemaStoreBuilder::new()
    }

    /// Root documents, in the order supplied
    pub fn roots(&self) -> &[SchemaDocument] {
        &self.documents[..self.root_count]
    }

    /// Override documents, in the order supplied
    pub fn overrides(&self) -> &[SchemaDocument] {
        &self.documents[self.root_count..]
    }

    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    fn slot(&self, (doc, ns): Slot) -> &Namespace {
        &self.documents[doc].namespaces[ns]
    }
}

impl SchemaProvider for SchemaStore {
    fn definition(&self, namespace: &str, local_name: &str) -> Option<DefinitionRef<'_>> {
        let slots = self.by_name.get(namespace)?;
        let found = slots.iter().find_map(|slot| {
            let ns = self.slot(*slot);
            ns.definition(local_name).map(|definition| DefinitionRef {
                namespace: ns,
                definition,
            })
        });
        if found.is_none() {
            debug!("No definition {} in namespace {}", local_name, namespace);
        }
        found
    }

    fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.by_name
            .get(name)
            .and_then(|slots| slots.first())
            .map(|slot| self.slot(*slot))
    }

    fn namespaces_by_base_name(&self, base_name: &str) -> Vec<&Namespace> {
        self.by_base
            .get(base_name)
            .map(|slots| slots.iter().map(|slot| self.slot(*slot)).collect())
            .unwrap_or_default()
    }

    fn references(&self, namespace: &str) -> &[Reference] {
        self.by_name
            .get(namespace)
            .and_then(|slots| slots.first())
            .map(|(doc, _)| self.documents[*doc].references.as_slice())
            .unwrap_or(&[])
    }

    fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    fn namespaces(&self) -> Vec<&Namespace> {
        self.documents
            .iter()
            .flat_map(|document| document.namespaces.iter())
            .collect()
    }
}
