//! Reference alias usage analysis
//!
//! Every alias declared by a document's references should be dereferenced
//! somewhere in its namespaces. The sweep tries aliases longest first so a
//! string such as `AB.Foo` consumes `AB` and never a shorter alias.

use crate::config::ValidatorConfig;
use crate::graph::SchemaProvider;
use crate::models::{Annotations, Definition, Namespace, SchemaDocument, strip_collection};
use std::collections::BTreeSet;
use tracing::debug;

struct AliasSweep {
    remaining: Vec<String>,
}

impl AliasSweep {
    fn new<'a>(declared: impl IntoIterator<Item = &'a str>) -> Self {
        let mut remaining: Vec<String> = declared.into_iter().map(str::to_string).collect();
        remaining.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        remaining.dedup();
        Self { remaining }
    }

    fn is_done(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Remove the first remaining alias `reference` starts with
    fn mark(&mut self, reference: &str) {
        let reference = strip_collection(reference).unwrap_or(reference);
        if let Some(i) = self
            .remaining
            .iter()
            .position(|alias| uses_alias(reference, alias))
        {
            self.remaining.remove(i);
        }
    }

    fn mark_opt(&mut self, reference: Option<&str>) {
        if let Some(reference) = reference {
            self.mark(reference);
        }
    }

    fn mark_annotations(&mut self, annotations: &Annotations) {
        for term in annotations.keys() {
            self.mark(term);
        }
    }

    fn sweep_definition(&mut self, definition: &Definition) {
        self.mark_annotations(definition.annotations());
        match definition {
            Definition::EntityType(body) | Definition::ComplexType(body) => {
                self.mark_opt(body.base_type.as_deref());
                for property in body.properties.values() {
                    self.mark_annotations(&property.annotations);
                    self.mark(&property.type_ref);
                }
            }
            Definition::EnumType(body) => {
                self.mark_opt(body.underlying_type.as_deref());
                for member in body.members.values() {
                    self.mark_annotations(&member.annotations);
                }
            }
            Definition::TypeDefinition(body) => self.mark(&body.underlying_type),
            Definition::Action(body) => {
                for parameter in &body.parameters {
                    self.mark_annotations(&parameter.annotations);
                    self.mark(&parameter.type_ref);
                }
                if let Some(returns) = &body.return_type {
                    self.mark(&returns.type_ref);
                }
            }
            Definition::Term(body) => {
                self.mark_opt(body.type_ref.as_deref());
                self.mark_opt(body.base_term.as_deref());
            }
        }
    }

    fn sweep_namespace(&mut self, namespace: &Namespace) {
        self.mark_annotations(&namespace.annotations);
        if let Some(container) = &namespace.entity_container {
            self.mark_opt(container.extends.as_deref());
        }
        for (target, annotations) in &namespace.targeted_annotations {
            self.mark(target);
            self.mark_annotations(annotations);
        }
        for definition in namespace.definitions.values() {
            if self.is_done() {
                return;
            }
            self.sweep_definition(definition);
        }
    }

    fn into_unused(self) -> BTreeSet<String> {
        self.remaining.into_iter().collect()
    }
}

fn uses_alias(reference: &str, alias: &str) -> bool {
    reference
        .strip_prefix(alias)
        .is_some_and(|rest| rest.starts_with('.'))
}

/// Aliases from `declared` that nothing in `namespace` references
pub fn find_unused_aliases<'a>(
    namespace: &Namespace,
    declared: impl IntoIterator<Item = &'a str>,
) -> BTreeSet<String> {
    let mut sweep = AliasSweep::new(declared);
    sweep.sweep_namespace(namespace);
    sweep.into_unused()
}

/// Aliases declared by a document's references that none of its namespaces
/// use. The result is empty when every leftover alias is tolerated.
pub fn find_unused_document_aliases(
    document: &SchemaDocument,
    config: &ValidatorConfig,
) -> BTreeSet<String> {
    let mut sweep = AliasSweep::new(document.declared_aliases());
    for namespace in &document.namespaces {
        if sweep.is_done() {
            break;
        }
        sweep.sweep_namespace(namespace);
    }
    let mut unused = sweep.into_unused();
    if unused
        .iter()
        .all(|alias| config.tolerated_unused_aliases.contains(alias))
    {
        unused.clear();
    }
    if !unused.is_empty() {
        debug!("{} declares unused aliases {:?}", document.label, unused);
    }
    unused
}

/// Aliases declared by the references of the document holding `namespace`
/// that the namespace never uses
pub fn find_unused_namespace_aliases<P: SchemaProvider + ?Sized>(
    provider: &P,
    namespace: &str,
) -> BTreeSet<String> {
    let declared = provider
        .references(namespace)
        .iter()
        .flat_map(|reference| reference.aliases());
    match provider.namespace(namespace) {
        Some(found) => find_unused_aliases(found, declared),
        None => AliasSweep::new(declared).into_unused(),
    }
}
