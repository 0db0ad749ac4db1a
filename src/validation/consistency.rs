//! Schema graph consistency checks
//!
//! Checks a schema document against the complete graph it was loaded into:
//!
//! - every `BaseType` and base term resolves
//! - the inheritance graph has no cycles
//! - every annotation term resolves to a Term
//! - every property, parameter and return type resolves
//! - collection navigation properties do not declare `Nullable`
//! - versioned namespaces are at most one step ahead of a published version
//! - reference URIs name a directory and a file

use crate::graph::{DefinitionRef, SchemaProvider};
use crate::models::{
    Annotations, Definition, Namespace, NamespaceName, SchemaDocument, SchemaVersion, TypeRef,
};
use crate::resolve::{PrimitiveType, ResolveError, TypeResolver};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::info;

/// A single consistency problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConsistencyIssue {
    UnresolvedBaseType {
        definition: String,
        base_type: String,
        reason: String,
    },
    CyclicInheritance {
        cycle: Vec<String>,
    },
    UnresolvedTerm {
        target: String,
        term: String,
    },
    UnresolvedType {
        target: String,
        type_ref: String,
        reason: String,
    },
    NullableCollectionNavigation {
        definition: String,
        property: String,
    },
    UnpublishedVersion {
        namespace: String,
        reason: String,
    },
    MalformedReferenceUri {
        uri: String,
        reason: String,
    },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::UnresolvedBaseType {
                definition,
                base_type,
                reason,
            } => write!(f, "{}: base type {} does not resolve ({})", definition, base_type, reason),
            ConsistencyIssue::CyclicInheritance { cycle } => {
                write!(f, "cyclic inheritance: {}", cycle.join(" -> "))
            }
            ConsistencyIssue::UnresolvedTerm { target, term } => {
                write!(f, "{}: unable to locate annotation term {}", target, term)
            }
            ConsistencyIssue::UnresolvedType {
                target,
                type_ref,
                reason,
            } => write!(f, "{}: type {} does not resolve ({})", target, type_ref, reason),
            ConsistencyIssue::NullableCollectionNavigation {
                definition,
                property,
            } => write!(
                f,
                "{}: collection navigation property {} declares Nullable",
                definition, property
            ),
            ConsistencyIssue::UnpublishedVersion { namespace, reason } => {
                write!(f, "{}: {}", namespace, reason)
            }
            ConsistencyIssue::MalformedReferenceUri { uri, reason } => {
                write!(f, "reference {}: {}", uri, reason)
            }
        }
    }
}

/// Result of checking one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsistencyReport {
    pub document: String,
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_cycles(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ConsistencyIssue::CyclicInheritance { .. }))
    }
}

/// Versions already released, per namespace base name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishedVersions {
    by_base: BTreeMap<String, BTreeSet<SchemaVersion>>,
}

impl PublishedVersions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, base: impl Into<String>, version: SchemaVersion) {
        self.by_base.entry(base.into()).or_default().insert(version);
    }

    /// Collect from namespace names such as `Chassis.v1_4_0`; unversioned
    /// names are ignored
    pub fn from_namespace_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut published = Self::new();
        for name in names {
            let parsed = NamespaceName::parse(name);
            if let Some(version) = parsed.version {
                published.insert(parsed.base, version);
            }
        }
        published
    }

    pub fn contains(&self, base: &str, version: SchemaVersion) -> bool {
        self.by_base
            .get(base)
            .is_some_and(|versions| versions.contains(&version))
    }

    /// Check that `version` is published or directly follows a published
    /// version. `Ok(())` when nothing of `base` has been published.
    pub fn check(&self, base: &str, version: SchemaVersion) -> Result<(), String> {
        let Some(versions) = self.by_base.get(base) else {
            return Ok(());
        };
        if versions.contains(&version) {
            return Ok(());
        }

        let any_in_minor = |major: u32, minor: u32| {
            versions
                .iter()
                .any(|v| v.major == major && v.minor == minor)
        };
        let any_in_major = |major: u32| versions.iter().any(|v| v.major == major);

        if version.patch > 0 {
            let Some(previous) = version.predecessor() else {
                return Err(format!("version {} has no predecessor", version));
            };
            return if versions.contains(&previous) {
                Ok(())
            } else {
                Err(format!(
                    "version {} is not published and neither is {}",
                    version, previous
                ))
            };
        }

        if any_in_minor(version.major, version.minor) {
            return Err(format!(
                "version {} is not published but later errata of that minor version are",
                version
            ));
        }

        match version.predecessor() {
            Some(previous) => {
                if any_in_minor(previous.major, previous.minor) {
                    Ok(())
                } else {
                    Err(format!(
                        "minor version v{}_{} is not published and neither is v{}_{}",
                        version.major, version.minor, previous.major, previous.minor
                    ))
                }
            }
            None => {
                let major_released = version.major > 0 && any_in_major(version.major - 1);
                if !any_in_major(version.major) && major_released {
                    Ok(())
                } else {
                    Err(format!(
                        "major version {} does not follow a published major version",
                        version.major
                    ))
                }
            }
        }
    }
}

/// Checks schema documents against the complete graph
pub struct SchemaConsistencyChecker<'s, P: SchemaProvider + ?Sized> {
    resolver: TypeResolver<'s, P>,
    published: Option<&'s PublishedVersions>,
}

impl<'s, P: SchemaProvider + ?Sized> SchemaConsistencyChecker<'s, P> {
    pub fn new(resolver: TypeResolver<'s, P>) -> Self {
        Self {
            resolver,
            published: None,
        }
    }

    /// Also check namespace versions against a published list
    pub fn with_published(mut self, published: &'s PublishedVersions) -> Self {
        self.published = Some(published);
        self
    }

    /// Run every check over one document
    pub fn check_document(&self, document: &SchemaDocument) -> ConsistencyReport {
        let mut issues = Vec::new();

        for reference in &document.references {
            if let Err(reason) = check_reference_uri(&reference.uri) {
                issues.push(ConsistencyIssue::MalformedReferenceUri {
                    uri: reference.uri.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        let mut own_types = BTreeSet::new();
        for namespace in &document.namespaces {
            self.check_namespace(namespace, &mut issues);
            for name in namespace.definitions.keys() {
                own_types.insert(format!("{}.{}", namespace.name, name));
            }
        }

        for cycle in self.inheritance_cycles() {
            if cycle.iter().any(|name| own_types.contains(name)) {
                issues.push(ConsistencyIssue::CyclicInheritance { cycle });
            }
        }

        info!(
            "Checked {}: {} consistency issues",
            document.label,
            issues.len()
        );
        ConsistencyReport {
            document: document.label.clone(),
            issues,
        }
    }

    /// Every inheritance cycle in the graph, each as sorted qualified names
    pub fn inheritance_cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut node = |graph: &mut DiGraph<String, ()>, name: String| {
            *nodes
                .entry(name.clone())
                .or_insert_with(|| graph.add_node(name))
        };

        for namespace in self.resolver.provider().namespaces() {
            for definition in namespace.definitions.values() {
                let child = DefinitionRef {
                    namespace,
                    definition,
                };
                // Unresolvable bases are reported by the base type check
                let Ok(Some(parent)) = self.resolver.resolve_base(child) else {
                    continue;
                };
                let from = node(&mut graph, child.qualified_name());
                let to = node(&mut graph, parent.qualified_name());
                graph.update_edge(from, to, ());
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || graph.contains_edge(component[0], component[0])
            })
            .map(|component| {
                let mut names: Vec<String> =
                    component.into_iter().map(|idx| graph[idx].clone()).collect();
                names.sort();
                names
            })
            .collect();
        cycles.sort();
        cycles
    }

    fn check_namespace(&self, namespace: &Namespace, issues: &mut Vec<ConsistencyIssue>) {
        if let Some(published) = self.published {
            let parsed = namespace.parsed_name();
            if let Some(version) = parsed.version
                && let Err(reason) = published.check(&parsed.base, version)
            {
                issues.push(ConsistencyIssue::UnpublishedVersion {
                    namespace: namespace.name.clone(),
                    reason,
                });
            }
        }

        self.check_terms(&namespace.name, &namespace.annotations, issues);
        for (target, annotations) in &namespace.targeted_annotations {
            self.check_terms(target, annotations, issues);
        }

        for definition in namespace.definitions.values() {
            let found = DefinitionRef {
                namespace,
                definition,
            };
            self.check_definition(found, issues);
        }
    }

    fn check_definition(&self, found: DefinitionRef<'_>, issues: &mut Vec<ConsistencyIssue>) {
        let qualified = found.qualified_name();
        self.check_terms(&qualified, found.definition.annotations(), issues);

        if let Some(base_type) = found.definition.base_type() {
            match self.resolver.lookup_definition(base_type) {
                Ok(_) => {}
                Err(e) => issues.push(ConsistencyIssue::UnresolvedBaseType {
                    definition: qualified.clone(),
                    base_type: base_type.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        match found.definition {
            Definition::EntityType(body) | Definition::ComplexType(body) => {
                for property in body.properties.values() {
                    let target = format!("{}/{}", qualified, property.name);
                    self.check_terms(&target, &property.annotations, issues);
                    self.check_type(&target, &property.type_ref, issues);

                    let is_collection = TypeRef::parse(&property.type_ref)
                        .map(|t| t.collection)
                        .unwrap_or(false);
                    if property.is_navigation() && is_collection && property.nullable.is_some() {
                        issues.push(ConsistencyIssue::NullableCollectionNavigation {
                            definition: qualified.clone(),
                            property: property.name.clone(),
                        });
                    }
                }
            }
            Definition::EnumType(body) => {
                for (name, member) in &body.members {
                    let target = format!("{}/{}", qualified, name);
                    self.check_terms(&target, &member.annotations, issues);
                }
                if let Some(underlying) = &body.underlying_type {
                    self.check_type(&qualified, underlying, issues);
                }
            }
            Definition::TypeDefinition(body) => {
                if PrimitiveType::parse(&body.underlying_type).is_none() {
                    issues.push(ConsistencyIssue::UnresolvedType {
                        target: qualified.clone(),
                        type_ref: body.underlying_type.clone(),
                        reason: "underlying type is not a primitive".to_string(),
                    });
                }
            }
            Definition::Action(body) => {
                for parameter in &body.parameters {
                    let target = format!("{}/{}", qualified, parameter.name);
                    self.check_terms(&target, &parameter.annotations, issues);
                    self.check_type(&target, &parameter.type_ref, issues);
                }
                if let Some(returns) = &body.return_type {
                    self.check_type(&qualified, &returns.type_ref, issues);
                }
            }
            Definition::Term(body) => {
                if let Some(type_ref) = &body.type_ref {
                    self.check_type(&qualified, type_ref, issues);
                }
            }
        }
    }

    fn check_terms(&self, target: &str, annotations: &Annotations, issues: &mut Vec<ConsistencyIssue>) {
        for term in annotations.keys() {
            if self.resolver.resolve_term(term).is_err() {
                issues.push(ConsistencyIssue::UnresolvedTerm {
                    target: target.to_string(),
                    term: term.clone(),
                });
            }
        }
    }

    fn check_type(&self, target: &str, type_ref: &str, issues: &mut Vec<ConsistencyIssue>) {
        if let Err(e) = self.resolver.resolve(type_ref) {
            issues.push(ConsistencyIssue::UnresolvedType {
                target: target.to_string(),
                type_ref: type_ref.to_string(),
                reason: describe(&e),
            });
        }
    }
}

fn describe(e: &ResolveError) -> String {
    match e {
        ResolveError::Unresolved { .. } => "not found".to_string(),
        other => other.to_string(),
    }
}

fn check_reference_uri(uri: &str) -> Result<(), &'static str> {
    let Some((directory, file)) = uri.rsplit_once('/') else {
        return Err("contains no '/'");
    };
    if file.is_empty() {
        return Err("has an empty file name");
    }
    if directory.is_empty() {
        return Err("has an empty directory");
    }
    Ok(())
}
