//! Type reference resolution
//!
//! Resolves textual type references against a [`SchemaProvider`]:
//!
//! - `Collection(...)` wrappers are stripped once and reported as plural
//! - `Edm.*` names resolve to [`PrimitiveType`]s
//! - `Namespace.Name` is looked up exactly, then through include aliases,
//!   then (for shared namespaces only) in the newest version declaring it
//! - Inherited properties and annotations are found by walking `BaseType`
//!   links with cycle detection
//!
//! ## Example
//!
//! ```rust,ignore
//! use csdl_schema_sdk::{TypeResolver, ValidatorConfig};
//!
//! let config = ValidatorConfig::default();
//! let resolver = TypeResolver::new(&store, &config);
//! let resolved = resolver.resolve("Collection(Resource.v1_0_0.Location)")?;
//! assert!(resolved.plural);
//! ```

mod error;
mod primitive;

pub use error::ResolveError;
pub use primitive::PrimitiveType;

use crate::config::ValidatorConfig;
use crate::graph::{DefinitionRef, SchemaProvider};
use crate::models::{
    AnnotationValue, Definition, NamespaceName, Property, TypeRef, split_qualified,
};
use std::collections::HashSet;
use tracing::debug;

/// Target of a resolved reference
#[derive(Debug, Clone)]
pub enum Resolved<'s> {
    Primitive(PrimitiveType),
    Definition(DefinitionRef<'s>),
}

impl<'s> Resolved<'s> {
    pub fn definition(&self) -> Option<DefinitionRef<'s>> {
        match self {
            Resolved::Definition(found) => Some(*found),
            Resolved::Primitive(_) => None,
        }
    }

    /// Qualified name of the target, for diagnostics
    pub fn display_name(&self) -> String {
        match self {
            Resolved::Primitive(p) => p.to_string(),
            Resolved::Definition(found) => found.qualified_name(),
        }
    }
}

/// A resolved reference and whether it was wrapped in `Collection(...)`
#[derive(Debug, Clone)]
pub struct ResolvedType<'s> {
    pub target: Resolved<'s>,
    pub plural: bool,
}

/// A property found on a type or one of its ancestors
#[derive(Debug, Clone, Copy)]
pub struct PropertyMatch<'s> {
    pub property: &'s Property,
    /// The type that declares the property
    pub declared_on: DefinitionRef<'s>,
}

/// Resolves type references against a schema graph
pub struct TypeResolver<'s, P: SchemaProvider + ?Sized> {
    provider: &'s P,
    config: &'s ValidatorConfig,
}

impl<'s, P: SchemaProvider + ?Sized> Clone for TypeResolver<'s, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'s, P: SchemaProvider + ?Sized> Copy for TypeResolver<'s, P> {}

impl<'s, P: SchemaProvider + ?Sized> TypeResolver<'s, P> {
    pub fn new(provider: &'s P, config: &'s ValidatorConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &'s P {
        self.provider
    }

    pub fn config(&self) -> &'s ValidatorConfig {
        self.config
    }

    /// Resolve a type reference, possibly wrapped in `Collection(...)`
    pub fn resolve(&self, type_ref: &str) -> Result<ResolvedType<'s>, ResolveError> {
        let parsed = TypeRef::parse(type_ref)?;
        let target = self.resolve_qualified(&parsed.qualified)?;
        Ok(ResolvedType {
            target,
            plural: parsed.collection,
        })
    }

    /// Resolve an unwrapped qualified name
    pub fn resolve_qualified(&self, qualified: &str) -> Result<Resolved<'s>, ResolveError> {
        if let Some(primitive) = PrimitiveType::parse(qualified) {
            return Ok(Resolved::Primitive(primitive));
        }
        self.lookup_definition(qualified).map(Resolved::Definition)
    }

    /// Resolve a qualified name that must name a definition
    pub fn lookup_definition(&self, qualified: &str) -> Result<DefinitionRef<'s>, ResolveError> {
        let (namespace, local) =
            split_qualified(qualified).ok_or_else(|| ResolveError::MalformedReference {
                type_ref: qualified.to_string(),
            })?;

        if let Some(found) = self.provider.definition(namespace, local) {
            return Ok(found);
        }

        let mut namespace = namespace;
        if let Some(target) = self.provider.alias_target(namespace) {
            if let Some(found) = self.provider.definition(target, local) {
                return Ok(found);
            }
            namespace = target;
        }

        let base = NamespaceName::parse(namespace).base;
        if self.config.is_shared_namespace(&base)
            && let Some(found) = self.latest_version(&base, local)?
        {
            debug!(
                "Resolved {} through latest version {}",
                qualified,
                found.qualified_name()
            );
            return Ok(found);
        }

        Err(ResolveError::Unresolved {
            type_ref: qualified.to_string(),
        })
    }

    /// The definition of `local` in the newest namespace of `base` that declares it
    pub fn latest_version(
        &self,
        base: &str,
        local: &str,
    ) -> Result<Option<DefinitionRef<'s>>, ResolveError> {
        let namespaces = self.provider.namespaces_by_base_name(base);
        for pair in namespaces.windows(2) {
            let (first, second) = (pair[0].parsed_name(), pair[1].parsed_name());
            if let (Some(a), Some(b)) = (first.version, second.version)
                && a == b
            {
                return Err(ResolveError::AmbiguousVersion {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                    version: a.to_string(),
                });
            }
        }
        Ok(namespaces.into_iter().find_map(|namespace| {
            namespace
                .definition(local)
                .map(|definition| DefinitionRef {
                    namespace,
                    definition,
                })
        }))
    }

    /// Resolve an annotation term name to its Term definition
    pub fn resolve_term(&self, term: &str) -> Result<DefinitionRef<'s>, ResolveError> {
        let found = self.lookup_definition(term)?;
        match found.definition {
            Definition::Term(_) => Ok(found),
            _ => Err(ResolveError::Unresolved {
                type_ref: term.to_string(),
            }),
        }
    }

    /// The direct parent of a definition, if it declares one
    pub fn resolve_base(
        &self,
        child: DefinitionRef<'s>,
    ) -> Result<Option<DefinitionRef<'s>>, ResolveError> {
        let Some(base_type) = child.definition.base_type() else {
            return Ok(None);
        };
        let parent = self.lookup_definition(base_type)?;
        if child.definition.as_structured().is_some() && parent.definition.as_structured().is_none()
        {
            return Err(ResolveError::NotStructured {
                type_ref: base_type.to_string(),
                kind: parent.definition.kind().to_string(),
            });
        }
        Ok(Some(parent))
    }

    /// Walk `start` and then its ancestors one level at a time until `visit`
    /// returns a value or the chain ends.
    pub(crate) fn walk_ancestors<T>(
        &self,
        start: DefinitionRef<'s>,
        mut visit: impl FnMut(DefinitionRef<'s>) -> Option<T>,
    ) -> Result<Option<T>, ResolveError> {
        let mut seen = HashSet::new();
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(step) = current {
            let name = step.qualified_name();
            chain.push(name.clone());
            if !seen.insert(name) {
                return Err(ResolveError::CyclicInheritance { chain });
            }
            if let Some(found) = visit(step) {
                return Ok(Some(found));
            }
            current = self.resolve_base(step)?;
        }
        Ok(None)
    }

    /// `start` followed by every ancestor, nearest first
    pub fn ancestry(&self, start: DefinitionRef<'s>) -> Result<Vec<DefinitionRef<'s>>, ResolveError> {
        let mut chain = Vec::new();
        self.walk_ancestors(start, |step| {
            chain.push(step);
            None::<()>
        })?;
        Ok(chain)
    }

    /// Find a property declared on `owner` or inherited from an ancestor.
    ///
    /// The implicit resource properties (`Id`, `Name`, `Description` by
    /// default) are taken from the configured resource root type whenever
    /// the owner does not declare them and has a parent.
    pub fn find_property(
        &self,
        owner: DefinitionRef<'s>,
        name: &str,
    ) -> Result<Option<PropertyMatch<'s>>, ResolveError> {
        let structured = owner
            .definition
            .as_structured()
            .ok_or_else(|| ResolveError::NotStructured {
                type_ref: owner.qualified_name(),
                kind: owner.definition.kind().to_string(),
            })?;

        if let Some(property) = structured.property(name) {
            return Ok(Some(PropertyMatch {
                property,
                declared_on: owner,
            }));
        }
        if owner.definition.base_type().is_none() {
            return Ok(None);
        }

        if self.config.is_implicit_resource_property(name) {
            let root = self.lookup_definition(&self.config.resource_root_type)?;
            return Ok(root
                .definition
                .as_structured()
                .and_then(|body| body.property(name))
                .map(|property| PropertyMatch {
                    property,
                    declared_on: root,
                }));
        }

        self.walk_ancestors(owner, |step| {
            step.definition
                .as_structured()
                .and_then(|body| body.property(name))
                .map(|property| PropertyMatch {
                    property,
                    declared_on: step,
                })
        })
    }

    /// The nearest type in the ancestry of `start` carrying `term`
    pub fn find_annotation(
        &self,
        start: DefinitionRef<'s>,
        term: &str,
    ) -> Result<Option<(DefinitionRef<'s>, &'s AnnotationValue)>, ResolveError> {
        self.walk_ancestors(start, |step| {
            step.definition
                .annotations()
                .get(term)
                .map(|value| (step, value))
        })
    }

    /// Reconstruct the version shape of a nested object that omits `@odata.type`.
    ///
    /// Starting at the version of `document_type`'s namespace, the versions of
    /// that namespace are searched newest first for a definition with the
    /// same name and kind as `declared`. The declared type is kept when the
    /// document type is unversioned or no version introduces the name.
    pub fn effective_type(
        &self,
        declared: DefinitionRef<'s>,
        document_type: &str,
    ) -> DefinitionRef<'s> {
        let Some((namespace, _)) = split_qualified(document_type) else {
            return declared;
        };
        let parent = NamespaceName::parse(namespace);
        let Some(ceiling) = parent.version else {
            return declared;
        };

        let kind = declared.definition.kind();
        self.provider
            .namespaces_by_base_name(&parent.base)
            .into_iter()
            .filter(|ns| ns.parsed_name().version.is_some_and(|v| v <= ceiling))
            .find_map(|ns| {
                ns.definition(declared.name())
                    .filter(|definition| definition.kind() == kind)
                    .map(|definition| DefinitionRef {
                        namespace: ns,
                        definition,
                    })
            })
            .unwrap_or(declared)
    }
}
