//! JSON document validation
//!
//! A document names its type in `@odata.type`. Each own key is looked up on
//! that type or an ancestor and its value is checked recursively against the
//! resolved property type. The walk stops at the first violation; batch
//! callers get one outcome per document from [`DocumentValidator::validate_all`].

use super::error::ValidationError;
use super::primitives::{check_primitive, json_kind};
use super::uri_template::{UriCheck, UriTemplateMatcher};
use crate::graph::{DefinitionRef, SchemaProvider};
use crate::models::{Definition, Property};
use crate::resolve::{PrimitiveType, ResolveError, Resolved, TypeResolver};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

const ODATA_TYPE: &str = "@odata.type";
const ODATA_ID: &str = "@odata.id";
const JSON_SCHEMA_KEY: &str = "$schema";
const ROOT_PATH: &str = "$";

/// Why a document was not checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The document is a JSON schema (`$schema` present)
    JsonSchema,
    /// No `@odata.type` and no type hint (service documents and similar)
    Untyped,
}

/// A document that passed validation or was deliberately not checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    Checked { type_name: String },
    Skipped(SkipReason),
}

/// Outcome for one document of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub label: String,
    pub outcome: Result<Validated, ValidationError>,
}

impl DocumentReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{}.{}", parent, key)
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn resolve_error(path: &str, source: ResolveError) -> ValidationError {
    ValidationError::Resolve {
        path: path.to_string(),
        source,
    }
}

/// Validates JSON documents against a schema graph
pub struct DocumentValidator<'s, P: SchemaProvider + ?Sized> {
    resolver: TypeResolver<'s, P>,
}

impl<'s, P: SchemaProvider + ?Sized> DocumentValidator<'s, P> {
    pub fn new(resolver: TypeResolver<'s, P>) -> Self {
        Self { resolver }
    }

    /// Validate one document; `label` names it in log output
    pub fn validate(&self, document: &Value, label: &str) -> Result<Validated, ValidationError> {
        self.validate_with_hint(document, None, label)
    }

    /// Validate one document, using `type_hint` when it has no `@odata.type`
    pub fn validate_with_hint(
        &self,
        document: &Value,
        type_hint: Option<&str>,
        label: &str,
    ) -> Result<Validated, ValidationError> {
        let Some(object) = document.as_object() else {
            return Err(ValidationError::TypeMismatch {
                path: ROOT_PATH.to_string(),
                expected: "an object".to_string(),
                found: json_kind(document).to_string(),
            });
        };
        if object.contains_key(JSON_SCHEMA_KEY) {
            debug!("Skipping JSON schema document {}", label);
            return Ok(Validated::Skipped(SkipReason::JsonSchema));
        }

        let declared = declared_type(object, ROOT_PATH)?.or(type_hint);
        let Some(declared) = declared else {
            debug!("Skipping untyped document {}", label);
            return Ok(Validated::Skipped(SkipReason::Untyped));
        };
        let type_name = declared.strip_prefix('#').unwrap_or(declared);

        let root = self.lookup_type(type_name, ROOT_PATH)?;
        if root.definition.as_structured().is_none() {
            return Err(resolve_error(
                ROOT_PATH,
                ResolveError::NotStructured {
                    type_ref: type_name.to_string(),
                    kind: root.definition.kind().to_string(),
                },
            ));
        }

        debug!("Validating {} as {}", label, root.qualified_name());
        self.check_object(root, object, ROOT_PATH, type_name, 0)?;

        if self.resolver.config().check_resource_uris
            && let Some(uri) = object.get(ODATA_ID).and_then(Value::as_str)
        {
            self.check_uri(root, uri)?;
        }

        Ok(Validated::Checked {
            type_name: type_name.to_string(),
        })
    }

    /// Validate a batch, one outcome per document
    pub fn validate_all(&self, documents: &[(String, Value)]) -> Vec<DocumentReport> {
        let reports: Vec<DocumentReport> = documents
            .iter()
            .map(|(label, document)| self.report(label, document))
            .collect();
        log_summary(&reports);
        reports
    }

    fn report(&self, label: &str, document: &Value) -> DocumentReport {
        let outcome = self.validate(document, label);
        if let Err(e) = &outcome {
            warn!("{} failed validation: {}", label, e);
        }
        DocumentReport {
            label: label.to_string(),
            outcome,
        }
    }

    fn lookup_type(&self, type_name: &str, path: &str) -> Result<DefinitionRef<'s>, ValidationError> {
        self.resolver
            .lookup_definition(type_name)
            .map_err(|e| match e {
                ResolveError::Unresolved { .. }
                | ResolveError::MalformedReference { .. }
                | ResolveError::NestedCollection { .. } => ValidationError::UnknownType {
                    path: path.to_string(),
                    type_name: type_name.to_string(),
                },
                other => resolve_error(path, other),
            })
    }

    fn check_uri(&self, root: DefinitionRef<'s>, uri: &str) -> Result<(), ValidationError> {
        let path = child_path(ROOT_PATH, ODATA_ID);
        let matcher = UriTemplateMatcher::new(self.resolver);
        match matcher.check(uri, root).map_err(|e| resolve_error(&path, e))? {
            UriCheck::Mismatch { near_misses } => Err(ValidationError::UriTemplateMismatch {
                path,
                uri: uri.to_string(),
                type_name: root.qualified_name(),
                near_misses,
            }),
            UriCheck::Matched { .. } | UriCheck::Skipped { .. } | UriCheck::Unannotated => Ok(()),
        }
    }

    /// Whether `owner` or an ancestor accepts undeclared properties
    fn is_open(&self, owner: DefinitionRef<'s>, path: &str) -> Result<bool, ValidationError> {
        let config = self.resolver.config();
        let additional = self
            .resolver
            .find_annotation(owner, &config.additional_properties_term)
            .map_err(|e| resolve_error(path, e))?;
        if additional.is_some_and(|(_, value)| value.is_enabled()) {
            return Ok(true);
        }
        let dynamic = self
            .resolver
            .find_annotation(owner, &config.dynamic_property_patterns_term)
            .map_err(|e| resolve_error(path, e))?;
        Ok(dynamic.is_some())
    }

    /// `Prop@odata.count` style keys that are accepted without a property
    fn is_accepted_annotation(&self, key: &str) -> bool {
        let Some((_, annotation)) = key.split_once('@') else {
            return false;
        };
        let config = self.resolver.config();
        config.paging_annotations.iter().any(|a| a == annotation)
            || config
                .vendor_annotation_prefixes
                .iter()
                .any(|prefix| annotation.starts_with(prefix.as_str()))
    }

    fn check_object(
        &self,
        owner: DefinitionRef<'s>,
        object: &Map<String, Value>,
        path: &str,
        document_type: &str,
        depth: usize,
    ) -> Result<(), ValidationError> {
        if depth > self.resolver.config().max_depth {
            return Err(ValidationError::CyclicType {
                path: path.to_string(),
                max_depth: self.resolver.config().max_depth,
            });
        }

        let mut open: Option<bool> = None;
        for (key, value) in object {
            if key.starts_with('@') || self.is_accepted_annotation(key) {
                continue;
            }
            let key_path = child_path(path, key);
            let found = self
                .resolver
                .find_property(owner, key)
                .map_err(|e| resolve_error(&key_path, e))?;

            match found {
                Some(found) => {
                    self.check_property(found.property, value, &key_path, document_type, depth)?
                }
                None => {
                    let is_open = match open {
                        Some(cached) => cached,
                        None => {
                            let computed = self.is_open(owner, path)?;
                            open = Some(computed);
                            computed
                        }
                    };
                    if !is_open {
                        return Err(ValidationError::UnknownProperty {
                            path: key_path,
                            name: key.clone(),
                            type_name: owner.qualified_name(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_property(
        &self,
        property: &'s Property,
        value: &Value,
        path: &str,
        document_type: &str,
        depth: usize,
    ) -> Result<(), ValidationError> {
        let resolved = self
            .resolver
            .resolve(&property.type_ref)
            .map_err(|e| resolve_error(path, e))?;

        if !resolved.plural {
            return self.check_value(&resolved.target, property, value, path, document_type, depth, false);
        }
        let Some(items) = value.as_array() else {
            return Err(ValidationError::TypeMismatch {
                path: path.to_string(),
                expected: "an array".to_string(),
                found: json_kind(value).to_string(),
            });
        };
        for (i, item) in items.iter().enumerate() {
            let item_path = index_path(path, i);
            self.check_value(&resolved.target, property, item, &item_path, document_type, depth, true)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn check_value(
        &self,
        target: &Resolved<'s>,
        property: &'s Property,
        value: &Value,
        path: &str,
        document_type: &str,
        depth: usize,
        in_collection: bool,
    ) -> Result<(), ValidationError> {
        let config = self.resolver.config();
        let property_pattern = property
            .annotations
            .get(&config.pattern_term)
            .and_then(|v| v.as_str());

        let found = match target {
            Resolved::Primitive(primitive) => {
                return check_primitive(primitive, value, property_pattern, path);
            }
            Resolved::Definition(found) => *found,
        };

        match found.definition {
            Definition::EnumType(body) => match value {
                Value::Null => Ok(()),
                Value::String(member) if body.members.contains_key(member) => Ok(()),
                Value::String(member) => Err(ValidationError::EnumMember {
                    path: path.to_string(),
                    value: member.clone(),
                    enum_type: found.qualified_name(),
                }),
                other => Err(ValidationError::TypeMismatch {
                    path: path.to_string(),
                    expected: "a string".to_string(),
                    found: json_kind(other).to_string(),
                }),
            },
            Definition::TypeDefinition(body) => {
                let pattern = property_pattern.or_else(|| {
                    body.annotations
                        .get(&config.pattern_term)
                        .and_then(|v| v.as_str())
                });
                match PrimitiveType::parse(&body.underlying_type) {
                    Some(primitive) => check_primitive(&primitive, value, pattern, path),
                    None => Err(ValidationError::UnsupportedPrimitive {
                        path: path.to_string(),
                        primitive: body.underlying_type.clone(),
                    }),
                }
            }
            Definition::ComplexType(_) => {
                let Some(object) = as_object_or_null(value, path)? else {
                    return Ok(());
                };
                if found.name() == config.operations_complex_type {
                    return self.check_actions(object, path);
                }
                if config.is_extension_complex_type(found.name()) {
                    return Ok(());
                }
                let actual = match declared_type(object, path)? {
                    Some(explicit) => {
                        let explicit = explicit.strip_prefix('#').unwrap_or(explicit);
                        self.lookup_type(explicit, path)?
                    }
                    None => self.resolver.effective_type(found, document_type),
                };
                self.check_object(actual, object, path, document_type, depth + 1)
            }
            Definition::EntityType(_) => {
                let Some(object) = as_object_or_null(value, path)? else {
                    return Ok(());
                };
                if object.contains_key(ODATA_ID) {
                    return Ok(());
                }
                if property.annotations.contains_key(&config.excerpt_copy_term) {
                    return self.check_object(found, object, path, document_type, depth + 1);
                }
                if !in_collection && object.is_empty() {
                    return Ok(());
                }
                Err(ValidationError::MissingIdentifier {
                    path: path.to_string(),
                    type_name: found.qualified_name(),
                })
            }
            Definition::Action(_) | Definition::Term(_) => Err(ValidationError::InvalidPropertyType {
                path: path.to_string(),
                type_ref: property.type_ref.clone(),
                kind: found.definition.kind().to_string(),
            }),
        }
    }

    /// Keys of an operations map are `#Namespace.ActionName`
    fn check_actions(&self, object: &Map<String, Value>, path: &str) -> Result<(), ValidationError> {
        for (key, value) in object {
            if key.starts_with('@') || self.resolver.config().is_extension_complex_type(key) {
                continue;
            }
            let invalid = |reason: String| ValidationError::InvalidAction {
                path: child_path(path, key),
                name: key.clone(),
                reason,
            };
            let Some(name) = key.strip_prefix('#') else {
                return Err(invalid("action names start with '#'".to_string()));
            };
            let action = self
                .resolver
                .lookup_definition(name)
                .map_err(|_| invalid("not present in the schema".to_string()))?;
            if !matches!(action.definition, Definition::Action(_)) {
                return Err(invalid(format!("is a {}, not an Action", action.definition.kind())));
            }
            if value.get("Target").is_some() {
                return Err(invalid("has invalid property \"Target\"".to_string()));
            }
        }
        Ok(())
    }
}

/// The object's `@odata.type`, if present; a non-string value is an error
fn declared_type<'v>(
    object: &'v Map<String, Value>,
    path: &str,
) -> Result<Option<&'v str>, ValidationError> {
    match object.get(ODATA_TYPE) {
        None => Ok(None),
        Some(Value::String(type_name)) => Ok(Some(type_name.as_str())),
        Some(other) => Err(ValidationError::TypeMismatch {
            path: child_path(path, ODATA_TYPE),
            expected: "a string".to_string(),
            found: json_kind(other).to_string(),
        }),
    }
}

fn as_object_or_null<'v>(
    value: &'v Value,
    path: &str,
) -> Result<Option<&'v Map<String, Value>>, ValidationError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(object) => Ok(Some(object)),
        other => Err(ValidationError::TypeMismatch {
            path: path.to_string(),
            expected: "an object".to_string(),
            found: json_kind(other).to_string(),
        }),
    }
}

fn log_summary(reports: &[DocumentReport]) {
    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    info!(
        "Validated {} documents: {} passed, {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    );
}

#[cfg(feature = "parallel")]
impl<'s, P: SchemaProvider + Sync + ?Sized> DocumentValidator<'s, P> {
    /// [`validate_all`](Self::validate_all) over the rayon thread pool
    pub fn validate_all_parallel(&self, documents: &[(String, Value)]) -> Vec<DocumentReport> {
        use rayon::prelude::*;

        let reports: Vec<DocumentReport> = documents
            .par_iter()
            .map(|(label, document)| self.report(label, document))
            .collect();
        log_summary(&reports);
        reports
    }
}
