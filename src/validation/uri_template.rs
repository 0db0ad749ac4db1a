//! URI template matching
//!
//! A resource type lists the legal shapes of its identifiers in a URI
//! template annotation (`Redfish.Uris` by default), for example
//! `/redfish/v1/Systems/{ComputerSystemId}/Memory/{MemoryId}`. The nearest
//! ancestor carrying the annotation supplies the templates.

use crate::graph::{DefinitionRef, SchemaProvider};
use crate::resolve::{ResolveError, TypeResolver};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// A parsed URI template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    /// Literal text between placeholders. An empty entry after the first is
    /// a placeholder with no literal following it.
    literals: Vec<String>,
}

/// Result of matching one identifier against one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateMatch {
    Matched,
    /// Every literal matched but text was left over
    NearMiss { remainder: String },
    NoMatch,
}

/// A template that consumed an identifier up to `remainder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NearMiss {
    pub template: String,
    pub remainder: String,
}

impl UriTemplate {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let literals = PLACEHOLDER_REGEX.split(&raw).map(str::to_string).collect();
        Self { raw, literals }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `uri`, accepting any of `benign_suffixes` as leftover text
    pub fn matches(&self, uri: &str, benign_suffixes: &[String]) -> TemplateMatch {
        let Some((first, rest_literals)) = self.literals.split_first() else {
            return TemplateMatch::NoMatch;
        };
        let Some(mut rest) = uri.strip_prefix(first.as_str()) else {
            return TemplateMatch::NoMatch;
        };

        for literal in rest_literals {
            if literal.is_empty() {
                rest = rest.find('/').map_or("", |i| &rest[i..]);
            } else {
                match rest.find(literal.as_str()) {
                    Some(i) => rest = &rest[i + literal.len()..],
                    None => return TemplateMatch::NoMatch,
                }
            }
        }

        if benign_suffixes.iter().any(|suffix| suffix == rest) {
            TemplateMatch::Matched
        } else {
            TemplateMatch::NearMiss {
                remainder: rest.to_string(),
            }
        }
    }
}

/// Outcome of checking an identifier against a resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriCheck {
    Matched { template: String },
    /// The type (or an ancestor) is not addressable by URI
    Skipped { type_name: String },
    /// No type in the ancestry declares templates
    Unannotated,
    /// No template matched; near misses are listed for diagnostics
    Mismatch { near_misses: Vec<NearMiss> },
}

/// Where the templates of a type come from
#[derive(Debug, Clone)]
pub enum TemplateSource<'s> {
    Declared {
        declared_on: DefinitionRef<'s>,
        templates: Vec<UriTemplate>,
    },
    NotRequired { type_name: String },
    Unannotated,
}

/// Finds and applies the URI templates of resource types
pub struct UriTemplateMatcher<'s, P: SchemaProvider + ?Sized> {
    resolver: TypeResolver<'s, P>,
}

impl<'s, P: SchemaProvider + ?Sized> UriTemplateMatcher<'s, P> {
    pub fn new(resolver: TypeResolver<'s, P>) -> Self {
        Self { resolver }
    }

    /// Walk up from `resource` to the nearest type that declares templates
    /// or is exempt from them
    pub fn templates_for(
        &self,
        resource: DefinitionRef<'s>,
    ) -> Result<TemplateSource<'s>, ResolveError> {
        let config = self.resolver.config();
        let found = self.resolver.walk_ancestors(resource, |step| {
            if config.uris_not_required.iter().any(|name| name == step.name()) {
                return Some(TemplateSource::NotRequired {
                    type_name: step.qualified_name(),
                });
            }
            step.definition
                .annotations()
                .get(&config.uri_template_term)
                .map(|value| TemplateSource::Declared {
                    declared_on: step,
                    templates: value.strings().into_iter().map(UriTemplate::parse).collect(),
                })
        })?;
        Ok(found.unwrap_or(TemplateSource::Unannotated))
    }

    /// Check `uri` against every template of `resource`
    pub fn check(&self, uri: &str, resource: DefinitionRef<'s>) -> Result<UriCheck, ResolveError> {
        let templates = match self.templates_for(resource)? {
            TemplateSource::Declared { templates, .. } => templates,
            TemplateSource::NotRequired { type_name } => {
                return Ok(UriCheck::Skipped { type_name });
            }
            TemplateSource::Unannotated => return Ok(UriCheck::Unannotated),
        };

        let benign = &self.resolver.config().benign_uri_suffixes;
        let mut near_misses = Vec::new();
        for template in &templates {
            match template.matches(uri, benign) {
                TemplateMatch::Matched => {
                    return Ok(UriCheck::Matched {
                        template: template.as_str().to_string(),
                    });
                }
                TemplateMatch::NearMiss { remainder } => near_misses.push(NearMiss {
                    template: template.as_str().to_string(),
                    remainder,
                }),
                TemplateMatch::NoMatch => {}
            }
        }
        Ok(UriCheck::Mismatch { near_misses })
    }

    /// Check `uri` against the templates of a type given by name
    /// (a leading `#` as in `@odata.type` is accepted)
    pub fn check_type(&self, uri: &str, type_name: &str) -> Result<UriCheck, ResolveError> {
        let qualified = type_name.strip_prefix('#').unwrap_or(type_name);
        let resource = self.resolver.lookup_definition(qualified)?;
        self.check(uri, resource)
    }
}
