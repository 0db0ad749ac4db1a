//! Configuration for resolution and validation
//!
//! Every domain literal the resolver and validators depend on (shared
//! namespaces, annotation term names, allow-lists) lives here so a
//! deployment can adjust them without code changes.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration shared by the resolver and all validators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidatorConfig {
    /// Base names of namespaces versioned independently of their consumers.
    /// References into these fall back to the newest version declaring the type.
    pub shared_namespaces: Vec<String>,

    /// Qualified name of the common ancestor that declares the implicit properties
    pub resource_root_type: String,

    /// Properties always looked up on `resource_root_type`
    pub implicit_resource_properties: Vec<String>,

    /// Term marking a structured type as open for arbitrary properties
    pub additional_properties_term: String,

    /// Term declaring dynamic property name patterns
    pub dynamic_property_patterns_term: String,

    /// Term permitting an entity-typed property to be inlined without an identifier
    pub excerpt_copy_term: String,

    /// Term carrying a regular expression for string values
    pub pattern_term: String,

    /// Term carrying the URI templates of a resource type
    pub uri_template_term: String,

    /// Complex types whose content is never checked (vendor extension objects)
    pub extension_complex_types: Vec<String>,

    /// Complex type whose keys are action names
    pub operations_complex_type: String,

    /// Property annotations accepted on document keys (`Members@odata.count`)
    pub paging_annotations: Vec<String>,

    /// Annotation namespaces accepted on document keys without content checks
    pub vendor_annotation_prefixes: Vec<String>,

    /// Resource types that are not addressable by URI
    pub uris_not_required: Vec<String>,

    /// Remainders allowed to trail an identifier after a template matched
    pub benign_uri_suffixes: Vec<String>,

    /// Reference aliases not reported when they are the only unused ones.
    ///
    /// `Redfish` is tolerated because enum member annotations that use it
    /// are not part of every schema walk. Once another alias is unused the
    /// tolerated ones are reported too.
    pub tolerated_unused_aliases: Vec<String>,

    /// Maximum nesting depth of a validated document
    pub max_depth: usize,

    /// Check a document's `@odata.id` against its type's URI templates
    pub check_resource_uris: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            shared_namespaces: strings(&[
                "Resource",
                "IPAddresses",
                "VLanNetworkInterface",
                "Schedule",
                "PCIeDevice",
                "Message",
            ]),
            resource_root_type: "Resource.v1_0_0.Resource".to_string(),
            implicit_resource_properties: strings(&["Id", "Name", "Description"]),
            additional_properties_term: "OData.AdditionalProperties".to_string(),
            dynamic_property_patterns_term: "Redfish.DynamicPropertyPatterns".to_string(),
            excerpt_copy_term: "Redfish.ExcerptCopy".to_string(),
            pattern_term: "Validation.Pattern".to_string(),
            uri_template_term: "Redfish.Uris".to_string(),
            extension_complex_types: strings(&["Oem"]),
            operations_complex_type: "Actions".to_string(),
            paging_annotations: strings(&[
                "odata.count",
                "odata.nextLink",
                "odata.navigationLink",
            ]),
            vendor_annotation_prefixes: strings(&["Redfish.", "Message."]),
            uris_not_required: strings(&[
                "Event",
                "MessageRegistry",
                "AttributeRegistry",
                "PrivilegeRegistry",
            ]),
            benign_uri_suffixes: strings(&["", "/", "/SD", "/Settings"]),
            tolerated_unused_aliases: strings(&["Redfish"]),
            max_depth: 64,
            check_resource_uris: false,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ValidatorConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Parse a TOML configuration; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a TOML configuration file
    pub fn load_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn is_shared_namespace(&self, base_name: &str) -> bool {
        self.shared_namespaces.iter().any(|ns| ns == base_name)
    }

    pub fn is_implicit_resource_property(&self, name: &str) -> bool {
        self.implicit_resource_properties.iter().any(|p| p == name)
    }

    pub fn is_extension_complex_type(&self, name: &str) -> bool {
        self.extension_complex_types.iter().any(|t| t == name)
    }

    pub fn is_benign_uri_suffix(&self, remainder: &str) -> bool {
        self.benign_uri_suffixes.iter().any(|s| s == remainder)
    }
}

/// Builder for ValidatorConfig
#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Replace the shared namespace list
    pub fn shared_namespaces<I, S>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.shared_namespaces = namespaces.into_iter().map(Into::into).collect();
        self
    }

    /// Set the common resource ancestor
    pub fn resource_root_type(mut self, qualified: impl Into<String>) -> Self {
        self.config.resource_root_type = qualified.into();
        self
    }

    /// Replace the URI allow-list
    pub fn uris_not_required<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.uris_not_required = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the tolerated unused aliases
    pub fn tolerated_unused_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tolerated_unused_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the maximum nesting depth (at least 1)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth.max(1);
        self
    }

    /// Enable or disable the `@odata.id` URI template check
    pub fn check_resource_uris(mut self, check: bool) -> Self {
        self.config.check_resource_uris = check;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ValidatorConfig {
        self.config
    }
}
