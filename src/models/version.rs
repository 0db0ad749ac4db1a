//! Schema version and namespace name handling
//!
//! Versioned namespaces are named `Base.vMAJOR_MINOR_PATCH`. Versions are
//! compared as `(major, minor, patch)` triples, never as strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A namespace version such as `v1_4_2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Error parsing a version segment
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid schema version '{0}': expected vMAJOR_MINOR_PATCH")]
pub struct VersionParseError(pub String);

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// The next lower version that could have introduced content.
    ///
    /// Patch releases step down one patch, minor releases step down to the
    /// previous minor's `.0`. The first version of a major has no
    /// predecessor within that major.
    pub fn predecessor(&self) -> Option<SchemaVersion> {
        if self.patch > 0 {
            Some(Self::new(self.major, self.minor, self.patch - 1))
        } else if self.minor > 0 {
            Some(Self::new(self.major, self.minor - 1, 0))
        } else {
            None
        }
    }

    /// The next errata release of this version
    pub fn successor_patch(&self) -> SchemaVersion {
        Self::new(self.major, self.minor, self.patch + 1)
    }

    /// The next minor release of this version
    pub fn successor_minor(&self) -> SchemaVersion {
        Self::new(self.major, self.minor + 1, 0)
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}_{}_{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError(s.to_string());
        let digits = s.strip_prefix('v').ok_or_else(err)?;
        let mut parts = digits.split('_');
        let mut next = || -> Result<u32, VersionParseError> {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            part.parse::<u32>().map_err(|_| err())
        };
        let version = SchemaVersion::new(next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(version)
    }
}

/// A namespace name split into its base name and optional version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName {
    pub base: String,
    pub version: Option<SchemaVersion>,
}

impl NamespaceName {
    /// Split a namespace name. The version is only recognised in the last
    /// dotted segment, so `Org.OData.Core.V1` stays unversioned.
    pub fn parse(name: &str) -> Self {
        if let Some((base, last)) = name.rsplit_once('.')
            && let Ok(version) = last.parse::<SchemaVersion>()
        {
            return Self {
                base: base.to_string(),
                version: Some(version),
            };
        }
        Self {
            base: name.to_string(),
            version: None,
        }
    }

    /// Rebuild the namespace name for another version of the same base
    pub fn with_version(&self, version: SchemaVersion) -> String {
        format!("{}.{}", self.base, version)
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "{}.{}", self.base, version),
            None => write!(f, "{}", self.base),
        }
    }
}
