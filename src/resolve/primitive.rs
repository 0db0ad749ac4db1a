//! Built-in `Edm` primitive type names

use std::fmt;

const EDM_PREFIX: &str = "Edm.";

/// A built-in primitive type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Int64,
    Decimal,
    Double,
    String,
    DateTimeOffset,
    Guid,
    Duration,
    /// Any other `Edm` name; resolvable but not accepted in documents
    Other(String),
}

impl PrimitiveType {
    /// Parse a qualified `Edm.*` name; `None` for non-primitive names
    pub fn parse(qualified: &str) -> Option<Self> {
        let name = qualified.strip_prefix(EDM_PREFIX)?;
        if name.is_empty() {
            return None;
        }
        Some(match name {
            "Boolean" => PrimitiveType::Boolean,
            "Int64" => PrimitiveType::Int64,
            "Decimal" => PrimitiveType::Decimal,
            "Double" => PrimitiveType::Double,
            "String" => PrimitiveType::String,
            "DateTimeOffset" => PrimitiveType::DateTimeOffset,
            "Guid" => PrimitiveType::Guid,
            "Duration" => PrimitiveType::Duration,
            other => PrimitiveType::Other(other.to_string()),
        })
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Int64 => "Int64",
            PrimitiveType::Decimal => "Decimal",
            PrimitiveType::Double => "Double",
            PrimitiveType::String => "String",
            PrimitiveType::DateTimeOffset => "DateTimeOffset",
            PrimitiveType::Guid => "Guid",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Other(name) => name,
        };
        write!(f, "{}{}", EDM_PREFIX, name)
    }
}
