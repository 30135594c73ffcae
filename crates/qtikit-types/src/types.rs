//! QTI base types and cardinalities
//!
//! Every runtime value reports a `(Cardinality, BaseType)` pair derived from
//! its variant. These enums use the QTI vocabulary names in their textual
//! form so diagnostics read like the source documents.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The scalar kind carried by a value or by every element of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseType {
    /// true/false
    Boolean,
    /// 32-bit signed integer, QTI range [-2147483647, 2147483647]
    Integer,
    /// IEEE 754 double
    Float,
    /// Unicode string
    String,
    /// x/y screen coordinate
    Point,
    /// Unordered pair of identifiers
    Pair,
    /// Ordered pair of identifiers
    DirectedPair,
    /// QTI identifier
    Identifier,
    /// ISO-8601 duration, normalized to seconds
    Duration,
    /// URI string
    Uri,
    /// Either an integer or an identifier
    IntOrIdentifier,
}

impl BaseType {
    /// The QTI vocabulary name, e.g. `directedPair`.
    pub fn qti_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Point => "point",
            Self::Pair => "pair",
            Self::DirectedPair => "directedPair",
            Self::Identifier => "identifier",
            Self::Duration => "duration",
            Self::Uri => "uri",
            Self::IntOrIdentifier => "intOrIdentifier",
        }
    }

    /// Integer or float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qti_name())
    }
}

/// The shape of a QTI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    /// A lone scalar
    Single,
    /// Unordered bag, duplicates allowed
    Multiple,
    /// Sequence, duplicates allowed
    Ordered,
    /// Named fields, heterogeneous base types
    Record,
}

impl Cardinality {
    /// The QTI vocabulary name.
    pub fn qti_name(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Multiple => "multiple",
            Self::Ordered => "ordered",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qti_name())
    }
}

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("identifier regex"));

/// Check a string against the QTI identifier production.
///
/// Identifiers start with a letter or underscore and continue with letters,
/// digits, underscores, hyphens or dots. Colons are excluded: prefixed names
/// are resolved before they reach this layer.
pub fn is_valid_identifier(candidate: &str) -> bool {
    IDENTIFIER_RE.is_match(candidate)
}
