//! QTI runtime values
//!
//! `QtiValue` is the closed union over every value the processing engines
//! can produce or consume. Cardinality and base type are derived from the
//! variant rather than tracked alongside it, so a value and its declared
//! type can never disagree.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::container::{MultipleContainer, OrderedContainer, RecordContainer};
use crate::duration::QtiDuration;
use crate::types::{BaseType, Cardinality};

/// Unordered pair of identifiers. `(A, B)` equals `(B, A)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QtiPair {
    pub first: String,
    pub second: String,
}

impl QtiPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl PartialEq for QtiPair {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl fmt::Display for QtiPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.second)
    }
}

/// Ordered pair of identifiers. `(A, B)` differs from `(B, A)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QtiDirectedPair {
    pub source: String,
    pub target: String,
}

impl QtiDirectedPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for QtiDirectedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.target)
    }
}

/// Screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QtiPoint {
    pub x: i32,
    pub y: i32,
}

impl QtiPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for QtiPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// A value that is either an integer or an identifier, for response
/// declarations that accept both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrIdentifier {
    Integer(i32),
    Identifier(String),
}

impl fmt::Display for IntOrIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Identifier(id) => f.write_str(id),
        }
    }
}

/// The QTI value lattice.
///
/// Scalar variants report `Cardinality::Single`; container variants report
/// their own cardinality and (records aside) the base type shared by their
/// elements. `Null` matches any declared cardinality/base-type constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum QtiValue {
    /// The absence of a value
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f64),
    String(String),
    Identifier(String),
    Point(QtiPoint),
    Pair(QtiPair),
    DirectedPair(QtiDirectedPair),
    Duration(QtiDuration),
    Uri(String),
    IntOrIdentifier(IntOrIdentifier),
    Multiple(MultipleContainer),
    Ordered(OrderedContainer),
    Record(RecordContainer),
}

impl QtiValue {
    /// NULL, an empty container, or an empty string — the emptiness test
    /// used by `isNull` and the NULL-propagation rules.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            Self::Multiple(c) => c.is_empty(),
            Self::Ordered(c) => c.is_empty(),
            Self::Record(r) => r.is_empty(),
            _ => false,
        }
    }

    /// The shape of this value; `None` for NULL, which matches any shape.
    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            Self::Null => None,
            Self::Multiple(_) => Some(Cardinality::Multiple),
            Self::Ordered(_) => Some(Cardinality::Ordered),
            Self::Record(_) => Some(Cardinality::Record),
            _ => Some(Cardinality::Single),
        }
    }

    /// The scalar kind of this value or of its elements; `None` for NULL
    /// (matches anything) and for records (no base type of their own).
    pub fn base_type(&self) -> Option<BaseType> {
        match self {
            Self::Null | Self::Record(_) => None,
            Self::Boolean(_) => Some(BaseType::Boolean),
            Self::Integer(_) => Some(BaseType::Integer),
            Self::Float(_) => Some(BaseType::Float),
            Self::String(_) => Some(BaseType::String),
            Self::Identifier(_) => Some(BaseType::Identifier),
            Self::Point(_) => Some(BaseType::Point),
            Self::Pair(_) => Some(BaseType::Pair),
            Self::DirectedPair(_) => Some(BaseType::DirectedPair),
            Self::Duration(_) => Some(BaseType::Duration),
            Self::Uri(_) => Some(BaseType::Uri),
            Self::IntOrIdentifier(_) => Some(BaseType::IntOrIdentifier),
            Self::Multiple(c) => Some(c.base_type()),
            Self::Ordered(c) => Some(c.base_type()),
        }
    }

    /// NULL matches any cardinality; other values match their own.
    pub fn matches_cardinality(&self, cardinality: Cardinality) -> bool {
        self.cardinality().is_none_or(|c| c == cardinality)
    }

    /// NULL and records match any base type; other values match their own.
    pub fn matches_base_type(&self, base_type: BaseType) -> bool {
        match self {
            Self::Record(_) => false,
            _ => self.base_type().is_none_or(|b| b == base_type),
        }
    }

    /// Integer and float, the operand family of the arithmetic operators.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric reading with integer promotion; `None` for everything that
    /// is not an integer or float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(f64::from(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Identifier(s) | Self::Uri(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<&QtiDuration> {
        match self {
            Self::Duration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<&QtiPoint> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_multiple(&self) -> Option<&MultipleContainer> {
        match self {
            Self::Multiple(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_ordered(&self) -> Option<&OrderedContainer> {
        match self {
            Self::Ordered(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordContainer> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// The elements of a multiple or ordered container; `None` for
    /// everything else.
    pub fn container_values(&self) -> Option<&[QtiValue]> {
        match self {
            Self::Multiple(c) => Some(c.values()),
            Self::Ordered(c) => Some(c.values()),
            _ => None,
        }
    }

    // === Constructors ===

    pub fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    pub fn integer(value: i32) -> Self {
        Self::Integer(value)
    }

    pub fn float(value: f64) -> Self {
        Self::Float(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::Identifier(value.into())
    }

    pub fn uri(value: impl Into<String>) -> Self {
        Self::Uri(value.into())
    }

    pub fn point(x: i32, y: i32) -> Self {
        Self::Point(QtiPoint::new(x, y))
    }

    pub fn pair(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Pair(QtiPair::new(first, second))
    }

    pub fn directed_pair(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::DirectedPair(QtiDirectedPair::new(source, target))
    }

    pub fn duration(duration: QtiDuration) -> Self {
        Self::Duration(duration)
    }
}

impl fmt::Display for QtiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Identifier(id) => f.write_str(id),
            Self::Point(p) => write!(f, "{p}"),
            Self::Pair(p) => write!(f, "{p}"),
            Self::DirectedPair(p) => write!(f, "{p}"),
            Self::Duration(d) => write!(f, "{d}"),
            Self::Uri(u) => f.write_str(u),
            Self::IntOrIdentifier(v) => write!(f, "{v}"),
            Self::Multiple(c) => write!(f, "{c}"),
            Self::Ordered(c) => write!(f, "{c}"),
            Self::Record(r) => write!(f, "{r}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pair_equality_is_symmetric() {
        assert_eq!(QtiValue::pair("A", "B"), QtiValue::pair("B", "A"));
        assert_ne!(
            QtiValue::directed_pair("A", "B"),
            QtiValue::directed_pair("B", "A")
        );
    }

    #[test]
    fn emptiness_tests() {
        assert!(QtiValue::Null.is_null());
        assert!(QtiValue::string("").is_null());
        assert!(QtiValue::Multiple(MultipleContainer::new(BaseType::Integer)).is_null());
        assert!(!QtiValue::integer(0).is_null());
        assert!(!QtiValue::boolean(false).is_null());
    }

    #[test]
    fn derived_cardinality_and_base_type() {
        assert_eq!(QtiValue::integer(1).cardinality(), Some(Cardinality::Single));
        assert_eq!(QtiValue::integer(1).base_type(), Some(BaseType::Integer));
        assert_eq!(QtiValue::Null.cardinality(), None);
        assert_eq!(QtiValue::Null.base_type(), None);

        let c = MultipleContainer::with_values(
            BaseType::Identifier,
            [QtiValue::identifier("A")],
        )
        .unwrap();
        let v = QtiValue::Multiple(c);
        assert_eq!(v.cardinality(), Some(Cardinality::Multiple));
        assert_eq!(v.base_type(), Some(BaseType::Identifier));
    }

    #[test]
    fn null_matches_any_constraint() {
        assert!(QtiValue::Null.matches_cardinality(Cardinality::Ordered));
        assert!(QtiValue::Null.matches_base_type(BaseType::Duration));
        assert!(!QtiValue::integer(1).matches_cardinality(Cardinality::Multiple));
        assert!(!QtiValue::integer(1).matches_base_type(BaseType::Float));
    }

    #[test]
    fn record_matches_no_base_type() {
        let record = QtiValue::Record(RecordContainer::new());
        assert!(!record.matches_base_type(BaseType::Integer));
        assert!(record.matches_cardinality(Cardinality::Record));
    }

    #[test]
    fn exact_equality_does_not_cross_numeric_kinds() {
        assert_ne!(QtiValue::integer(1), QtiValue::float(1.0));
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(QtiValue::integer(5)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Integer", "value": 5}));
    }
}
