//! Container values
//!
//! Multiple and ordered containers hold a homogeneous run of scalar values;
//! the declared base type is enforced on every insertion so a container can
//! never drift away from its element type. Records map field identifiers to
//! values and carry no base type of their own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::BaseType;
use crate::value::QtiValue;

/// Error raised when a value cannot enter a container.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContainerError {
    /// Element base type differs from the container's declared base type
    #[error("container of {expected} cannot hold a {found} value")]
    BaseTypeMismatch {
        expected: BaseType,
        found: BaseType,
    },
    /// NULL can never be a container element
    #[error("containers cannot hold NULL elements")]
    NullElement,
    /// Containers hold scalars only
    #[error("containers cannot be nested")]
    NestedContainer,
}

fn check_element(base_type: BaseType, value: &QtiValue) -> Result<(), ContainerError> {
    if value.is_null() && value.cardinality().is_none() {
        return Err(ContainerError::NullElement);
    }
    match value.cardinality() {
        Some(c) if c != crate::types::Cardinality::Single => Err(ContainerError::NestedContainer),
        _ => match value.base_type() {
            Some(found) if found == base_type => Ok(()),
            Some(found) => Err(ContainerError::BaseTypeMismatch {
                expected: base_type,
                found,
            }),
            None => Err(ContainerError::NullElement),
        },
    }
}

fn distinct_values(values: &[QtiValue]) -> Vec<QtiValue> {
    let mut unique: Vec<QtiValue> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.iter().any(|seen| seen == value) {
            unique.push(value.clone());
        }
    }
    unique
}

/// Unordered bag of values sharing one base type.
///
/// Equality is multiset equality: `{A, B, B}` equals `{B, A, B}` but not
/// `{A, B}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipleContainer {
    base_type: BaseType,
    values: Vec<QtiValue>,
}

impl MultipleContainer {
    /// An empty container of the given base type.
    pub fn new(base_type: BaseType) -> Self {
        Self {
            base_type,
            values: Vec::new(),
        }
    }

    /// Build from elements, validating each against `base_type`.
    pub fn with_values(
        base_type: BaseType,
        values: impl IntoIterator<Item = QtiValue>,
    ) -> Result<Self, ContainerError> {
        let mut container = Self::new(base_type);
        for value in values {
            container.push(value)?;
        }
        Ok(container)
    }

    /// Append an element of the container's base type.
    pub fn push(&mut self, value: QtiValue) -> Result<(), ContainerError> {
        check_element(self.base_type, &value)?;
        self.values.push(value);
        Ok(())
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn values(&self) -> &[QtiValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Membership by value equality.
    pub fn contains(&self, value: &QtiValue) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// How many elements equal `value`.
    pub fn occurrences(&self, value: &QtiValue) -> usize {
        self.values.iter().filter(|v| *v == value).count()
    }

    /// A copy with duplicate elements collapsed to one occurrence.
    pub fn distinct(&self) -> Self {
        Self {
            base_type: self.base_type,
            values: distinct_values(&self.values),
        }
    }
}

impl PartialEq for MultipleContainer {
    fn eq(&self, other: &Self) -> bool {
        if self.base_type != other.base_type || self.values.len() != other.values.len() {
            return false;
        }
        // Multiset comparison: every distinct element occurs equally often
        // on both sides. Lengths already match, so one direction suffices.
        distinct_values(&self.values)
            .iter()
            .all(|v| self.occurrences(v) == other.occurrences(v))
    }
}

impl fmt::Display for MultipleContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "}}")
    }
}

/// Sequence of values sharing one base type.
///
/// Equality is positional: `[A, B]` differs from `[B, A]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedContainer {
    base_type: BaseType,
    values: Vec<QtiValue>,
}

impl OrderedContainer {
    /// An empty sequence of the given base type.
    pub fn new(base_type: BaseType) -> Self {
        Self {
            base_type,
            values: Vec::new(),
        }
    }

    /// Build from elements, validating each against `base_type`.
    pub fn with_values(
        base_type: BaseType,
        values: impl IntoIterator<Item = QtiValue>,
    ) -> Result<Self, ContainerError> {
        let mut container = Self::new(base_type);
        for value in values {
            container.push(value)?;
        }
        Ok(container)
    }

    /// Append an element of the container's base type.
    pub fn push(&mut self, value: QtiValue) -> Result<(), ContainerError> {
        check_element(self.base_type, &value)?;
        self.values.push(value);
        Ok(())
    }

    pub fn base_type(&self) -> BaseType {
        self.base_type
    }

    pub fn values(&self) -> &[QtiValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The 1-based `n`-th element, if in range.
    pub fn get(&self, n: usize) -> Option<&QtiValue> {
        if n == 0 { None } else { self.values.get(n - 1) }
    }

    /// Membership by value equality.
    pub fn contains(&self, value: &QtiValue) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// How many elements equal `value`.
    pub fn occurrences(&self, value: &QtiValue) -> usize {
        self.values.iter().filter(|v| *v == value).count()
    }

    /// A copy keeping only the first occurrence of each element.
    pub fn distinct(&self) -> Self {
        Self {
            base_type: self.base_type,
            values: distinct_values(&self.values),
        }
    }
}

impl fmt::Display for OrderedContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "]")
    }
}

/// Mapping from field identifier to value; fields may differ in base type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordContainer {
    fields: IndexMap<String, QtiValue>,
}

impl RecordContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(field, value)` pairs. NULL fields are rejected; absent
    /// is how a record spells "no value".
    pub fn with_fields(
        fields: impl IntoIterator<Item = (String, QtiValue)>,
    ) -> Result<Self, ContainerError> {
        let mut record = Self::new();
        for (name, value) in fields {
            record.set(name, value)?;
        }
        Ok(record)
    }

    /// Insert or replace a field.
    pub fn set(&mut self, name: impl Into<String>, value: QtiValue) -> Result<(), ContainerError> {
        if value.is_null() && value.cardinality().is_none() {
            return Err(ContainerError::NullElement);
        }
        self.fields.insert(name.into(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&QtiValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QtiValue)> {
        self.fields.iter()
    }
}

impl PartialEq for RecordContainer {
    // IndexMap equality is order-insensitive, which is exactly record
    // semantics: field spelling order carries no meaning.
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl fmt::Display for RecordContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::QtiValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn insertion_enforces_base_type() {
        let mut c = MultipleContainer::new(BaseType::Identifier);
        c.push(QtiValue::identifier("A")).unwrap();
        let err = c.push(QtiValue::integer(3)).unwrap_err();
        assert_eq!(
            err,
            ContainerError::BaseTypeMismatch {
                expected: BaseType::Identifier,
                found: BaseType::Integer,
            }
        );
    }

    #[test]
    fn null_and_nested_elements_rejected() {
        let mut c = OrderedContainer::new(BaseType::Integer);
        assert_eq!(c.push(QtiValue::Null).unwrap_err(), ContainerError::NullElement);
        let inner = MultipleContainer::new(BaseType::Integer);
        assert_eq!(
            c.push(QtiValue::Multiple(inner)).unwrap_err(),
            ContainerError::NestedContainer
        );
    }

    #[test]
    fn multiple_equality_is_multiset() {
        let a = MultipleContainer::with_values(
            BaseType::Identifier,
            [
                QtiValue::identifier("A"),
                QtiValue::identifier("B"),
                QtiValue::identifier("B"),
            ],
        )
        .unwrap();
        let b = MultipleContainer::with_values(
            BaseType::Identifier,
            [
                QtiValue::identifier("B"),
                QtiValue::identifier("A"),
                QtiValue::identifier("B"),
            ],
        )
        .unwrap();
        let c = MultipleContainer::with_values(
            BaseType::Identifier,
            [QtiValue::identifier("A"), QtiValue::identifier("B")],
        )
        .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ordered_equality_is_positional() {
        let a = OrderedContainer::with_values(
            BaseType::Integer,
            [QtiValue::integer(1), QtiValue::integer(2)],
        )
        .unwrap();
        let b = OrderedContainer::with_values(
            BaseType::Integer,
            [QtiValue::integer(2), QtiValue::integer(1)],
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_keeps_first_occurrence_order() {
        let c = OrderedContainer::with_values(
            BaseType::Identifier,
            [
                QtiValue::identifier("B"),
                QtiValue::identifier("A"),
                QtiValue::identifier("B"),
                QtiValue::identifier("C"),
            ],
        )
        .unwrap();
        let d = c.distinct();
        assert_eq!(
            d.values(),
            &[
                QtiValue::identifier("B"),
                QtiValue::identifier("A"),
                QtiValue::identifier("C"),
            ]
        );
    }

    #[test]
    fn ordered_get_is_one_based() {
        let c = OrderedContainer::with_values(
            BaseType::Identifier,
            [QtiValue::identifier("A"), QtiValue::identifier("B")],
        )
        .unwrap();
        assert_eq!(c.get(1), Some(&QtiValue::identifier("A")));
        assert_eq!(c.get(0), None);
        assert_eq!(c.get(3), None);
    }

    #[test]
    fn record_fields_ignore_declaration_order() {
        let mut a = RecordContainer::new();
        a.set("x", QtiValue::integer(1)).unwrap();
        a.set("y", QtiValue::string("two")).unwrap();
        let mut b = RecordContainer::new();
        b.set("y", QtiValue::string("two")).unwrap();
        b.set("x", QtiValue::integer(1)).unwrap();
        assert_eq!(a, b);
    }
}
