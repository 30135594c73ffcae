//! Static operator contracts
//!
//! Each operator class declares how many operands it takes and which
//! cardinality/base-type families those operands may have. The document
//! layer checks these structurally at build time; the evaluation engine
//! checks them again against the actual runtime values, which is the
//! authoritative pass because declared child types may be unknowable
//! until evaluated.

use qtikit_types::{BaseType, Cardinality};

use crate::expression::Expression;

/// Operand contract for one operator class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Fewest operands accepted
    pub min_operands: usize,
    /// Most operands accepted; `None` is unbounded
    pub max_operands: Option<usize>,
    /// Cardinalities an operand may have
    pub cardinalities: &'static [Cardinality],
    /// Base types an operand may have; `None` accepts any base type
    pub base_types: Option<&'static [BaseType]>,
}

impl Signature {
    /// Whether `count` operands satisfies the arity bounds.
    pub fn accepts_operand_count(&self, count: usize) -> bool {
        count >= self.min_operands && self.max_operands.is_none_or(|max| count <= max)
    }
}

const SINGLE: &[Cardinality] = &[Cardinality::Single];
const SINGLE_OR_CONTAINER: &[Cardinality] =
    &[Cardinality::Single, Cardinality::Multiple, Cardinality::Ordered];
const CONTAINER: &[Cardinality] = &[Cardinality::Multiple, Cardinality::Ordered];
const ANY_CARDINALITY: &[Cardinality] = &[
    Cardinality::Single,
    Cardinality::Multiple,
    Cardinality::Ordered,
    Cardinality::Record,
];

const BOOLEAN: &[BaseType] = &[BaseType::Boolean];
const NUMERIC: &[BaseType] = &[BaseType::Integer, BaseType::Float];
const INTEGER: &[BaseType] = &[BaseType::Integer];
const FLOAT: &[BaseType] = &[BaseType::Float];
const STRING: &[BaseType] = &[BaseType::String];
const DURATION: &[BaseType] = &[BaseType::Duration];
const POINT: &[BaseType] = &[BaseType::Point];

const fn sig(
    min_operands: usize,
    max_operands: Option<usize>,
    cardinalities: &'static [Cardinality],
    base_types: Option<&'static [BaseType]>,
) -> Signature {
    Signature {
        min_operands,
        max_operands,
        cardinalities,
        base_types,
    }
}

static BOOLEAN_NARY: Signature = sig(1, None, SINGLE, Some(BOOLEAN));
static BOOLEAN_UNARY: Signature = sig(1, Some(1), SINGLE, Some(BOOLEAN));
static SAME_PAIR: Signature = sig(2, Some(2), SINGLE_OR_CONTAINER, None);
static NUMERIC_PAIR: Signature = sig(2, Some(2), SINGLE, Some(NUMERIC));
static NUMERIC_NARY: Signature = sig(1, None, SINGLE_OR_CONTAINER, Some(NUMERIC));
static NUMERIC_UNARY: Signature = sig(1, Some(1), SINGLE, Some(NUMERIC));
static INTEGER_PAIR: Signature = sig(2, Some(2), SINGLE, Some(INTEGER));
static INTEGER_NARY: Signature = sig(1, None, SINGLE_OR_CONTAINER, Some(INTEGER));
static INTEGER_UNARY: Signature = sig(1, Some(1), SINGLE, Some(INTEGER));
static FLOAT_UNARY: Signature = sig(1, Some(1), SINGLE, Some(FLOAT));
static DURATION_PAIR: Signature = sig(2, Some(2), SINGLE, Some(DURATION));
static STRING_PAIR: Signature = sig(2, Some(2), SINGLE, Some(STRING));
static STRING_UNARY: Signature = sig(1, Some(1), SINGLE, Some(STRING));
static INSIDE: Signature = sig(1, Some(1), SINGLE_OR_CONTAINER, Some(POINT));
static MULTIPLE: Signature = sig(
    0,
    None,
    &[Cardinality::Single, Cardinality::Multiple],
    None,
);
static ORDERED: Signature = sig(0, None, &[Cardinality::Single, Cardinality::Ordered], None);
static CONTAINER_UNARY: Signature = sig(1, Some(1), CONTAINER, None);
static IS_NULL: Signature = sig(1, Some(1), ANY_CARDINALITY, None);
static INDEX: Signature = sig(1, Some(1), &[Cardinality::Ordered], None);
static FIELD_VALUE: Signature = sig(1, Some(1), &[Cardinality::Record], None);
static MEMBERSHIP_PAIR: Signature = sig(2, Some(2), SINGLE_OR_CONTAINER, None);
static CONTAINER_PAIR: Signature = sig(2, Some(2), CONTAINER, None);
static STATS: Signature = sig(1, Some(1), CONTAINER, Some(NUMERIC));
static MATH_OPERATOR: Signature = sig(1, Some(2), SINGLE, Some(NUMERIC));

impl Expression {
    /// The static operand contract of this operator class; `None` for
    /// leaf expressions, which take no operands.
    pub fn signature(&self) -> Option<&'static Signature> {
        let signature = match self {
            Self::BaseValue(_)
            | Self::Variable(_)
            | Self::Default(_)
            | Self::Correct(_)
            | Self::MapResponse(_)
            | Self::Null
            | Self::RandomInteger(_)
            | Self::RandomFloat(_)
            | Self::MathConstant(_) => return None,
            Self::And(_) | Self::Or(_) | Self::AnyN(_) => &BOOLEAN_NARY,
            Self::Not(_) => &BOOLEAN_UNARY,
            Self::Match(_) => &SAME_PAIR,
            Self::Equal(_) | Self::EqualRounded(_) => &NUMERIC_PAIR,
            Self::Inside(_) => &INSIDE,
            Self::Gt(_) | Self::Gte(_) | Self::Lt(_) | Self::Lte(_) => &NUMERIC_PAIR,
            Self::DurationLt(_) | Self::DurationGte(_) => &DURATION_PAIR,
            Self::Sum(_) | Self::Product(_) => &NUMERIC_NARY,
            Self::Subtract(_) | Self::Divide(_) | Self::Power(_) => &NUMERIC_PAIR,
            Self::IntegerDivide(_) | Self::IntegerModulus(_) => &INTEGER_PAIR,
            Self::Truncate(_) | Self::Round(_) => &FLOAT_UNARY,
            Self::IntegerToFloat(_) => &INTEGER_UNARY,
            Self::Min(_) | Self::Max(_) => &NUMERIC_NARY,
            Self::Gcd(_) | Self::Lcm(_) => &INTEGER_NARY,
            Self::MathOperator(_) => &MATH_OPERATOR,
            Self::Multiple(_) => &MULTIPLE,
            Self::Ordered(_) => &ORDERED,
            Self::ContainerSize(_) | Self::Random(_) => &CONTAINER_UNARY,
            Self::IsNull(_) => &IS_NULL,
            Self::Index(_) => &INDEX,
            Self::FieldValue(_) => &FIELD_VALUE,
            Self::Member(_) | Self::Delete(_) => &MEMBERSHIP_PAIR,
            Self::Contains(_) => &CONTAINER_PAIR,
            Self::Substring(_) | Self::StringMatch(_) => &STRING_PAIR,
            Self::PatternMatch(_) => &STRING_UNARY,
            Self::StatsOperator(_) => &STATS,
        };
        Some(signature)
    }
}
