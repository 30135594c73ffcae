//! Expression node model
//!
//! Expressions form the read-only AST consumed by the evaluation engine.
//! The document layer builds these nodes after its own structural
//! validation; the engine re-validates operand shapes at evaluation time
//! against each class's static [`Signature`](crate::signature::Signature)
//! because declared child types may be unknowable before evaluation.

use serde::{Deserialize, Serialize};

use qtikit_types::{BaseType, QtiPoint, QtiValue};

/// An integer attribute that may be spelled as a literal or as a reference
/// to a template variable, resolved through the context at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerOrVariableRef {
    Value(i32),
    Variable(String),
}

impl From<i32> for IntegerOrVariableRef {
    fn from(value: i32) -> Self {
        Self::Value(value)
    }
}

/// A float attribute that may be spelled as a literal or as a variable
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FloatOrVariableRef {
    Value(f64),
    Variable(String),
}

impl From<f64> for FloatOrVariableRef {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

/// Literal value node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseValue {
    /// Declared base type of the literal
    pub base_type: BaseType,
    /// The literal itself, already decoded by the document layer
    pub value: QtiValue,
}

/// Reference to a declared variable, used by `variable`, `default`,
/// `correct` and `mapResponse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRef {
    pub identifier: String,
}

/// `randomInteger` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomInteger {
    pub min: IntegerOrVariableRef,
    pub max: IntegerOrVariableRef,
    pub step: IntegerOrVariableRef,
}

/// `randomFloat` attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomFloat {
    pub min: FloatOrVariableRef,
    pub max: FloatOrVariableRef,
}

/// The two named constants of `mathConstant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathConstantName {
    Pi,
    E,
}

/// `anyN` attributes and operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnyN {
    pub min: IntegerOrVariableRef,
    pub max: IntegerOrVariableRef,
    pub operands: Vec<Expression>,
}

/// Tolerance interpretation for the `equal` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ToleranceMode {
    Exact,
    Absolute,
    Relative,
}

/// `equal` attributes and operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equal {
    pub tolerance_mode: ToleranceMode,
    /// Zero, one or two bounds; one bound applies on both sides
    pub tolerance: Vec<FloatOrVariableRef>,
    pub include_lower_bound: bool,
    pub include_upper_bound: bool,
    pub operands: Vec<Expression>,
}

/// Rounding interpretation for `equalRounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingMode {
    SignificantFigures,
    DecimalPlaces,
}

/// `equalRounded` attributes and operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualRounded {
    pub rounding_mode: RoundingMode,
    pub figures: IntegerOrVariableRef,
    pub operands: Vec<Expression>,
}

/// A screen region for the `inside` operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Area {
    /// The entire rendered region
    Default,
    Rect { x0: i32, y0: i32, x1: i32, y1: i32 },
    Circle { cx: i32, cy: i32, r: i32 },
    Poly { points: Vec<QtiPoint> },
}

impl Area {
    /// Point-in-region test. Boundaries are inside; polygons use the
    /// even-odd rule.
    pub fn contains_point(&self, p: &QtiPoint) -> bool {
        match self {
            Self::Default => true,
            Self::Rect { x0, y0, x1, y1 } => {
                p.x >= *x0 && p.x <= *x1 && p.y >= *y0 && p.y <= *y1
            }
            Self::Circle { cx, cy, r } => {
                let dx = f64::from(p.x - cx);
                let dy = f64::from(p.y - cy);
                dx * dx + dy * dy <= f64::from(*r) * f64::from(*r)
            }
            Self::Poly { points } => {
                let mut inside = false;
                let n = points.len();
                if n < 3 {
                    return false;
                }
                let (px, py) = (f64::from(p.x), f64::from(p.y));
                let mut j = n - 1;
                for i in 0..n {
                    let (xi, yi) = (f64::from(points[i].x), f64::from(points[i].y));
                    let (xj, yj) = (f64::from(points[j].x), f64::from(points[j].y));
                    if ((yi > py) != (yj > py))
                        && (px < (xj - xi) * (py - yi) / (yj - yi) + xi)
                    {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
        }
    }
}

/// `inside` attributes and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inside {
    pub area: Area,
    pub operands: Vec<Expression>,
}

/// `index` attributes and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// 1-based position, possibly a template variable reference
    pub n: IntegerOrVariableRef,
    pub operands: Vec<Expression>,
}

/// `fieldValue` attributes and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field_identifier: String,
    pub operands: Vec<Expression>,
}

/// `substring` attributes and operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substring {
    pub case_sensitive: bool,
    pub operands: Vec<Expression>,
}

/// `stringMatch` attributes and operands. The `substring` flag is
/// deprecated in the source vocabulary but still honored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringMatch {
    pub case_sensitive: bool,
    pub substring: bool,
    pub operands: Vec<Expression>,
}

/// `patternMatch` attributes and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// XML-Schema flavored regular expression, matched against the whole
    /// string
    pub pattern: String,
    pub operands: Vec<Expression>,
}

/// The statistics selectable through `statsOperator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Statistics {
    Mean,
    SampleVariance,
    SampleSD,
    PopVariance,
    PopSD,
}

/// `statsOperator` attributes and operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsOperator {
    pub name: Statistics,
    pub operands: Vec<Expression>,
}

/// The function catalog of `mathOperator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MathFunction {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Sech,
    Csch,
    Coth,
    Log,
    Ln,
    Exp,
    Abs,
    Signum,
    Floor,
    Ceil,
    ToDegrees,
    ToRadians,
    Pow,
}

impl MathFunction {
    /// Functions taking two operands; the rest take one.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Atan2 | Self::Pow)
    }
}

/// `mathOperator` attributes and operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathOperator {
    pub name: MathFunction,
    pub operands: Vec<Expression>,
}

/// An expression tree node: a leaf yielding a value directly, or an
/// operator combining the values of its child expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", content = "node")]
pub enum Expression {
    // === Leaves ===
    BaseValue(BaseValue),
    Variable(VariableRef),
    Default(VariableRef),
    Correct(VariableRef),
    MapResponse(VariableRef),
    Null,
    RandomInteger(RandomInteger),
    RandomFloat(RandomFloat),
    MathConstant(MathConstantName),

    // === Logical operators ===
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Vec<Expression>),
    AnyN(AnyN),

    // === Comparison operators ===
    Match(Vec<Expression>),
    Equal(Equal),
    EqualRounded(EqualRounded),
    Inside(Inside),
    Gt(Vec<Expression>),
    Gte(Vec<Expression>),
    Lt(Vec<Expression>),
    Lte(Vec<Expression>),
    DurationLt(Vec<Expression>),
    DurationGte(Vec<Expression>),

    // === Arithmetic operators ===
    Sum(Vec<Expression>),
    Product(Vec<Expression>),
    Subtract(Vec<Expression>),
    Divide(Vec<Expression>),
    Power(Vec<Expression>),
    IntegerDivide(Vec<Expression>),
    IntegerModulus(Vec<Expression>),
    Truncate(Vec<Expression>),
    Round(Vec<Expression>),
    IntegerToFloat(Vec<Expression>),
    Min(Vec<Expression>),
    Max(Vec<Expression>),
    Gcd(Vec<Expression>),
    Lcm(Vec<Expression>),
    MathOperator(MathOperator),

    // === Container operators ===
    Multiple(Vec<Expression>),
    Ordered(Vec<Expression>),
    ContainerSize(Vec<Expression>),
    IsNull(Vec<Expression>),
    Index(Index),
    FieldValue(FieldValue),
    Random(Vec<Expression>),
    Member(Vec<Expression>),
    Delete(Vec<Expression>),
    Contains(Vec<Expression>),

    // === String operators ===
    Substring(Substring),
    StringMatch(StringMatch),
    PatternMatch(PatternMatch),

    // === Statistics ===
    StatsOperator(StatsOperator),
}

impl Expression {
    /// The QTI class name of this node, as spelled in source documents.
    pub fn qti_class_name(&self) -> &'static str {
        match self {
            Self::BaseValue(_) => "baseValue",
            Self::Variable(_) => "variable",
            Self::Default(_) => "default",
            Self::Correct(_) => "correct",
            Self::MapResponse(_) => "mapResponse",
            Self::Null => "null",
            Self::RandomInteger(_) => "randomInteger",
            Self::RandomFloat(_) => "randomFloat",
            Self::MathConstant(_) => "mathConstant",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::AnyN(_) => "anyN",
            Self::Match(_) => "match",
            Self::Equal(_) => "equal",
            Self::EqualRounded(_) => "equalRounded",
            Self::Inside(_) => "inside",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::DurationLt(_) => "durationLT",
            Self::DurationGte(_) => "durationGTE",
            Self::Sum(_) => "sum",
            Self::Product(_) => "product",
            Self::Subtract(_) => "subtract",
            Self::Divide(_) => "divide",
            Self::Power(_) => "power",
            Self::IntegerDivide(_) => "integerDivide",
            Self::IntegerModulus(_) => "integerModulus",
            Self::Truncate(_) => "truncate",
            Self::Round(_) => "round",
            Self::IntegerToFloat(_) => "integerToFloat",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::Gcd(_) => "gcd",
            Self::Lcm(_) => "lcm",
            Self::MathOperator(_) => "mathOperator",
            Self::Multiple(_) => "multiple",
            Self::Ordered(_) => "ordered",
            Self::ContainerSize(_) => "containerSize",
            Self::IsNull(_) => "isNull",
            Self::Index(_) => "index",
            Self::FieldValue(_) => "fieldValue",
            Self::Random(_) => "random",
            Self::Member(_) => "member",
            Self::Delete(_) => "delete",
            Self::Contains(_) => "contains",
            Self::Substring(_) => "substring",
            Self::StringMatch(_) => "stringMatch",
            Self::PatternMatch(_) => "patternMatch",
            Self::StatsOperator(_) => "statsOperator",
        }
    }

    /// The ordered child expressions. Empty for leaves.
    pub fn children(&self) -> &[Expression] {
        match self {
            Self::BaseValue(_)
            | Self::Variable(_)
            | Self::Default(_)
            | Self::Correct(_)
            | Self::MapResponse(_)
            | Self::Null
            | Self::RandomInteger(_)
            | Self::RandomFloat(_)
            | Self::MathConstant(_) => &[],
            Self::And(ops)
            | Self::Or(ops)
            | Self::Not(ops)
            | Self::Match(ops)
            | Self::Gt(ops)
            | Self::Gte(ops)
            | Self::Lt(ops)
            | Self::Lte(ops)
            | Self::DurationLt(ops)
            | Self::DurationGte(ops)
            | Self::Sum(ops)
            | Self::Product(ops)
            | Self::Subtract(ops)
            | Self::Divide(ops)
            | Self::Power(ops)
            | Self::IntegerDivide(ops)
            | Self::IntegerModulus(ops)
            | Self::Truncate(ops)
            | Self::Round(ops)
            | Self::IntegerToFloat(ops)
            | Self::Min(ops)
            | Self::Max(ops)
            | Self::Gcd(ops)
            | Self::Lcm(ops)
            | Self::Multiple(ops)
            | Self::Ordered(ops)
            | Self::ContainerSize(ops)
            | Self::IsNull(ops)
            | Self::Random(ops)
            | Self::Member(ops)
            | Self::Delete(ops)
            | Self::Contains(ops) => ops,
            Self::AnyN(e) => &e.operands,
            Self::Equal(e) => &e.operands,
            Self::EqualRounded(e) => &e.operands,
            Self::Inside(e) => &e.operands,
            Self::Index(e) => &e.operands,
            Self::FieldValue(e) => &e.operands,
            Self::Substring(e) => &e.operands,
            Self::StringMatch(e) => &e.operands,
            Self::PatternMatch(e) => &e.operands,
            Self::StatsOperator(e) => &e.operands,
            Self::MathOperator(e) => &e.operands,
        }
    }

    /// Operators combine child values; leaves produce values directly.
    pub fn is_operator(&self) -> bool {
        !matches!(
            self,
            Self::BaseValue(_)
                | Self::Variable(_)
                | Self::Default(_)
                | Self::Correct(_)
                | Self::MapResponse(_)
                | Self::Null
                | Self::RandomInteger(_)
                | Self::RandomFloat(_)
                | Self::MathConstant(_)
        )
    }

    // === Convenience constructors, mainly for tests and embedders ===

    /// Literal node for a single value, deriving the declared base type
    /// from the value itself where possible.
    pub fn base_value(value: QtiValue) -> Self {
        let base_type = value.base_type().unwrap_or(BaseType::String);
        Self::BaseValue(BaseValue { base_type, value })
    }

    /// `variable` reference node.
    pub fn variable(identifier: impl Into<String>) -> Self {
        Self::Variable(VariableRef {
            identifier: identifier.into(),
        })
    }

    /// `correct` reference node.
    pub fn correct(identifier: impl Into<String>) -> Self {
        Self::Correct(VariableRef {
            identifier: identifier.into(),
        })
    }

    /// `default` reference node.
    pub fn default_of(identifier: impl Into<String>) -> Self {
        Self::Default(VariableRef {
            identifier: identifier.into(),
        })
    }

    /// `mapResponse` node.
    pub fn map_response(identifier: impl Into<String>) -> Self {
        Self::MapResponse(VariableRef {
            identifier: identifier.into(),
        })
    }
}
