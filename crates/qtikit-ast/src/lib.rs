//! QTI expression and rule node model
//!
//! Closed sum types over the QTI processing vocabulary, consumed read-only
//! by the evaluation engines:
//!
//! - [`Expression`]: leaves (literals, variable references, random value
//!   generators) and the operator catalog, each reporting its QTI class
//!   name, ordered children and static operand [`Signature`]
//! - [`Rule`]: conditionals, assignments, lookup-table assignments, exits
//!   and template constraints
//!
//! Nodes carry the attributes their class declares (patterns, tolerance
//! bounds, field identifiers, areas); numeric attributes that QTI allows to
//! be spelled as template-variable references are modeled as
//! [`IntegerOrVariableRef`]/[`FloatOrVariableRef`] and resolved at
//! evaluation time.

pub mod expression;
pub mod rule;
pub mod signature;

pub use expression::{
    AnyN, Area, BaseValue, Equal, EqualRounded, Expression, FieldValue, FloatOrVariableRef, Index,
    Inside, IntegerOrVariableRef, MathConstantName, MathFunction, MathOperator, PatternMatch,
    RandomFloat, RandomInteger, RoundingMode, StatsOperator, Statistics, StringMatch, Substring,
    ToleranceMode, VariableRef,
};
pub use rule::{Assignment, Condition, ConditionBranch, Rule, TemplateConstraint};
pub use signature::Signature;
