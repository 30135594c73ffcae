//! QTI expression and rule processing engines
//!
//! This crate evaluates the scoring and response logic embedded in
//! assessment items and tests:
//!
//! - **`ExpressionEngine`**: an iterative, explicit-stack walker that
//!   folds an expression tree bottom-up into a single [`QtiValue`],
//!   dispatching each node to its operator processor
//! - **Operator library**: one processor per QTI operator class, each
//!   validating operand arity/cardinality/base-type against the class
//!   signature and implementing the class's NULL-propagation rule
//! - **`RuleEngine`**: evaluates response/outcome/template processing
//!   rules in document order, mutating the [`EvaluationContext`]
//! - **`EvaluationContext`**: the variable store (values, defaults,
//!   correct responses, mappings, lookup tables) with an injectable
//!   random source
//!
//! # Example
//!
//! ```
//! use qtikit_ast::{Expression, Rule, Condition, ConditionBranch};
//! use qtikit_eval::{EvaluationContext, RuleEngine, Variable};
//! use qtikit_types::{BaseType, Cardinality, QtiValue};
//!
//! let mut ctx = EvaluationContext::new();
//! ctx.declare(
//!     Variable::response("RESPONSE", Cardinality::Single, BaseType::Identifier)
//!         .with_correct_response(QtiValue::identifier("ChoiceA"))
//!         .with_value(QtiValue::identifier("ChoiceA")),
//! );
//! ctx.declare(Variable::outcome("SCORE", Cardinality::Single, BaseType::Float));
//!
//! // if match(RESPONSE, correct(RESPONSE)) then SCORE = 1 else SCORE = 0
//! let rule = Rule::ResponseCondition(Condition {
//!     if_branch: ConditionBranch {
//!         guard: Expression::Match(vec![
//!             Expression::variable("RESPONSE"),
//!             Expression::correct("RESPONSE"),
//!         ]),
//!         rules: vec![Rule::set_outcome_value(
//!             "SCORE",
//!             Expression::base_value(QtiValue::float(1.0)),
//!         )],
//!     },
//!     else_ifs: vec![],
//!     else_rules: Some(vec![Rule::set_outcome_value(
//!         "SCORE",
//!         Expression::base_value(QtiValue::float(0.0)),
//!     )]),
//! });
//!
//! let engine = RuleEngine::new();
//! engine.process_all(std::slice::from_ref(&rule), &mut ctx).unwrap();
//! assert_eq!(ctx.value_of("SCORE"), Some(&QtiValue::float(1.0)));
//! ```
//!
//! # Error model
//!
//! Contract violations (wrong arity, cardinality or base type, unknown
//! variables, bad random bounds) abort evaluation as typed errors.
//! Data-dependent degenerate cases (NULL operands, division by zero, an
//! out-of-range index) are NULL values, never errors. Early exits and
//! unsatisfied template constraints are control signals distinct from
//! both.

pub mod context;
pub mod engine;
pub mod error;
mod expressions;
mod operators;
pub mod rules;

pub use context::{
    EvaluationContext, InterpolationEntry, InterpolationTable, LookupTable, MapEntry, Mapping,
    MatchTable, Variable, VariableKind,
};
pub use engine::ExpressionEngine;
pub use error::{
    ExitSignal, ExpressionError, ExpressionResult, ProcessingErrorKind, RuleAbort, RuleError,
    RuleOutcome, RuleResult,
};
pub use rules::RuleEngine;
