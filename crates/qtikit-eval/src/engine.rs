//! Expression evaluation engine
//!
//! An iterative, explicit-stack tree walker. The work stack holds
//! `(node, children_visited)` pairs: an operator is pushed back marked
//! before its children go on in reverse order, so children pop in document
//! order and the operator's second visit finds exactly its operands on top
//! of the operand stack. Depth is bounded by tree size, never by the call
//! stack, so deeply nested expressions cannot overflow.
//!
//! Operand order is the engine's load-bearing invariant: order-sensitive
//! operators (`subtract`, `divide`, `index`, `delete`) silently corrupt if
//! children are pushed or popped out of document order.

use log::trace;
use qtikit_ast::Expression;
use qtikit_types::QtiValue;
use smallvec::SmallVec;

use crate::context::EvaluationContext;
use crate::error::{ExpressionError, ExpressionResult};
use crate::expressions::eval_leaf;
use crate::operators;

/// Stateless expression evaluator. Each call owns its stacks, so one
/// engine can serve any number of sequential evaluations.
#[derive(Debug, Default)]
pub struct ExpressionEngine;

impl ExpressionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an expression tree bottom-up into a single value.
    ///
    /// Contract violations abort with a typed error; data-dependent NULLs
    /// flow through as values.
    pub fn evaluate(
        &self,
        expression: &Expression,
        ctx: &EvaluationContext,
    ) -> ExpressionResult<QtiValue> {
        let mut trail: Vec<(&Expression, bool)> = vec![(expression, false)];
        let mut operands: SmallVec<[QtiValue; 8]> = SmallVec::new();

        while let Some((node, children_visited)) = trail.pop() {
            if node.is_operator() && !children_visited {
                trail.push((node, true));
                for child in node.children().iter().rev() {
                    trail.push((child, false));
                }
            } else if node.is_operator() {
                // Second visit: all children evaluated. Arity counts child
                // expressions, not produced values; a container-valued
                // child is still one operand.
                let arity = node.children().len();
                if operands.len() < arity {
                    return Err(ExpressionError::internal(format!(
                        "operand stack underflow at '{}'",
                        node.qti_class_name()
                    )));
                }
                let args: Vec<QtiValue> = operands.drain(operands.len() - arity..).collect();
                validate_operands(node, &args)?;
                let value = dispatch_operator(node, &args, ctx)?;
                trace!("{} -> {}", node.qti_class_name(), value);
                operands.push(value);
            } else {
                let value = eval_leaf(node, ctx)?;
                trace!("{} -> {}", node.qti_class_name(), value);
                operands.push(value);
            }
        }

        let result = operands
            .pop()
            .ok_or_else(|| ExpressionError::internal("evaluation produced no value"))?;
        if !operands.is_empty() {
            return Err(ExpressionError::internal(format!(
                "{} values left on the operand stack after evaluation",
                operands.len()
            )));
        }
        Ok(result)
    }
}

/// Check evaluated operands against the operator's static contract. NULL
/// matches any constraint; records fail wherever a base type is demanded.
fn validate_operands(node: &Expression, operands: &[QtiValue]) -> ExpressionResult<()> {
    let Some(signature) = node.signature() else {
        return Ok(());
    };
    let operator = node.qti_class_name();

    if !signature.accepts_operand_count(operands.len()) {
        let expected = match signature.max_operands {
            Some(max) if max == signature.min_operands => format!("{max}"),
            Some(max) => format!("{}..{}", signature.min_operands, max),
            None => format!("{}+", signature.min_operands),
        };
        return Err(ExpressionError::operand_count(
            operator,
            expected,
            operands.len(),
        ));
    }

    for operand in operands {
        if matches!(operand, QtiValue::Null) {
            continue;
        }
        if let Some(cardinality) = operand.cardinality()
            && !signature.cardinalities.contains(&cardinality)
        {
            return Err(ExpressionError::WrongCardinality {
                operator,
                found: cardinality,
            });
        }
        if let Some(allowed) = signature.base_types {
            match operand.base_type() {
                Some(base_type) if allowed.contains(&base_type) => {}
                Some(base_type) => {
                    return Err(ExpressionError::WrongBaseType {
                        operator,
                        found: base_type,
                    });
                }
                // A record reaching here means the cardinality list allowed
                // it while a base type is demanded; reject it.
                None => {
                    return Err(ExpressionError::WrongCardinality {
                        operator,
                        found: qtikit_types::Cardinality::Record,
                    });
                }
            }
        }
    }
    Ok(())
}

fn dispatch_operator(
    node: &Expression,
    args: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    use operators::{arithmetic, comparison, container, logical, math, statistics, string};

    match node {
        Expression::And(_) => logical::and(args),
        Expression::Or(_) => logical::or(args),
        Expression::Not(_) => logical::not(args),
        Expression::AnyN(e) => logical::any_n(e, args, ctx),
        Expression::Match(_) => comparison::match_values(args),
        Expression::Equal(e) => comparison::equal(e, args, ctx),
        Expression::EqualRounded(e) => comparison::equal_rounded(e, args, ctx),
        Expression::Inside(e) => comparison::inside(e, args),
        Expression::Gt(_) => comparison::gt(args),
        Expression::Gte(_) => comparison::gte(args),
        Expression::Lt(_) => comparison::lt(args),
        Expression::Lte(_) => comparison::lte(args),
        Expression::DurationLt(_) => comparison::duration_lt(args),
        Expression::DurationGte(_) => comparison::duration_gte(args),
        Expression::Sum(_) => arithmetic::sum(args),
        Expression::Product(_) => arithmetic::product(args),
        Expression::Subtract(_) => arithmetic::subtract(args),
        Expression::Divide(_) => arithmetic::divide(args),
        Expression::Power(_) => arithmetic::power(args),
        Expression::IntegerDivide(_) => arithmetic::integer_divide(args),
        Expression::IntegerModulus(_) => arithmetic::integer_modulus(args),
        Expression::Truncate(_) => arithmetic::truncate(args),
        Expression::Round(_) => arithmetic::round(args),
        Expression::IntegerToFloat(_) => arithmetic::integer_to_float(args),
        Expression::Min(_) => arithmetic::min(args),
        Expression::Max(_) => arithmetic::max(args),
        Expression::Gcd(_) => arithmetic::gcd(args),
        Expression::Lcm(_) => arithmetic::lcm(args),
        Expression::MathOperator(e) => math::math_operator(e, args),
        Expression::Multiple(_) => container::multiple(args),
        Expression::Ordered(_) => container::ordered(args),
        Expression::ContainerSize(_) => container::container_size(args),
        Expression::IsNull(_) => container::is_null(args),
        Expression::Index(e) => container::index(e, args, ctx),
        Expression::FieldValue(e) => container::field_value(&e.field_identifier, args),
        Expression::Random(_) => container::random(args, ctx),
        Expression::Member(_) => container::member(args),
        Expression::Delete(_) => container::delete(args),
        Expression::Contains(_) => container::contains(args),
        Expression::Substring(e) => string::substring(e, args),
        Expression::StringMatch(e) => string::string_match(e, args),
        Expression::PatternMatch(e) => string::pattern_match(e, args),
        Expression::StatsOperator(e) => statistics::stats_operator(e, args),
        other => Err(ExpressionError::internal(format!(
            "leaf class '{}' reached the operator dispatcher",
            other.qti_class_name()
        ))),
    }
}
