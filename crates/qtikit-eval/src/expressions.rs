//! Leaf expression processors
//!
//! Literals, variable/default/correct references, the random value
//! generators and `mapResponse`. These produce values without operands;
//! the engine evaluates them on first visit.

use qtikit_ast::{Expression, MathConstantName, RandomFloat, RandomInteger};
use qtikit_types::{Cardinality, QtiValue};
use rand::Rng;

use crate::context::{EvaluationContext, Variable, VariableKind};
use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::{resolve_float_ref, resolve_integer_ref};

/// Evaluate a leaf expression node.
pub(crate) fn eval_leaf(
    expression: &Expression,
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    match expression {
        Expression::BaseValue(node) => Ok(node.value.clone()),
        Expression::Null => Ok(QtiValue::Null),
        Expression::Variable(node) => {
            let variable = lookup(ctx, &node.identifier)?;
            Ok(variable.value().clone())
        }
        Expression::Default(node) => {
            let variable = lookup(ctx, &node.identifier)?;
            Ok(variable.default_value().cloned().unwrap_or(QtiValue::Null))
        }
        Expression::Correct(node) => {
            let variable = lookup(ctx, &node.identifier)?;
            require_kind("correct", variable, VariableKind::Response)?;
            Ok(variable
                .correct_response()
                .cloned()
                .unwrap_or(QtiValue::Null))
        }
        Expression::MapResponse(node) => map_response(ctx, &node.identifier),
        Expression::RandomInteger(node) => random_integer(node, ctx),
        Expression::RandomFloat(node) => random_float(node, ctx),
        Expression::MathConstant(name) => Ok(QtiValue::float(match name {
            MathConstantName::Pi => std::f64::consts::PI,
            MathConstantName::E => std::f64::consts::E,
        })),
        other => Err(ExpressionError::internal(format!(
            "operator class '{}' reached the leaf processor",
            other.qti_class_name()
        ))),
    }
}

fn lookup<'a>(
    ctx: &'a EvaluationContext,
    identifier: &str,
) -> ExpressionResult<&'a Variable> {
    ctx.get(identifier)
        .ok_or_else(|| ExpressionError::nonexistent_variable(identifier))
}

fn require_kind(
    operator: &'static str,
    variable: &Variable,
    expected: VariableKind,
) -> ExpressionResult<()> {
    if variable.kind() == expected {
        Ok(())
    } else {
        Err(ExpressionError::WrongVariableType {
            operator,
            identifier: variable.identifier().to_string(),
            expected: expected.label(),
            found: variable.kind().label(),
        })
    }
}

/// `randomInteger{min, max, step}`: a uniform draw from
/// `min, min+step, ..., min+k*step <= max`. Bad bounds are authoring
/// errors, not NULLs.
fn random_integer(node: &RandomInteger, ctx: &EvaluationContext) -> ExpressionResult<QtiValue> {
    let min = resolve_integer_ref(&node.min, ctx)?;
    let max = resolve_integer_ref(&node.max, ctx)?;
    let step = resolve_integer_ref(&node.step, ctx)?;

    if min > max {
        return Err(ExpressionError::InvalidBounds {
            operator: "randomInteger",
            message: format!("min ({min}) exceeds max ({max})"),
        });
    }
    if step < 1 {
        return Err(ExpressionError::InvalidBounds {
            operator: "randomInteger",
            message: format!("step ({step}) must be at least 1"),
        });
    }

    let reachable = (max - min) / step;
    let k = ctx.rng().gen_range(0..=reachable);
    Ok(QtiValue::integer(min + step * k))
}

/// `randomFloat{min, max}`: a uniform draw from `[min, max]`.
fn random_float(node: &RandomFloat, ctx: &EvaluationContext) -> ExpressionResult<QtiValue> {
    let min = resolve_float_ref(&node.min, ctx)?;
    let max = resolve_float_ref(&node.max, ctx)?;

    if !(min <= max) {
        return Err(ExpressionError::InvalidBounds {
            operator: "randomFloat",
            message: format!("min ({min}) exceeds max ({max})"),
        });
    }
    if min == max {
        return Ok(QtiValue::float(min));
    }
    let value = ctx.rng().gen_range(min..=max);
    Ok(QtiValue::float(value))
}

/// `mapResponse`: a response variable's value through its mapping.
///
/// Container values are de-duplicated first so each unique response
/// contributes once; a NULL value yields the default-only result. The sum
/// is clamped into the mapping bounds and the result is always a float.
fn map_response(ctx: &EvaluationContext, identifier: &str) -> ExpressionResult<QtiValue> {
    let variable = lookup(ctx, identifier)?;
    require_kind("mapResponse", variable, VariableKind::Response)?;
    let mapping = variable
        .mapping()
        .ok_or_else(|| ExpressionError::MissingMapping {
            identifier: identifier.to_string(),
        })?;

    let value = variable.value();
    let total = match variable.cardinality() {
        Cardinality::Single => {
            if value.is_null() {
                mapping.default_value
            } else {
                mapping.weight_for(value)
            }
        }
        Cardinality::Multiple | Cardinality::Ordered => {
            if value.is_null() {
                mapping.default_value
            } else {
                let unique = match value {
                    QtiValue::Multiple(c) => c.distinct().values().to_vec(),
                    QtiValue::Ordered(c) => c.distinct().values().to_vec(),
                    // Single value stored against a container declaration;
                    // treat as a one-element container.
                    other => vec![other.clone()],
                };
                unique.iter().map(|v| mapping.weight_for(v)).sum()
            }
        }
        Cardinality::Record => {
            return Err(ExpressionError::WrongVariableType {
                operator: "mapResponse",
                identifier: identifier.to_string(),
                expected: "single or container",
                found: "record",
            });
        }
    };
    Ok(QtiValue::float(mapping.clamp(total)))
}
