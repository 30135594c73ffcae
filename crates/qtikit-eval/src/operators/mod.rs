//! Operator implementations
//!
//! One processor per QTI operator class, organized by family. Processors
//! receive their operands already evaluated (and already checked against
//! the class signature) and are pure functions: the context is only read,
//! and only by the few operators whose attributes may reference template
//! variables.

pub mod arithmetic;
pub mod comparison;
pub mod container;
pub mod logical;
pub mod math;
pub mod statistics;
pub mod string;

use qtikit_ast::{FloatOrVariableRef, IntegerOrVariableRef};
use qtikit_types::QtiValue;

use crate::context::EvaluationContext;
use crate::error::{ExpressionError, ExpressionResult};

/// Whether any operand is NULL (or an empty container/string, which QTI
/// treats the same for propagation).
pub(crate) fn any_null(operands: &[QtiValue]) -> bool {
    operands.iter().any(QtiValue::is_null)
}

/// Resolve an integer attribute that may reference a template variable.
pub(crate) fn resolve_integer_ref(
    attr: &IntegerOrVariableRef,
    ctx: &EvaluationContext,
) -> ExpressionResult<i32> {
    match attr {
        IntegerOrVariableRef::Value(v) => Ok(*v),
        IntegerOrVariableRef::Variable(identifier) => {
            let variable = ctx
                .get(identifier)
                .ok_or_else(|| ExpressionError::nonexistent_variable(identifier.clone()))?;
            variable.value().as_integer().ok_or_else(|| {
                ExpressionError::WrongVariableBaseType {
                    identifier: identifier.clone(),
                    expected: "integer",
                }
            })
        }
    }
}

/// Resolve a float attribute that may reference a template variable.
/// Integer-valued variables promote.
pub(crate) fn resolve_float_ref(
    attr: &FloatOrVariableRef,
    ctx: &EvaluationContext,
) -> ExpressionResult<f64> {
    match attr {
        FloatOrVariableRef::Value(v) => Ok(*v),
        FloatOrVariableRef::Variable(identifier) => {
            let variable = ctx
                .get(identifier)
                .ok_or_else(|| ExpressionError::nonexistent_variable(identifier.clone()))?;
            variable.value().as_f64().ok_or_else(|| {
                ExpressionError::WrongVariableBaseType {
                    identifier: identifier.clone(),
                    expected: "float",
                }
            })
        }
    }
}

/// Flatten single/multiple/ordered numeric operands into one value list.
/// `None` signals NULL propagation: some operand was NULL or empty.
pub(crate) fn flatten_numeric(
    operator: &'static str,
    operands: &[QtiValue],
) -> ExpressionResult<Option<Vec<QtiValue>>> {
    let mut flat = Vec::with_capacity(operands.len());
    for operand in operands {
        if operand.is_null() {
            return Ok(None);
        }
        match operand {
            QtiValue::Integer(_) | QtiValue::Float(_) => flat.push(operand.clone()),
            QtiValue::Multiple(c) => flat.extend_from_slice(c.values()),
            QtiValue::Ordered(c) => flat.extend_from_slice(c.values()),
            other => {
                return Err(ExpressionError::WrongBaseType {
                    operator,
                    found: other.base_type().unwrap_or(qtikit_types::BaseType::String),
                });
            }
        }
    }
    Ok(Some(flat))
}

/// Flatten integer operands the same way, decoding to `i32`.
pub(crate) fn flatten_integers(
    operator: &'static str,
    operands: &[QtiValue],
) -> ExpressionResult<Option<Vec<i32>>> {
    let Some(values) = flatten_numeric(operator, operands)? else {
        return Ok(None);
    };
    let mut integers = Vec::with_capacity(values.len());
    for value in values {
        match value.as_integer() {
            Some(i) => integers.push(i),
            None => {
                return Err(ExpressionError::WrongBaseType {
                    operator,
                    found: value.base_type().unwrap_or(qtikit_types::BaseType::Float),
                });
            }
        }
    }
    Ok(Some(integers))
}

/// Whether every value in the list is an integer, the test behind the
/// numeric promotion rule (all-integer operands give an integer result).
pub(crate) fn all_integers(values: &[QtiValue]) -> bool {
    values.iter().all(|v| matches!(v, QtiValue::Integer(_)))
}
