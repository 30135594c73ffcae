//! Logical operators
//!
//! `and`, `or`, `not` and `anyN` over single boolean operands, with the
//! QTI NULL-propagation rules: a determinate operand short-circuits NULL
//! (`and(false, NULL)` is false, `or(true, NULL)` is true).

use qtikit_ast::AnyN;
use qtikit_types::QtiValue;

use crate::context::EvaluationContext;
use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::resolve_integer_ref;

/// `and`: false if any operand is false; otherwise NULL if any operand is
/// NULL; otherwise true.
pub(crate) fn and(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let mut saw_null = false;
    for operand in operands {
        match operand {
            _ if operand.is_null() => saw_null = true,
            QtiValue::Boolean(false) => return Ok(QtiValue::boolean(false)),
            QtiValue::Boolean(true) => {}
            other => return Err(wrong_type("and", other)),
        }
    }
    if saw_null {
        Ok(QtiValue::Null)
    } else {
        Ok(QtiValue::boolean(true))
    }
}

/// `or`: true if any operand is true; otherwise NULL if any operand is
/// NULL; otherwise false.
pub(crate) fn or(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let mut saw_null = false;
    for operand in operands {
        match operand {
            _ if operand.is_null() => saw_null = true,
            QtiValue::Boolean(true) => return Ok(QtiValue::boolean(true)),
            QtiValue::Boolean(false) => {}
            other => return Err(wrong_type("or", other)),
        }
    }
    if saw_null {
        Ok(QtiValue::Null)
    } else {
        Ok(QtiValue::boolean(false))
    }
}

/// `not`: NULL in, NULL out.
pub(crate) fn not(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    match operand {
        QtiValue::Boolean(b) => Ok(QtiValue::boolean(!b)),
        other => Err(wrong_type("not", other)),
    }
}

/// `anyN`: whether the number of true operands lies in `[min, max]`.
///
/// With `t` determinate trues and `u` NULLs the eventual count is anywhere
/// in `[t, t+u]`: the result is true when the whole range fits the window,
/// false when the range cannot reach it, NULL otherwise.
pub(crate) fn any_n(
    expr: &AnyN,
    operands: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    let min = resolve_integer_ref(&expr.min, ctx)?;
    let max = resolve_integer_ref(&expr.max, ctx)?;

    let mut trues: i32 = 0;
    let mut nulls: i32 = 0;
    for operand in operands {
        match operand {
            _ if operand.is_null() => nulls += 1,
            QtiValue::Boolean(true) => trues += 1,
            QtiValue::Boolean(false) => {}
            other => return Err(wrong_type("anyN", other)),
        }
    }

    if trues > max || trues + nulls < min {
        Ok(QtiValue::boolean(false))
    } else if trues >= min && trues + nulls <= max {
        Ok(QtiValue::boolean(true))
    } else {
        Ok(QtiValue::Null)
    }
}

fn wrong_type(operator: &'static str, operand: &QtiValue) -> ExpressionError {
    ExpressionError::WrongBaseType {
        operator,
        found: operand.base_type().unwrap_or(qtikit_types::BaseType::String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn b(value: bool) -> QtiValue {
        QtiValue::boolean(value)
    }

    #[rstest]
    #[case(vec![b(true), b(true)], b(true))]
    #[case(vec![b(true), b(false)], b(false))]
    #[case(vec![b(false), QtiValue::Null], b(false))]
    #[case(vec![b(true), QtiValue::Null], QtiValue::Null)]
    #[case(vec![QtiValue::Null], QtiValue::Null)]
    fn and_truth_table(#[case] operands: Vec<QtiValue>, #[case] expected: QtiValue) {
        assert_eq!(and(&operands).unwrap(), expected);
    }

    #[rstest]
    #[case(vec![b(false), b(false)], b(false))]
    #[case(vec![b(false), b(true)], b(true))]
    #[case(vec![b(true), QtiValue::Null], b(true))]
    #[case(vec![b(false), QtiValue::Null], QtiValue::Null)]
    fn or_truth_table(#[case] operands: Vec<QtiValue>, #[case] expected: QtiValue) {
        assert_eq!(or(&operands).unwrap(), expected);
    }

    #[test]
    fn not_inverts_and_propagates_null() {
        assert_eq!(not(&[b(true)]).unwrap(), b(false));
        assert_eq!(not(&[b(false)]).unwrap(), b(true));
        assert_eq!(not(&[QtiValue::Null]).unwrap(), QtiValue::Null);
    }

    #[test]
    fn any_n_window() {
        let ctx = EvaluationContext::with_rng_seed(0);
        let expr = AnyN {
            min: 1.into(),
            max: 2.into(),
            operands: vec![],
        };
        // Two trues with no nulls: inside the window.
        assert_eq!(
            any_n(&expr, &[b(true), b(true), b(false)], &ctx).unwrap(),
            b(true)
        );
        // Three trues: above the window whatever happens.
        assert_eq!(
            any_n(&expr, &[b(true), b(true), b(true)], &ctx).unwrap(),
            b(false)
        );
        // One null could push the count past max: indeterminate.
        assert_eq!(
            any_n(&expr, &[b(true), b(true), QtiValue::Null], &ctx).unwrap(),
            QtiValue::Null
        );
        // A null could supply the one needed true: indeterminate.
        assert_eq!(
            any_n(&expr, &[QtiValue::Null, b(false)], &ctx).unwrap(),
            QtiValue::Null
        );
        // No trues possible at all: false.
        assert_eq!(any_n(&expr, &[b(false), b(false)], &ctx).unwrap(), b(false));
    }
}
