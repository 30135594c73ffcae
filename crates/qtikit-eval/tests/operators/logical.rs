//! Logical operator tests: and, or, not, anyN

use pretty_assertions::assert_eq;
use qtikit_ast::{AnyN, Expression};
use qtikit_eval::{EvaluationContext, ExpressionEngine};
use qtikit_types::QtiValue;

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn b(value: bool) -> Expression {
    Expression::base_value(QtiValue::boolean(value))
}

#[test]
fn and_short_circuits_null_against_false() {
    let expr = Expression::And(vec![b(false), Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::boolean(false));

    let expr = Expression::And(vec![b(true), Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::Null);

    let expr = Expression::And(vec![b(true), b(true), b(true)]);
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));
}

#[test]
fn or_short_circuits_null_against_true() {
    let expr = Expression::Or(vec![b(true), Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));

    let expr = Expression::Or(vec![b(false), Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::Null);
}

#[test]
fn not_wraps_nested_expressions() {
    let expr = Expression::Not(vec![Expression::And(vec![b(true), b(false)])]);
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));
}

#[test]
fn any_n_counts_trues_within_window() {
    let expr = Expression::AnyN(AnyN {
        min: 2.into(),
        max: 3.into(),
        operands: vec![b(true), b(true), b(false), b(false)],
    });
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));

    let expr = Expression::AnyN(AnyN {
        min: 2.into(),
        max: 3.into(),
        operands: vec![b(true), b(false), b(false), b(false)],
    });
    assert_eq!(evaluate(&expr), QtiValue::boolean(false));
}

#[test]
fn non_boolean_operands_are_rejected() {
    let expr = Expression::And(vec![Expression::base_value(QtiValue::integer(1))]);
    assert!(
        ExpressionEngine::new()
            .evaluate(&expr, &EvaluationContext::with_rng_seed(0))
            .is_err()
    );
}
