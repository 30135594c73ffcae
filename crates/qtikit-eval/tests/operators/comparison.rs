//! Comparison operator tests: match, equal, relational family, durations

use pretty_assertions::assert_eq;
use qtikit_ast::{Equal, Expression, ToleranceMode};
use qtikit_eval::{EvaluationContext, ExpressionEngine};
use qtikit_types::{QtiDuration, QtiValue};

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn int(v: i32) -> Expression {
    Expression::base_value(QtiValue::integer(v))
}

fn ident(v: &str) -> Expression {
    Expression::base_value(QtiValue::identifier(v))
}

#[test]
fn match_compares_exactly() {
    assert_eq!(
        evaluate(&Expression::Match(vec![ident("A"), ident("A")])),
        QtiValue::boolean(true)
    );
    assert_eq!(
        evaluate(&Expression::Match(vec![ident("A"), ident("B")])),
        QtiValue::boolean(false)
    );
    assert_eq!(
        evaluate(&Expression::Match(vec![ident("A"), Expression::Null])),
        QtiValue::Null
    );
}

#[test]
fn match_on_multiple_containers_is_multiset_equality() {
    let left = Expression::Multiple(vec![ident("A"), ident("B"), ident("B")]);
    let right = Expression::Multiple(vec![ident("B"), ident("A"), ident("B")]);
    assert_eq!(
        evaluate(&Expression::Match(vec![left, right])),
        QtiValue::boolean(true)
    );
}

#[test]
fn match_on_ordered_containers_is_positional() {
    let left = Expression::Ordered(vec![ident("A"), ident("B")]);
    let right = Expression::Ordered(vec![ident("B"), ident("A")]);
    assert_eq!(
        evaluate(&Expression::Match(vec![left, right])),
        QtiValue::boolean(false)
    );
}

#[test]
fn relational_family() {
    assert_eq!(evaluate(&Expression::Gt(vec![int(3), int(2)])), QtiValue::boolean(true));
    assert_eq!(evaluate(&Expression::Gte(vec![int(2), int(2)])), QtiValue::boolean(true));
    assert_eq!(evaluate(&Expression::Lt(vec![int(3), int(2)])), QtiValue::boolean(false));
    assert_eq!(evaluate(&Expression::Lte(vec![int(2), int(3)])), QtiValue::boolean(true));
    assert_eq!(
        evaluate(&Expression::Gt(vec![int(1), Expression::Null])),
        QtiValue::Null
    );
}

#[test]
fn equal_with_absolute_tolerance() {
    let expr = Expression::Equal(Equal {
        tolerance_mode: ToleranceMode::Absolute,
        tolerance: vec![0.1.into()],
        include_lower_bound: true,
        include_upper_bound: true,
        operands: vec![
            Expression::base_value(QtiValue::float(1.0)),
            Expression::base_value(QtiValue::float(1.05)),
        ],
    });
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));
}

#[test]
fn duration_comparisons() {
    let d = |s: &str| Expression::base_value(QtiValue::duration(QtiDuration::parse(s).unwrap()));
    assert_eq!(
        evaluate(&Expression::DurationLt(vec![d("PT1M"), d("PT90S")])),
        QtiValue::boolean(true)
    );
    assert_eq!(
        evaluate(&Expression::DurationGte(vec![d("PT90S"), d("PT1M30S")])),
        QtiValue::boolean(true)
    );
}
