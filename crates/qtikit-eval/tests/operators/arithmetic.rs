//! Arithmetic operator tests: sum, product, subtract, divide, power,
//! integerDivide, integerModulus, truncate, round, integerToFloat, min,
//! max, gcd, lcm, mathOperator

use pretty_assertions::assert_eq;
use qtikit_ast::{Expression, MathFunction, MathOperator};
use qtikit_eval::{EvaluationContext, ExpressionEngine, ExpressionError};
use qtikit_types::QtiValue;

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn int(v: i32) -> Expression {
    Expression::base_value(QtiValue::integer(v))
}

fn float(v: f64) -> Expression {
    Expression::base_value(QtiValue::float(v))
}

#[test]
fn sum_promotes_only_when_needed() {
    assert_eq!(
        evaluate(&Expression::Sum(vec![int(2), int(3)])),
        QtiValue::integer(5)
    );
    assert_eq!(
        evaluate(&Expression::Sum(vec![int(2), float(3.0)])),
        QtiValue::float(5.0)
    );
}

#[test]
fn sum_accepts_container_operands() {
    let container = Expression::Multiple(vec![int(1), int(2), int(3)]);
    assert_eq!(
        evaluate(&Expression::Sum(vec![container, int(4)])),
        QtiValue::integer(10)
    );
}

#[test]
fn subtract_and_divide_preserve_operand_order() {
    assert_eq!(
        evaluate(&Expression::Subtract(vec![int(10), int(3)])),
        QtiValue::integer(7)
    );
    assert_eq!(
        evaluate(&Expression::Divide(vec![int(10), int(4)])),
        QtiValue::float(2.5)
    );
}

#[test]
fn division_by_zero_is_null_for_every_numeric_operand() {
    assert_eq!(
        evaluate(&Expression::Divide(vec![int(7), int(0)])),
        QtiValue::Null
    );
    assert_eq!(
        evaluate(&Expression::Divide(vec![float(-3.5), float(0.0)])),
        QtiValue::Null
    );
    assert_eq!(
        evaluate(&Expression::IntegerModulus(vec![int(7), int(0)])),
        QtiValue::Null
    );
    assert_eq!(
        evaluate(&Expression::IntegerDivide(vec![int(7), int(0)])),
        QtiValue::Null
    );
}

#[test]
fn null_propagates_through_arithmetic() {
    for expr in [
        Expression::Sum(vec![int(1), Expression::Null]),
        Expression::Product(vec![Expression::Null, int(2)]),
        Expression::Subtract(vec![int(1), Expression::Null]),
        Expression::Power(vec![Expression::Null, int(2)]),
    ] {
        assert_eq!(evaluate(&expr), QtiValue::Null);
    }
}

#[test]
fn rounding_follows_half_up() {
    assert_eq!(evaluate(&Expression::Round(vec![float(6.5)])), QtiValue::integer(7));
    assert_eq!(evaluate(&Expression::Round(vec![float(6.49)])), QtiValue::integer(6));
    assert_eq!(evaluate(&Expression::Round(vec![float(-6.5)])), QtiValue::integer(-6));
    assert_eq!(
        evaluate(&Expression::Round(vec![float(f64::NAN)])),
        QtiValue::Null
    );
}

#[test]
fn truncate_drops_the_fraction() {
    assert_eq!(evaluate(&Expression::Truncate(vec![float(3.9)])), QtiValue::integer(3));
    assert_eq!(evaluate(&Expression::Truncate(vec![float(-3.9)])), QtiValue::integer(-3));
}

#[test]
fn integer_to_float_widens() {
    assert_eq!(
        evaluate(&Expression::IntegerToFloat(vec![int(4)])),
        QtiValue::float(4.0)
    );
}

#[test]
fn gcd_and_lcm_zero_rules() {
    assert_eq!(
        evaluate(&Expression::Gcd(vec![int(0), int(0)])),
        QtiValue::integer(0)
    );
    assert_eq!(
        evaluate(&Expression::Gcd(vec![int(0), int(6)])),
        QtiValue::integer(6)
    );
    assert_eq!(
        evaluate(&Expression::Lcm(vec![int(6), int(4)])),
        QtiValue::integer(12)
    );
    assert_eq!(
        evaluate(&Expression::Lcm(vec![int(6), int(0)])),
        QtiValue::integer(0)
    );
}

#[test]
fn gcd_flattens_container_operands() {
    let container = Expression::Ordered(vec![int(12), int(18)]);
    assert_eq!(
        evaluate(&Expression::Gcd(vec![container, int(24)])),
        QtiValue::integer(6)
    );
}

#[test]
fn min_max_over_mixed_operands() {
    assert_eq!(
        evaluate(&Expression::Min(vec![int(3), int(1), int(2)])),
        QtiValue::integer(1)
    );
    assert_eq!(
        evaluate(&Expression::Max(vec![int(3), float(3.5)])),
        QtiValue::float(3.5)
    );
}

#[test]
fn math_operator_through_the_engine() {
    let expr = Expression::MathOperator(MathOperator {
        name: MathFunction::Pow,
        operands: vec![float(2.0), float(8.0)],
    });
    assert_eq!(evaluate(&expr), QtiValue::float(256.0));
}

#[test]
fn integer_division_requires_integers() {
    let expr = Expression::IntegerDivide(vec![float(7.0), int(2)]);
    let result = ExpressionEngine::new().evaluate(&expr, &EvaluationContext::with_rng_seed(0));
    assert!(matches!(result, Err(ExpressionError::WrongBaseType { .. })));
}
