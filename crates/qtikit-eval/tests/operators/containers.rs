//! Container operator tests: constructors, containerSize, isNull, index,
//! fieldValue, member, delete, contains, random

use pretty_assertions::assert_eq;
use qtikit_ast::{Expression, Index};
use qtikit_eval::{EvaluationContext, ExpressionEngine};
use qtikit_types::QtiValue;

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn ident(v: &str) -> Expression {
    Expression::base_value(QtiValue::identifier(v))
}

fn int(v: i32) -> Expression {
    Expression::base_value(QtiValue::integer(v))
}

#[test]
fn constructors_skip_null_subexpressions() {
    let expr = Expression::ContainerSize(vec![Expression::Multiple(vec![
        ident("A"),
        Expression::Null,
        ident("B"),
    ])]);
    assert_eq!(evaluate(&expr), QtiValue::integer(2));
}

#[test]
fn constructors_flatten_one_level() {
    let nested = Expression::Ordered(vec![ident("B"), ident("C")]);
    let expr = Expression::ContainerSize(vec![Expression::Ordered(vec![ident("A"), nested])]);
    assert_eq!(evaluate(&expr), QtiValue::integer(3));
}

#[test]
fn all_null_constructor_is_null() {
    let expr = Expression::Multiple(vec![Expression::Null, Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::Null);
    assert_eq!(
        evaluate(&Expression::IsNull(vec![Expression::Multiple(vec![])])),
        QtiValue::boolean(true)
    );
}

#[test]
fn container_size_of_null_is_zero() {
    assert_eq!(
        evaluate(&Expression::ContainerSize(vec![Expression::Null])),
        QtiValue::integer(0)
    );
}

#[test]
fn index_is_one_based_and_total() {
    let source = || Expression::Ordered(vec![ident("A"), ident("B"), ident("C")]);
    let at = |n: i32| {
        Expression::Index(Index {
            n: n.into(),
            operands: vec![source()],
        })
    };
    assert_eq!(evaluate(&at(2)), QtiValue::identifier("B"));
    assert_eq!(evaluate(&at(5)), QtiValue::Null);
    assert_eq!(evaluate(&at(0)), QtiValue::Null);
}

#[test]
fn member_and_delete_work_through_the_engine() {
    let bag = || Expression::Multiple(vec![ident("A"), ident("B"), ident("B")]);
    assert_eq!(
        evaluate(&Expression::Member(vec![ident("B"), bag()])),
        QtiValue::boolean(true)
    );
    let expr = Expression::ContainerSize(vec![Expression::Delete(vec![ident("B"), bag()])]);
    assert_eq!(evaluate(&expr), QtiValue::integer(1));
}

#[test]
fn contains_multiset_and_subsequence() {
    let big = || Expression::Multiple(vec![ident("A"), ident("B"), ident("B")]);
    let small = Expression::Multiple(vec![ident("B"), ident("B")]);
    assert_eq!(
        evaluate(&Expression::Contains(vec![big(), small])),
        QtiValue::boolean(true)
    );

    let seq = || Expression::Ordered(vec![int(1), int(2), int(3)]);
    let gap = Expression::Ordered(vec![int(1), int(3)]);
    assert_eq!(
        evaluate(&Expression::Contains(vec![seq(), gap])),
        QtiValue::boolean(false)
    );
}

#[test]
fn random_picks_a_member() {
    let expr = Expression::Random(vec![Expression::Multiple(vec![
        ident("A"),
        ident("B"),
        ident("C"),
    ])]);
    for _ in 0..10 {
        let value = evaluate(&expr);
        assert!(matches!(
            value,
            QtiValue::Identifier(ref id) if ["A", "B", "C"].contains(&id.as_str())
        ));
    }
}

#[test]
fn delete_on_null_is_null() {
    let expr = Expression::Delete(vec![ident("A"), Expression::Null]);
    assert_eq!(evaluate(&expr), QtiValue::Null);
}
