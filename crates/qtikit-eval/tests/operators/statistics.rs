//! statsOperator tests through the engine

use pretty_assertions::assert_eq;
use qtikit_ast::{Expression, StatsOperator, Statistics};
use qtikit_eval::{EvaluationContext, ExpressionEngine};
use qtikit_types::QtiValue;

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn stats(name: Statistics, values: &[f64]) -> Expression {
    Expression::StatsOperator(StatsOperator {
        name,
        operands: vec![Expression::Multiple(
            values
                .iter()
                .map(|v| Expression::base_value(QtiValue::float(*v)))
                .collect(),
        )],
    })
}

#[test]
fn mean_over_a_container() {
    assert_eq!(
        evaluate(&stats(Statistics::Mean, &[1.0, 2.0, 3.0])),
        QtiValue::float(2.0)
    );
}

#[test]
fn population_and_sample_spread() {
    let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_eq!(
        evaluate(&stats(Statistics::PopSD, &data)),
        QtiValue::float(2.0)
    );
    assert_eq!(
        evaluate(&stats(Statistics::SampleVariance, &data)),
        QtiValue::float(32.0 / 7.0)
    );
}

#[test]
fn sample_statistics_need_more_than_one_element() {
    assert_eq!(
        evaluate(&stats(Statistics::SampleSD, &[42.0])),
        QtiValue::Null
    );
}

#[test]
fn null_container_gives_null() {
    let expr = Expression::StatsOperator(StatsOperator {
        name: Statistics::Mean,
        operands: vec![Expression::Null],
    });
    assert_eq!(evaluate(&expr), QtiValue::Null);
}
