//! `statsOperator`
//!
//! Mean, variance and standard deviation over a numeric container. Sample
//! statistics need more than one element; every degenerate input (NULL
//! container, NULL/non-numeric member) is NULL rather than an error.

use qtikit_ast::{StatsOperator, Statistics};
use qtikit_types::QtiValue;

use crate::error::ExpressionResult;

fn numeric_elements(operand: &QtiValue) -> Option<Vec<f64>> {
    let values = operand.container_values()?;
    values.iter().map(QtiValue::as_f64).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64], sample: bool) -> Option<f64> {
    let n = values.len();
    if n == 0 || (sample && n < 2) {
        return None;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    let divisor = if sample { n - 1 } else { n } as f64;
    Some(sum_sq / divisor)
}

/// `statsOperator{name}` over one container operand.
pub(crate) fn stats_operator(
    expr: &StatsOperator,
    operands: &[QtiValue],
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let Some(values) = numeric_elements(operand) else {
        return Ok(QtiValue::Null);
    };

    let result = match expr.name {
        Statistics::Mean => Some(mean(&values)),
        Statistics::SampleVariance => variance(&values, true),
        Statistics::SampleSD => variance(&values, true).map(f64::sqrt),
        Statistics::PopVariance => variance(&values, false),
        Statistics::PopSD => variance(&values, false).map(f64::sqrt),
    };
    Ok(result.map_or(QtiValue::Null, QtiValue::float))
}
