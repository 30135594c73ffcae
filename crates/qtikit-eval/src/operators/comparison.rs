//! Comparison operators
//!
//! Relational operators over numeric singles, exact matching over
//! arbitrary (same-typed) values, tolerance-based equality, duration
//! comparisons and the `inside` area test. NULL operands make every
//! comparison NULL.

use log::warn;
use qtikit_ast::{Equal, EqualRounded, Inside, RoundingMode, ToleranceMode};
use qtikit_types::{BaseType, QtiValue};

use crate::context::EvaluationContext;
use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::{any_null, resolve_float_ref, resolve_integer_ref};

fn numeric_pair(operator: &'static str, operands: &[QtiValue]) -> ExpressionResult<(f64, f64)> {
    let read = |value: &QtiValue| {
        value.as_f64().ok_or_else(|| ExpressionError::WrongBaseType {
            operator,
            found: value.base_type().unwrap_or(BaseType::String),
        })
    };
    Ok((read(&operands[0])?, read(&operands[1])?))
}

macro_rules! relational {
    ($name:ident, $qti:literal, $op:tt) => {
        #[doc = concat!("`", $qti, "` over two numeric single values.")]
        pub(crate) fn $name(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
            if any_null(operands) {
                return Ok(QtiValue::Null);
            }
            let (a, b) = numeric_pair($qti, operands)?;
            Ok(QtiValue::boolean(a $op b))
        }
    };
}

relational!(gt, "gt", >);
relational!(gte, "gte", >=);
relational!(lt, "lt", <);
relational!(lte, "lte", <=);

/// `match`: exact value equality between two operands of the same
/// cardinality and base type.
pub(crate) fn match_values(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = (&operands[0], &operands[1]);

    if a.cardinality() != b.cardinality() {
        return Err(ExpressionError::WrongCardinality {
            operator: "match",
            found: b.cardinality().unwrap_or(qtikit_types::Cardinality::Single),
        });
    }
    if a.base_type() != b.base_type() {
        return Err(ExpressionError::WrongBaseType {
            operator: "match",
            found: b.base_type().unwrap_or(BaseType::String),
        });
    }
    if matches!(a.base_type(), Some(BaseType::Float | BaseType::Duration)) {
        // The source vocabulary discourages exact matching on these base
        // types without forbidding it.
        warn!(
            "match applied to {} operands; results depend on exact value identity",
            a.base_type().map(|b| b.qti_name()).unwrap_or("unknown")
        );
    }
    Ok(QtiValue::boolean(a == b))
}

/// `equal`: numeric equality under a tolerance policy. The tolerance
/// window is anchored on the first operand and tested against the second.
pub(crate) fn equal(
    expr: &Equal,
    operands: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (first, second) = numeric_pair("equal", operands)?;

    if expr.tolerance_mode == ToleranceMode::Exact {
        return Ok(QtiValue::boolean(first == second));
    }

    let (t0, t1) = match expr.tolerance.as_slice() {
        [t] => {
            let t = resolve_float_ref(t, ctx)?;
            (t, t)
        }
        [t0, t1] => (resolve_float_ref(t0, ctx)?, resolve_float_ref(t1, ctx)?),
        _ => {
            return Err(ExpressionError::logic(
                "equal",
                "absolute and relative tolerance modes need one or two tolerance bounds",
            ));
        }
    };

    let (lower, upper) = if expr.tolerance_mode == ToleranceMode::Absolute {
        (first - t0, first + t1)
    } else {
        (first * (1.0 - t0 / 100.0), first * (1.0 + t1 / 100.0))
    };

    let above_lower = if expr.include_lower_bound {
        second >= lower
    } else {
        second > lower
    };
    let below_upper = if expr.include_upper_bound {
        second <= upper
    } else {
        second < upper
    };
    Ok(QtiValue::boolean(above_lower && below_upper))
}

fn round_to_significant_figures(value: f64, figures: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor();
    let scale = 10f64.powf(f64::from(figures - 1) - magnitude);
    (value * scale).round() / scale
}

fn round_to_decimal_places(value: f64, places: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// `equalRounded`: equality after rounding both operands to the declared
/// number of significant figures or decimal places.
pub(crate) fn equal_rounded(
    expr: &EqualRounded,
    operands: &[QtiValue],
    ctx: &EvaluationContext,
) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (first, second) = numeric_pair("equalRounded", operands)?;
    let figures = resolve_integer_ref(&expr.figures, ctx)?;

    let rounded = |v: f64| match expr.rounding_mode {
        RoundingMode::SignificantFigures => round_to_significant_figures(v, figures),
        RoundingMode::DecimalPlaces => round_to_decimal_places(v, figures),
    };

    if expr.rounding_mode == RoundingMode::SignificantFigures && figures < 1 {
        return Err(ExpressionError::logic(
            "equalRounded",
            "significantFigures rounding needs at least one figure",
        ));
    }
    if expr.rounding_mode == RoundingMode::DecimalPlaces && figures < 0 {
        return Err(ExpressionError::logic(
            "equalRounded",
            "decimalPlaces rounding cannot use a negative count",
        ));
    }

    Ok(QtiValue::boolean(rounded(first) == rounded(second)))
}

fn duration_pair(operator: &'static str, operands: &[QtiValue]) -> ExpressionResult<(i64, i64)> {
    let read = |value: &QtiValue| {
        value
            .as_duration()
            .map(|d| d.truncated_seconds())
            .ok_or_else(|| ExpressionError::WrongBaseType {
                operator,
                found: value.base_type().unwrap_or(BaseType::String),
            })
    };
    Ok((read(&operands[0])?, read(&operands[1])?))
}

/// `durationLT`: strict order on whole-second totals.
pub(crate) fn duration_lt(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = duration_pair("durationLT", operands)?;
    Ok(QtiValue::boolean(a < b))
}

/// `durationGTE`: non-strict order on whole-second totals.
pub(crate) fn duration_gte(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = duration_pair("durationGTE", operands)?;
    Ok(QtiValue::boolean(a >= b))
}

/// `inside`: whether the operand point (or any member of a point
/// container) lies inside the declared area.
pub(crate) fn inside(expr: &Inside, operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let hit = match operand {
        QtiValue::Point(p) => expr.area.contains_point(p),
        QtiValue::Multiple(_) | QtiValue::Ordered(_) => operand
            .container_values()
            .into_iter()
            .flatten()
            .filter_map(QtiValue::as_point)
            .any(|p| expr.area.contains_point(p)),
        other => {
            return Err(ExpressionError::WrongBaseType {
                operator: "inside",
                found: other.base_type().unwrap_or(BaseType::String),
            });
        }
    };
    Ok(QtiValue::boolean(hit))
}
