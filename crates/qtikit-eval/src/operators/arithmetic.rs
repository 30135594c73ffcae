//! Arithmetic operators
//!
//! Numeric promotion rule: when every operand is an integer the result is
//! an integer, otherwise all operands promote to float. Data-dependent
//! degenerate cases (NULL operands, division by zero, non-finite results)
//! produce NULL; integer overflow is a typed error because it indicates a
//! value outside the QTI integer range rather than missing data.

use qtikit_types::QtiValue;

use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::{all_integers, any_null, flatten_integers, flatten_numeric};

const I32_RANGE: std::ops::RangeInclusive<f64> = -2_147_483_647.0..=2_147_483_647.0;

fn int_pair(operator: &'static str, operands: &[QtiValue]) -> ExpressionResult<(i32, i32)> {
    let read = |value: &QtiValue| {
        value.as_integer().ok_or_else(|| ExpressionError::WrongBaseType {
            operator,
            found: value.base_type().unwrap_or(qtikit_types::BaseType::Float),
        })
    };
    Ok((read(&operands[0])?, read(&operands[1])?))
}

fn float_pair(operator: &'static str, operands: &[QtiValue]) -> ExpressionResult<(f64, f64)> {
    let read = |value: &QtiValue| {
        value.as_f64().ok_or_else(|| ExpressionError::WrongBaseType {
            operator,
            found: value.base_type().unwrap_or(qtikit_types::BaseType::String),
        })
    };
    Ok((read(&operands[0])?, read(&operands[1])?))
}

/// `sum`: n-ary addition over singles and numeric containers.
pub(crate) fn sum(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let Some(values) = flatten_numeric("sum", operands)? else {
        return Ok(QtiValue::Null);
    };
    if all_integers(&values) {
        let mut total: i32 = 0;
        for value in &values {
            total = value
                .as_integer()
                .and_then(|v| total.checked_add(v))
                .ok_or(ExpressionError::Overflow { operator: "sum" })?;
        }
        Ok(QtiValue::integer(total))
    } else {
        let total: f64 = values.iter().filter_map(QtiValue::as_f64).sum();
        Ok(QtiValue::float(total))
    }
}

/// `product`: n-ary multiplication over singles and numeric containers.
pub(crate) fn product(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let Some(values) = flatten_numeric("product", operands)? else {
        return Ok(QtiValue::Null);
    };
    if all_integers(&values) {
        let mut total: i32 = 1;
        for value in &values {
            total = value
                .as_integer()
                .and_then(|v| total.checked_mul(v))
                .ok_or(ExpressionError::Overflow { operator: "product" })?;
        }
        Ok(QtiValue::integer(total))
    } else {
        let total: f64 = values.iter().filter_map(QtiValue::as_f64).product();
        Ok(QtiValue::float(total))
    }
}

/// `subtract`: first operand minus second, document order.
pub(crate) fn subtract(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    if all_integers(operands) {
        let (a, b) = int_pair("subtract", operands)?;
        a.checked_sub(b)
            .map(QtiValue::integer)
            .ok_or(ExpressionError::Overflow {
                operator: "subtract",
            })
    } else {
        let (a, b) = float_pair("subtract", operands)?;
        Ok(QtiValue::float(a - b))
    }
}

/// `divide`: always a float; a zero divisor or a non-finite quotient is
/// NULL, never an error.
pub(crate) fn divide(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = float_pair("divide", operands)?;
    if b == 0.0 {
        return Ok(QtiValue::Null);
    }
    let quotient = a / b;
    if quotient.is_finite() {
        Ok(QtiValue::float(quotient))
    } else {
        Ok(QtiValue::Null)
    }
}

/// `power`: integer result for integer base and non-negative integer
/// exponent, float otherwise; non-finite/NaN results are NULL.
pub(crate) fn power(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    if all_integers(operands) {
        let (base, exponent) = int_pair("power", operands)?;
        if exponent >= 0 {
            return match u32::try_from(exponent)
                .ok()
                .and_then(|e| base.checked_pow(e))
            {
                Some(result) => Ok(QtiValue::integer(result)),
                None => Err(ExpressionError::Overflow { operator: "power" }),
            };
        }
    }
    let (base, exponent) = float_pair("power", operands)?;
    let raised = base.powf(exponent);
    if raised.is_finite() {
        Ok(QtiValue::float(raised))
    } else {
        Ok(QtiValue::Null)
    }
}

/// `integerDivide`: truncated integer quotient; division by zero is NULL.
pub(crate) fn integer_divide(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = int_pair("integerDivide", operands)?;
    if b == 0 {
        return Ok(QtiValue::Null);
    }
    a.checked_div(b)
        .map(QtiValue::integer)
        .ok_or(ExpressionError::Overflow {
            operator: "integerDivide",
        })
}

/// `integerModulus`: truncated-division remainder; modulus zero is NULL.
pub(crate) fn integer_modulus(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (a, b) = int_pair("integerModulus", operands)?;
    if b == 0 {
        return Ok(QtiValue::Null);
    }
    Ok(QtiValue::integer(a.wrapping_rem(b)))
}

/// `truncate`: toward zero. NaN is NULL; infinities pass through as
/// floats since no integer can carry them.
pub(crate) fn truncate(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    round_like("truncate", operands, f64::trunc)
}

/// `round`: round-half-up, so the result is `n` for inputs in
/// `[n - 0.5, n + 0.5)`. NaN is NULL; infinities pass through.
pub(crate) fn round(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    round_like("round", operands, |v| (v + 0.5).floor())
}

fn round_like(
    operator: &'static str,
    operands: &[QtiValue],
    apply: impl Fn(f64) -> f64,
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let value = operand.as_f64().ok_or_else(|| ExpressionError::WrongBaseType {
        operator,
        found: operand.base_type().unwrap_or(qtikit_types::BaseType::String),
    })?;
    if value.is_nan() {
        return Ok(QtiValue::Null);
    }
    if value.is_infinite() {
        return Ok(QtiValue::float(value));
    }
    let result = apply(value);
    if I32_RANGE.contains(&result) {
        Ok(QtiValue::integer(result as i32))
    } else {
        Err(ExpressionError::Overflow { operator })
    }
}

/// `integerToFloat`: widen an integer.
pub(crate) fn integer_to_float(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    match operand.as_integer() {
        Some(i) => Ok(QtiValue::float(f64::from(i))),
        None => Err(ExpressionError::WrongBaseType {
            operator: "integerToFloat",
            found: operand.base_type().unwrap_or(qtikit_types::BaseType::Float),
        }),
    }
}

/// `min` over singles and numeric containers, flattened.
pub(crate) fn min(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    extremum("min", operands, |best, candidate| candidate < best)
}

/// `max` over singles and numeric containers, flattened.
pub(crate) fn max(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    extremum("max", operands, |best, candidate| candidate > best)
}

fn extremum(
    operator: &'static str,
    operands: &[QtiValue],
    better: impl Fn(f64, f64) -> bool,
) -> ExpressionResult<QtiValue> {
    let Some(values) = flatten_numeric(operator, operands)? else {
        return Ok(QtiValue::Null);
    };
    let integers_only = all_integers(&values);
    let mut best: Option<f64> = None;
    for value in &values {
        let candidate = value.as_f64().unwrap_or(f64::NAN);
        best = Some(match best {
            Some(current) if !better(current, candidate) => current,
            _ => candidate,
        });
    }
    match best {
        None => Ok(QtiValue::Null),
        Some(v) if integers_only => Ok(QtiValue::integer(v as i32)),
        Some(v) => Ok(QtiValue::float(v)),
    }
}

fn gcd_i64(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `gcd` over 1..n integer operands, containers flattened. Zeros are
/// skipped in the accumulation; all-zero input gives 0.
pub(crate) fn gcd(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let Some(values) = flatten_integers("gcd", operands)? else {
        return Ok(QtiValue::Null);
    };
    let result = values
        .iter()
        .filter(|v| **v != 0)
        .fold(0i64, |acc, v| gcd_i64(acc, i64::from(*v)));
    Ok(QtiValue::integer(result as i32))
}

/// `lcm` over 1..n integer operands, containers flattened. Any zero
/// operand makes the result 0.
pub(crate) fn lcm(operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    let Some(values) = flatten_integers("lcm", operands)? else {
        return Ok(QtiValue::Null);
    };
    if values.iter().any(|v| *v == 0) {
        return Ok(QtiValue::integer(0));
    }
    let mut acc: i64 = 1;
    for value in values {
        let value = i64::from(value).abs();
        acc = acc / gcd_i64(acc, value) * value;
        if acc > i64::from(i32::MAX) {
            return Err(ExpressionError::Overflow { operator: "lcm" });
        }
    }
    Ok(QtiValue::integer(acc as i32))
}
