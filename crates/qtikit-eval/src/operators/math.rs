//! The `mathOperator` function catalog
//!
//! A thin layer over the f64 math library: one or two numeric single
//! operands in, a float out. NULL operands give NULL; domain errors
//! surface as the IEEE result (NaN) rather than being masked.

use qtikit_ast::{MathFunction, MathOperator};
use qtikit_types::QtiValue;

use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::any_null;

/// `mathOperator{name}` applied to its evaluated operands.
pub(crate) fn math_operator(
    expr: &MathOperator,
    operands: &[QtiValue],
) -> ExpressionResult<QtiValue> {
    let expected = if expr.name.is_binary() { 2 } else { 1 };
    if operands.len() != expected {
        return Err(ExpressionError::operand_count(
            "mathOperator",
            expected.to_string(),
            operands.len(),
        ));
    }
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }

    let read = |value: &QtiValue| {
        value.as_f64().ok_or_else(|| ExpressionError::WrongBaseType {
            operator: "mathOperator",
            found: value.base_type().unwrap_or(qtikit_types::BaseType::String),
        })
    };

    let x = read(&operands[0])?;
    let result = match expr.name {
        MathFunction::Sin => x.sin(),
        MathFunction::Cos => x.cos(),
        MathFunction::Tan => x.tan(),
        MathFunction::Sec => x.cos().recip(),
        MathFunction::Csc => x.sin().recip(),
        MathFunction::Cot => x.tan().recip(),
        MathFunction::Asin => x.asin(),
        MathFunction::Acos => x.acos(),
        MathFunction::Atan => x.atan(),
        MathFunction::Atan2 => x.atan2(read(&operands[1])?),
        MathFunction::Sinh => x.sinh(),
        MathFunction::Cosh => x.cosh(),
        MathFunction::Tanh => x.tanh(),
        MathFunction::Sech => x.cosh().recip(),
        MathFunction::Csch => x.sinh().recip(),
        MathFunction::Coth => x.tanh().recip(),
        MathFunction::Log => x.log10(),
        MathFunction::Ln => x.ln(),
        MathFunction::Exp => x.exp(),
        MathFunction::Abs => x.abs(),
        MathFunction::Signum => {
            if x == 0.0 {
                0.0
            } else {
                x.signum()
            }
        }
        MathFunction::Floor => x.floor(),
        MathFunction::Ceil => x.ceil(),
        MathFunction::ToDegrees => x.to_degrees(),
        MathFunction::ToRadians => x.to_radians(),
        MathFunction::Pow => x.powf(read(&operands[1])?),
    };
    Ok(QtiValue::float(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn apply(name: MathFunction, operands: &[QtiValue]) -> QtiValue {
        let expr = MathOperator {
            name,
            operands: vec![],
        };
        math_operator(&expr, operands).unwrap()
    }

    #[test]
    fn unary_functions() {
        assert_eq!(apply(MathFunction::Sin, &[QtiValue::float(0.0)]), QtiValue::float(0.0));
        assert_eq!(apply(MathFunction::Abs, &[QtiValue::float(-3.5)]), QtiValue::float(3.5));
        assert_eq!(apply(MathFunction::Signum, &[QtiValue::float(0.0)]), QtiValue::float(0.0));
        assert_eq!(apply(MathFunction::Signum, &[QtiValue::float(-7.0)]), QtiValue::float(-1.0));
        assert_eq!(apply(MathFunction::Exp, &[QtiValue::integer(0)]), QtiValue::float(1.0));
    }

    #[test]
    fn binary_functions() {
        assert_eq!(
            apply(MathFunction::Pow, &[QtiValue::float(2.0), QtiValue::float(10.0)]),
            QtiValue::float(1024.0)
        );
        assert_eq!(
            apply(MathFunction::Atan2, &[QtiValue::float(0.0), QtiValue::float(1.0)]),
            QtiValue::float(0.0)
        );
    }

    #[test]
    fn null_propagates() {
        assert_eq!(
            apply(MathFunction::Cos, &[QtiValue::Null]),
            QtiValue::Null
        );
    }

    #[test]
    fn domain_errors_stay_nan() {
        let result = apply(MathFunction::Ln, &[QtiValue::float(-1.0)]);
        match result {
            QtiValue::Float(v) => assert!(v.is_nan()),
            other => panic!("expected float NaN, got {other}"),
        }
    }

    #[test]
    fn arity_is_checked_against_the_function() {
        let expr = MathOperator {
            name: MathFunction::Pow,
            operands: vec![],
        };
        assert!(math_operator(&expr, &[QtiValue::float(1.0)]).is_err());
    }
}
