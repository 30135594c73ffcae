//! String operators
//!
//! Substring and equality tests with explicit case-sensitivity flags, and
//! anchored regular-expression matching for `patternMatch`. A NULL operand
//! makes every result NULL; a malformed pattern is an authoring error.

use qtikit_ast::{PatternMatch, StringMatch, Substring};
use qtikit_types::QtiValue;
use regex::Regex;

use crate::error::{ExpressionError, ExpressionResult};
use crate::operators::any_null;

fn string_pair<'a>(
    operator: &'static str,
    operands: &'a [QtiValue],
) -> ExpressionResult<(&'a str, &'a str)> {
    let read = |value: &'a QtiValue| {
        value.as_str().ok_or_else(|| ExpressionError::WrongBaseType {
            operator,
            found: value.base_type().unwrap_or(qtikit_types::BaseType::String),
        })
    };
    Ok((read(&operands[0])?, read(&operands[1])?))
}

/// `substring`: whether the first operand occurs inside the second.
pub(crate) fn substring(expr: &Substring, operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (needle, haystack) = string_pair("substring", operands)?;
    let found = if expr.case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    };
    Ok(QtiValue::boolean(found))
}

/// `stringMatch`: equality of two strings, or containment when the
/// deprecated `substring` flag is set.
pub(crate) fn string_match(expr: &StringMatch, operands: &[QtiValue]) -> ExpressionResult<QtiValue> {
    if any_null(operands) {
        return Ok(QtiValue::Null);
    }
    let (first, second) = string_pair("stringMatch", operands)?;
    let result = match (expr.substring, expr.case_sensitive) {
        (true, true) => second.contains(first),
        (true, false) => second.to_lowercase().contains(&first.to_lowercase()),
        (false, true) => first == second,
        (false, false) => first.eq_ignore_ascii_case(second),
    };
    Ok(QtiValue::boolean(result))
}

/// `patternMatch`: the whole operand string against an XML-Schema style
/// regular expression. The pattern is anchored because schema regexes
/// match complete values.
pub(crate) fn pattern_match(
    expr: &PatternMatch,
    operands: &[QtiValue],
) -> ExpressionResult<QtiValue> {
    let operand = &operands[0];
    if operand.is_null() {
        return Ok(QtiValue::Null);
    }
    let text = operand.as_str().ok_or_else(|| ExpressionError::WrongBaseType {
        operator: "patternMatch",
        found: operand.base_type().unwrap_or(qtikit_types::BaseType::String),
    })?;
    let anchored = format!("^(?:{})$", expr.pattern);
    let regex = Regex::new(&anchored).map_err(|e| ExpressionError::InvalidPattern {
        pattern: expr.pattern.clone(),
        message: e.to_string(),
    })?;
    Ok(QtiValue::boolean(regex.is_match(text)))
}
