//! String operator tests: substring, stringMatch, patternMatch

use pretty_assertions::assert_eq;
use qtikit_ast::{Expression, PatternMatch, StringMatch, Substring};
use qtikit_eval::{EvaluationContext, ExpressionEngine};
use qtikit_types::QtiValue;

fn evaluate(expr: &Expression) -> QtiValue {
    ExpressionEngine::new()
        .evaluate(expr, &EvaluationContext::with_rng_seed(0))
        .unwrap()
}

fn s(v: &str) -> Expression {
    Expression::base_value(QtiValue::string(v))
}

#[test]
fn substring_case_flag() {
    let expr = Expression::Substring(Substring {
        case_sensitive: false,
        operands: vec![s("bell"), s("Doorbell")],
    });
    assert_eq!(evaluate(&expr), QtiValue::boolean(true));

    let expr = Expression::Substring(Substring {
        case_sensitive: true,
        operands: vec![s("bell"), s("DoorBell")],
    });
    assert_eq!(evaluate(&expr), QtiValue::boolean(false));
}

#[test]
fn string_match_exact_and_null() {
    let exact = |a: Expression, b: Expression| {
        Expression::StringMatch(StringMatch {
            case_sensitive: true,
            substring: false,
            operands: vec![a, b],
        })
    };
    assert_eq!(evaluate(&exact(s("York"), s("York"))), QtiValue::boolean(true));
    assert_eq!(evaluate(&exact(s("York"), s("york"))), QtiValue::boolean(false));
    assert_eq!(evaluate(&exact(s("York"), Expression::Null)), QtiValue::Null);
}

#[test]
fn pattern_match_whole_string() {
    let matches = |pattern: &str, text: &str| {
        evaluate(&Expression::PatternMatch(PatternMatch {
            pattern: pattern.into(),
            operands: vec![s(text)],
        }))
    };
    assert_eq!(matches(r"\d{3}", "123"), QtiValue::boolean(true));
    assert_eq!(matches(r"\d{3}", "1234"), QtiValue::boolean(false));
    assert_eq!(matches("[Yy]es|[Nn]o", "no"), QtiValue::boolean(true));
}
