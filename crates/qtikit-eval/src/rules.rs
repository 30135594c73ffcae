//! Rule processing engine
//!
//! Walks rule trees in document order, evaluating guard and value
//! sub-expressions through the expression engine and applying every
//! mutation to the context. Exits and template-constraint failures travel
//! as control signals, kept apart from errors so the session layer can
//! resume elsewhere instead of failing the attempt.

use log::debug;
use qtikit_ast::{Assignment, Condition, Rule};
use qtikit_types::{
    BaseType, Cardinality, MultipleContainer, OrderedContainer, QtiValue,
};

use crate::context::{EvaluationContext, LookupTable, Variable, VariableKind};
use crate::engine::ExpressionEngine;
use crate::error::{ExitSignal, RuleAbort, RuleError, RuleOutcome, RuleResult};

/// Which slot of the target variable an assignment rule writes.
#[derive(Clone, Copy)]
enum AssignmentSlot {
    Value,
    DefaultValue,
    CorrectResponse,
}

/// Rule tree evaluator. Owns the expression engine it delegates
/// sub-expressions to.
#[derive(Debug, Default)]
pub struct RuleEngine {
    expressions: ExpressionEngine,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            expressions: ExpressionEngine::new(),
        }
    }

    /// The expression engine used for guards and assigned values.
    pub fn expression_engine(&self) -> &ExpressionEngine {
        &self.expressions
    }

    /// Process a whole rule tree. Exits and constraint failures are
    /// outcomes, not errors.
    pub fn process_all(
        &self,
        rules: &[Rule],
        ctx: &mut EvaluationContext,
    ) -> Result<RuleOutcome, RuleError> {
        match self.run_rules(rules, ctx) {
            Ok(()) => Ok(RuleOutcome::Completed),
            Err(RuleAbort::Exit(signal)) => Ok(RuleOutcome::Exited(signal)),
            Err(RuleAbort::ConstraintUnsatisfied) => Ok(RuleOutcome::ConstraintUnsatisfied),
            Err(RuleAbort::Error(error)) => Err(error),
        }
    }

    /// Process one rule. Callers that need to distinguish exits from
    /// errors can match on the abort variant.
    pub fn process(&self, rule: &Rule, ctx: &mut EvaluationContext) -> RuleResult<()> {
        debug!("rule {}", rule.qti_class_name());
        match rule {
            Rule::ResponseCondition(c) | Rule::OutcomeCondition(c) | Rule::TemplateCondition(c) => {
                self.process_condition(c, ctx)
            }
            Rule::SetOutcomeValue(a) => self.assign(
                a,
                ctx,
                "setOutcomeValue",
                Some(VariableKind::Outcome),
                AssignmentSlot::Value,
            ),
            Rule::SetTemplateValue(a) => self.assign(
                a,
                ctx,
                "setTemplateValue",
                Some(VariableKind::Template),
                AssignmentSlot::Value,
            ),
            Rule::SetDefaultValue(a) => {
                self.assign(a, ctx, "setDefaultValue", None, AssignmentSlot::DefaultValue)
            }
            Rule::SetCorrectResponse(a) => self.assign(
                a,
                ctx,
                "setCorrectResponse",
                Some(VariableKind::Response),
                AssignmentSlot::CorrectResponse,
            ),
            Rule::LookupOutcomeValue(a) => self.lookup_outcome_value(a, ctx),
            Rule::ExitResponse => Err(RuleAbort::Exit(ExitSignal::Response)),
            Rule::ExitTemplate => Err(RuleAbort::Exit(ExitSignal::Template)),
            Rule::ExitTest => Err(RuleAbort::Exit(ExitSignal::Test)),
            Rule::TemplateConstraint(c) => {
                let satisfied = self
                    .expressions
                    .evaluate(&c.expression, ctx)
                    .map_err(RuleError::from)?;
                if satisfied.as_boolean() == Some(true) {
                    Ok(())
                } else {
                    Err(RuleAbort::ConstraintUnsatisfied)
                }
            }
        }
    }

    fn run_rules(&self, rules: &[Rule], ctx: &mut EvaluationContext) -> RuleResult<()> {
        for rule in rules {
            self.process(rule, ctx)?;
        }
        Ok(())
    }

    /// Evaluate branch guards in order and run the first satisfied branch.
    /// A NULL or non-boolean guard reads as false.
    fn process_condition(&self, condition: &Condition, ctx: &mut EvaluationContext) -> RuleResult<()> {
        for branch in std::iter::once(&condition.if_branch).chain(condition.else_ifs.iter()) {
            let guard = self
                .expressions
                .evaluate(&branch.guard, ctx)
                .map_err(RuleError::from)?;
            if guard.as_boolean() == Some(true) {
                return self.run_rules(&branch.rules, ctx);
            }
        }
        if let Some(rules) = &condition.else_rules {
            return self.run_rules(rules, ctx);
        }
        Ok(())
    }

    fn assign(
        &self,
        assignment: &Assignment,
        ctx: &mut EvaluationContext,
        rule: &'static str,
        required_kind: Option<VariableKind>,
        slot: AssignmentSlot,
    ) -> RuleResult<()> {
        let value = self
            .expressions
            .evaluate(&assignment.expression, ctx)
            .map_err(RuleError::from)?;

        let variable = ctx.get_mut(&assignment.identifier).ok_or_else(|| {
            RuleError::NonexistentVariable {
                identifier: assignment.identifier.clone(),
            }
        })?;
        if let Some(expected) = required_kind
            && variable.kind() != expected
        {
            return Err(RuleAbort::Error(RuleError::WrongVariableType {
                rule,
                identifier: assignment.identifier.clone(),
                expected: expected.label(),
                found: variable.kind().label(),
            }));
        }

        let coerced = juggle(value, variable)?;
        match slot {
            AssignmentSlot::Value => variable.set_value(coerced),
            AssignmentSlot::DefaultValue => variable.set_default_value(coerced),
            AssignmentSlot::CorrectResponse => variable.set_correct_response(coerced),
        }
        Ok(())
    }

    /// `lookupOutcomeValue`: resolve the evaluated source value through
    /// the target variable's lookup table and assign the result.
    fn lookup_outcome_value(
        &self,
        assignment: &Assignment,
        ctx: &mut EvaluationContext,
    ) -> RuleResult<()> {
        let source = self
            .expressions
            .evaluate(&assignment.expression, ctx)
            .map_err(RuleError::from)?;

        let variable = ctx.get_mut(&assignment.identifier).ok_or_else(|| {
            RuleError::NonexistentVariable {
                identifier: assignment.identifier.clone(),
            }
        })?;
        let table = variable
            .lookup_table()
            .ok_or_else(|| RuleError::MissingLookupTable {
                identifier: assignment.identifier.clone(),
            })?;

        let resolved = match table {
            LookupTable::Match(table) => match &source {
                QtiValue::Null => table.default.clone(),
                QtiValue::Integer(i) => table.lookup(*i),
                other => {
                    return Err(RuleAbort::Error(RuleError::WrongLookupSource {
                        identifier: assignment.identifier.clone(),
                        found: describe(other),
                    }));
                }
            },
            LookupTable::Interpolation(table) => match &source {
                QtiValue::Null => table.default.clone(),
                QtiValue::Integer(_) | QtiValue::Float(_) => {
                    table.lookup(source.as_f64().unwrap_or_default())
                }
                QtiValue::Duration(d) => table.lookup(d.seconds()),
                other => {
                    return Err(RuleAbort::Error(RuleError::WrongLookupSource {
                        identifier: assignment.identifier.clone(),
                        found: describe(other),
                    }));
                }
            },
        };

        let coerced = juggle(resolved, variable)?;
        variable.set_value(coerced);
        Ok(())
    }
}

fn describe(value: &QtiValue) -> String {
    match (value.cardinality(), value.base_type()) {
        (Some(c), Some(b)) => format!("{c} {b}"),
        (Some(c), None) => c.to_string(),
        _ => "NULL".to_string(),
    }
}

fn incompatible(value: &QtiValue, variable: &Variable) -> RuleError {
    RuleError::IncompatibleAssignment {
        identifier: variable.identifier().to_string(),
        declared: format!(
            "{} {}",
            variable.cardinality(),
            variable
                .base_type()
                .map(|b| b.qti_name())
                .unwrap_or("record")
        ),
        found: describe(value),
    }
}

/// Coerce an evaluated value into a variable's declared shape.
///
/// NULL assigns anywhere. A container assigned to a single-cardinality
/// variable takes its first element; a single value assigned to a
/// container variable is wrapped; integers widen to float and floats
/// truncate to integer. Anything else is an incompatible assignment.
fn juggle(value: QtiValue, variable: &Variable) -> Result<QtiValue, RuleError> {
    if matches!(value, QtiValue::Null) {
        return Ok(QtiValue::Null);
    }

    let declared_cardinality = variable.cardinality();
    let declared_base = variable.base_type();

    match declared_cardinality {
        Cardinality::Record => {
            if matches!(value, QtiValue::Record(_)) {
                Ok(value)
            } else {
                Err(incompatible(&value, variable))
            }
        }
        Cardinality::Single => {
            let scalar = match &value {
                QtiValue::Multiple(c) => match c.values().first() {
                    Some(first) => first.clone(),
                    None => return Ok(QtiValue::Null),
                },
                QtiValue::Ordered(c) => match c.values().first() {
                    Some(first) => first.clone(),
                    None => return Ok(QtiValue::Null),
                },
                QtiValue::Record(_) => return Err(incompatible(&value, variable)),
                other => (*other).clone(),
            };
            juggle_scalar(scalar, declared_base, &value, variable)
        }
        Cardinality::Multiple | Cardinality::Ordered => {
            let base_type = declared_base.ok_or_else(|| incompatible(&value, variable))?;
            let elements: Vec<QtiValue> = match value {
                QtiValue::Multiple(ref c) => c.values().to_vec(),
                QtiValue::Ordered(ref c) => c.values().to_vec(),
                QtiValue::Record(_) => return Err(incompatible(&value, variable)),
                ref single => vec![single.clone()],
            };
            // multiple <-> ordered reshaping is not attempted; only a
            // matching container or a wrapped single fits.
            let reshaped = matches!(
                (declared_cardinality, value.cardinality()),
                (Cardinality::Multiple, Some(Cardinality::Ordered))
                    | (Cardinality::Ordered, Some(Cardinality::Multiple))
            );
            if reshaped {
                Err(incompatible(&value, variable))
            } else if declared_cardinality == Cardinality::Multiple {
                MultipleContainer::with_values(base_type, elements)
                    .map(QtiValue::Multiple)
                    .map_err(|_| incompatible(&value, variable))
            } else {
                OrderedContainer::with_values(base_type, elements)
                    .map(QtiValue::Ordered)
                    .map_err(|_| incompatible(&value, variable))
            }
        }
    }
}

fn juggle_scalar(
    scalar: QtiValue,
    declared_base: Option<BaseType>,
    original: &QtiValue,
    variable: &Variable,
) -> Result<QtiValue, RuleError> {
    let Some(declared) = declared_base else {
        return Err(incompatible(original, variable));
    };
    if scalar.base_type() == Some(declared) {
        return Ok(scalar);
    }
    match (&scalar, declared) {
        (QtiValue::Integer(i), BaseType::Float) => Ok(QtiValue::float(f64::from(*i))),
        (QtiValue::Float(f), BaseType::Integer) => Ok(QtiValue::integer(f.trunc() as i32)),
        _ => Err(incompatible(original, variable)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qtikit_ast::Expression;

    fn float_var(identifier: &str) -> Variable {
        Variable::outcome(identifier, Cardinality::Single, BaseType::Float)
    }

    #[test]
    fn juggle_widens_integer_to_float() {
        let var = float_var("SCORE");
        let coerced = juggle(QtiValue::integer(1), &var).unwrap();
        assert_eq!(coerced, QtiValue::float(1.0));
    }

    #[test]
    fn juggle_truncates_float_to_integer() {
        let var = Variable::outcome("N", Cardinality::Single, BaseType::Integer);
        assert_eq!(juggle(QtiValue::float(2.9), &var).unwrap(), QtiValue::integer(2));
        assert_eq!(juggle(QtiValue::float(-2.9), &var).unwrap(), QtiValue::integer(-2));
    }

    #[test]
    fn juggle_takes_first_element_of_a_container() {
        let var = Variable::outcome("FIRST", Cardinality::Single, BaseType::Identifier);
        let container = QtiValue::Multiple(
            MultipleContainer::with_values(
                BaseType::Identifier,
                [QtiValue::identifier("A"), QtiValue::identifier("B")],
            )
            .unwrap(),
        );
        assert_eq!(juggle(container, &var).unwrap(), QtiValue::identifier("A"));
    }

    #[test]
    fn juggle_wraps_a_single_into_a_container() {
        let var = Variable::response("PICKS", Cardinality::Multiple, BaseType::Identifier);
        let wrapped = juggle(QtiValue::identifier("A"), &var).unwrap();
        assert_eq!(
            wrapped,
            QtiValue::Multiple(
                MultipleContainer::with_values(BaseType::Identifier, [QtiValue::identifier("A")])
                    .unwrap()
            )
        );
    }

    #[test]
    fn juggle_rejects_impossible_shapes() {
        let var = Variable::outcome("N", Cardinality::Single, BaseType::Integer);
        assert!(juggle(QtiValue::identifier("A"), &var).is_err());
    }

    #[test]
    fn set_outcome_value_rejects_response_targets() {
        let mut ctx = EvaluationContext::with_rng_seed(0);
        ctx.declare(Variable::response(
            "RESPONSE",
            Cardinality::Single,
            BaseType::Identifier,
        ));
        let engine = RuleEngine::new();
        let rule = Rule::set_outcome_value(
            "RESPONSE",
            Expression::base_value(QtiValue::identifier("A")),
        );
        let result = engine.process(&rule, &mut ctx);
        assert!(matches!(
            result,
            Err(RuleAbort::Error(RuleError::WrongVariableType { .. }))
        ));
    }

    #[test]
    fn assigning_to_an_undeclared_variable_is_an_error() {
        let mut ctx = EvaluationContext::with_rng_seed(0);
        let engine = RuleEngine::new();
        let rule = Rule::set_outcome_value("GHOST", Expression::base_value(QtiValue::float(1.0)));
        assert!(matches!(
            engine.process(&rule, &mut ctx),
            Err(RuleAbort::Error(RuleError::NonexistentVariable { .. }))
        ));
    }
}
