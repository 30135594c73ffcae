//! Rule node model
//!
//! Rules are the imperative statements of response, outcome and template
//! processing: conditionals over expression guards, variable assignments,
//! lookup-table assignments, early exits and template constraints. They are
//! evaluated strictly in document order.

use serde::{Deserialize, Serialize};

use crate::expression::Expression;

/// A guarded list of rules (`<if>`/`<elseIf>` branch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBranch {
    /// Boolean guard expression; NULL or non-boolean reads as false
    pub guard: Expression,
    pub rules: Vec<Rule>,
}

/// An if/elseIf/else conditional, shared by `responseCondition`,
/// `outcomeCondition` and `templateCondition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub if_branch: ConditionBranch,
    pub else_ifs: Vec<ConditionBranch>,
    pub else_rules: Option<Vec<Rule>>,
}

/// Assignment of an evaluated expression into a named variable, shared by
/// the `set*` rules and `lookupOutcomeValue`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub identifier: String,
    pub expression: Expression,
}

/// `templateConstraint` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConstraint {
    pub expression: Expression,
}

/// A processing rule node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", content = "node")]
pub enum Rule {
    ResponseCondition(Condition),
    OutcomeCondition(Condition),
    TemplateCondition(Condition),
    SetOutcomeValue(Assignment),
    SetTemplateValue(Assignment),
    SetDefaultValue(Assignment),
    SetCorrectResponse(Assignment),
    LookupOutcomeValue(Assignment),
    ExitResponse,
    ExitTemplate,
    ExitTest,
    TemplateConstraint(TemplateConstraint),
}

impl Rule {
    /// The QTI class name of this node.
    pub fn qti_class_name(&self) -> &'static str {
        match self {
            Self::ResponseCondition(_) => "responseCondition",
            Self::OutcomeCondition(_) => "outcomeCondition",
            Self::TemplateCondition(_) => "templateCondition",
            Self::SetOutcomeValue(_) => "setOutcomeValue",
            Self::SetTemplateValue(_) => "setTemplateValue",
            Self::SetDefaultValue(_) => "setDefaultValue",
            Self::SetCorrectResponse(_) => "setCorrectResponse",
            Self::LookupOutcomeValue(_) => "lookupOutcomeValue",
            Self::ExitResponse => "exitResponse",
            Self::ExitTemplate => "exitTemplate",
            Self::ExitTest => "exitTest",
            Self::TemplateConstraint(_) => "templateConstraint",
        }
    }

    /// Assignment rule for `setOutcomeValue`.
    pub fn set_outcome_value(identifier: impl Into<String>, expression: Expression) -> Self {
        Self::SetOutcomeValue(Assignment {
            identifier: identifier.into(),
            expression,
        })
    }

    /// Assignment rule for `setTemplateValue`.
    pub fn set_template_value(identifier: impl Into<String>, expression: Expression) -> Self {
        Self::SetTemplateValue(Assignment {
            identifier: identifier.into(),
            expression,
        })
    }
}
