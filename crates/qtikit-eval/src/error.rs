//! Processing errors and control signals
//!
//! The taxonomy keeps three things apart: contract violations (typed
//! errors that abort a whole evaluation), data-dependent NULLs (ordinary
//! values, never represented here) and control signals (early exits and
//! template-constraint failures, which callers must be able to tell from
//! failures).

use qtikit_types::{BaseType, Cardinality, ContainerError};
use std::fmt;
use thiserror::Error;

/// Result type for expression evaluation.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Machine-readable classification carried by every processing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingErrorKind {
    /// Unregistered expression/rule class; fatal configuration error
    UnknownClass,
    /// Operand count outside the operator's arity bounds
    OperandCount,
    /// Operand cardinality outside the operator's contract
    WrongCardinality,
    /// Operand base type outside the operator's contract
    WrongBaseType,
    /// Named variable not declared in the context
    NonexistentVariable,
    /// Variable exists but is of the wrong kind for the operation
    WrongVariableType,
    /// Variable exists but its base type does not fit the operation
    WrongVariableBaseType,
    /// Malformed operator attribute (pattern, bounds, figures)
    LogicError,
    /// Integer arithmetic left the representable range
    Overflow,
    /// Invariant breach inside the engine itself
    Internal,
}

/// Error raised while evaluating an expression tree.
///
/// Any of these aborts the whole evaluation; partially computed results
/// are never surfaced.
#[derive(Debug, Clone, Error)]
pub enum ExpressionError {
    /// Arity violation at evaluation time
    #[error("{operator} expects {expected} operand(s), got {found}")]
    OperandCount {
        operator: &'static str,
        expected: String,
        found: usize,
    },

    /// An operand's cardinality is outside the operator's contract
    #[error("{operator} cannot process a {found} operand")]
    WrongCardinality {
        operator: &'static str,
        found: Cardinality,
    },

    /// An operand's base type is outside the operator's contract
    #[error("{operator} cannot process a {found} operand")]
    WrongBaseType {
        operator: &'static str,
        found: BaseType,
    },

    /// A container operand could not be assembled
    #[error("{operator}: {source}")]
    Container {
        operator: &'static str,
        source: ContainerError,
    },

    /// A variable reference names nothing in the context
    #[error("no variable '{identifier}' is declared in the context")]
    NonexistentVariable { identifier: String },

    /// The referenced variable is of the wrong kind
    #[error("variable '{identifier}' is a {found} variable; {operator} requires a {expected} variable")]
    WrongVariableType {
        operator: &'static str,
        identifier: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The referenced variable's base type does not fit
    #[error("variable '{identifier}' cannot be read as {expected}")]
    WrongVariableBaseType {
        identifier: String,
        expected: &'static str,
    },

    /// The referenced response variable has no mapping attached
    #[error("response variable '{identifier}' has no mapping")]
    MissingMapping { identifier: String },

    /// Malformed regular expression attribute
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Authoring error in a random generator's bounds
    #[error("{operator}: {message}")]
    InvalidBounds {
        operator: &'static str,
        message: String,
    },

    /// Malformed operator attribute
    #[error("{operator}: {message}")]
    LogicError {
        operator: &'static str,
        message: String,
    },

    /// Integer arithmetic left the representable range
    #[error("arithmetic overflow in {operator}")]
    Overflow { operator: &'static str },

    /// Engine invariant breach; indicates a defect, not bad data
    #[error("internal evaluation error: {message}")]
    Internal { message: String },
}

impl ExpressionError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ProcessingErrorKind {
        match self {
            Self::OperandCount { .. } => ProcessingErrorKind::OperandCount,
            Self::WrongCardinality { .. } => ProcessingErrorKind::WrongCardinality,
            Self::WrongBaseType { .. } | Self::Container { .. } => {
                ProcessingErrorKind::WrongBaseType
            }
            Self::NonexistentVariable { .. } => ProcessingErrorKind::NonexistentVariable,
            Self::WrongVariableType { .. } => ProcessingErrorKind::WrongVariableType,
            Self::WrongVariableBaseType { .. } | Self::MissingMapping { .. } => {
                ProcessingErrorKind::WrongVariableBaseType
            }
            Self::InvalidPattern { .. } | Self::InvalidBounds { .. } | Self::LogicError { .. } => {
                ProcessingErrorKind::LogicError
            }
            Self::Overflow { .. } => ProcessingErrorKind::Overflow,
            Self::Internal { .. } => ProcessingErrorKind::Internal,
        }
    }

    pub(crate) fn operand_count(
        operator: &'static str,
        expected: impl Into<String>,
        found: usize,
    ) -> Self {
        Self::OperandCount {
            operator,
            expected: expected.into(),
            found,
        }
    }

    pub(crate) fn nonexistent_variable(identifier: impl Into<String>) -> Self {
        Self::NonexistentVariable {
            identifier: identifier.into(),
        }
    }

    pub(crate) fn logic(operator: &'static str, message: impl Into<String>) -> Self {
        Self::LogicError {
            operator,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Error raised while processing a rule tree.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// A sub-expression failed
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// The assignment target names nothing in the context
    #[error("no variable '{identifier}' is declared in the context")]
    NonexistentVariable { identifier: String },

    /// The assignment target is of the wrong kind for the rule
    #[error("variable '{identifier}' is a {found} variable; {rule} requires a {expected} variable")]
    WrongVariableType {
        rule: &'static str,
        identifier: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The evaluated value cannot be coerced into the target's shape
    #[error(
        "cannot assign a {found} value to variable '{identifier}' declared as {declared}"
    )]
    IncompatibleAssignment {
        identifier: String,
        declared: String,
        found: String,
    },

    /// `lookupOutcomeValue` on a variable with no lookup table
    #[error("variable '{identifier}' has no lookup table")]
    MissingLookupTable { identifier: String },

    /// Lookup source value outside the table's accepted type family
    #[error("lookup table of '{identifier}' cannot be driven by a {found} value")]
    WrongLookupSource { identifier: String, found: String },
}

impl RuleError {
    /// The machine-readable kind of this error.
    pub fn kind(&self) -> ProcessingErrorKind {
        match self {
            Self::Expression(e) => e.kind(),
            Self::NonexistentVariable { .. } => ProcessingErrorKind::NonexistentVariable,
            Self::WrongVariableType { .. } => ProcessingErrorKind::WrongVariableType,
            Self::IncompatibleAssignment { .. } | Self::WrongLookupSource { .. } => {
                ProcessingErrorKind::WrongVariableBaseType
            }
            Self::MissingLookupTable { .. } => ProcessingErrorKind::LogicError,
        }
    }
}

/// The early-exit signals a rule tree can raise. Normal terminations, not
/// failures: the session layer uses them to move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    /// `exitResponse`
    Response,
    /// `exitTemplate`
    Template,
    /// `exitTest`
    Test,
}

impl fmt::Display for ExitSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response => f.write_str("exitResponse"),
            Self::Template => f.write_str("exitTemplate"),
            Self::Test => f.write_str("exitTest"),
        }
    }
}

/// Why a single rule stopped the enclosing tree: a failure, an exit
/// signal, or an unsatisfied template constraint.
#[derive(Debug, Clone, Error)]
pub enum RuleAbort {
    #[error(transparent)]
    Error(#[from] RuleError),

    #[error("{0}")]
    Exit(ExitSignal),

    #[error("template constraint unsatisfied")]
    ConstraintUnsatisfied,
}

/// Result type for rule processing.
pub type RuleResult<T> = Result<T, RuleAbort>;

/// How a full rule tree finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Every rule ran to the end
    Completed,
    /// An exit rule stopped processing early
    Exited(ExitSignal),
    /// A `templateConstraint` was not satisfied; the caller should
    /// re-select template values
    ConstraintUnsatisfied,
}
