//! Execution context
//!
//! The context maps variable identifiers to typed variables: current value,
//! default, correct response, and the mapping/lookup tables the scoring
//! operators resolve through. Expression processors read it; only rule
//! processors write it. The random source lives here too, seedable so
//! randomized operators are deterministic under test.

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::{RefCell, RefMut};

use qtikit_types::{BaseType, Cardinality, QtiValue};

/// Which declaration family a variable belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Response,
    Outcome,
    Template,
}

impl VariableKind {
    /// Lower-case label for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Response => "response",
            Self::Outcome => "outcome",
            Self::Template => "template",
        }
    }
}

/// One key→weight entry of a response mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// The response value this entry matches
    pub key: QtiValue,
    /// The score contribution of a matched value
    pub mapped_value: f64,
    /// Whether string-ish keys compare case-sensitively
    pub case_sensitive: bool,
}

impl MapEntry {
    /// Whether `value` matches this entry's key.
    pub fn matches(&self, value: &QtiValue) -> bool {
        if !self.case_sensitive
            && let (Some(key), Some(candidate)) = (self.key.as_str(), value.as_str())
        {
            return key.eq_ignore_ascii_case(candidate);
        }
        self.key == *value
    }
}

/// Response-variable mapping: raw values to numeric score contributions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    pub entries: Vec<MapEntry>,
    /// Contribution of a value no entry matches
    pub default_value: f64,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

impl Mapping {
    /// The contribution of one response value: the first matching entry's
    /// weight, or the mapping default.
    pub fn weight_for(&self, value: &QtiValue) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.matches(value))
            .map_or(self.default_value, |entry| entry.mapped_value)
    }

    /// Clamp a summed score into the declared bounds.
    pub fn clamp(&self, total: f64) -> f64 {
        let mut clamped = total;
        if let Some(lower) = self.lower_bound {
            clamped = clamped.max(lower);
        }
        if let Some(upper) = self.upper_bound {
            clamped = clamped.min(upper);
        }
        clamped
    }
}

/// Match table: integer source value to declared outcome value.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTable {
    pub entries: Vec<(i32, QtiValue)>,
    pub default: QtiValue,
}

impl MatchTable {
    /// The entry for `source`, or the table default.
    pub fn lookup(&self, source: i32) -> QtiValue {
        self.entries
            .iter()
            .find(|(key, _)| *key == source)
            .map_or_else(|| self.default.clone(), |(_, value)| value.clone())
    }
}

/// One threshold of an interpolation table.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationEntry {
    pub source_value: f64,
    /// Inclusive (`>=`) or exclusive (`>`) threshold comparison
    pub include_boundary: bool,
    pub target: QtiValue,
}

impl InterpolationEntry {
    fn satisfied_by(&self, source: f64) -> bool {
        if self.include_boundary {
            source >= self.source_value
        } else {
            source > self.source_value
        }
    }
}

/// Interpolation table: ordered thresholds over a numeric source.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationTable {
    pub entries: Vec<InterpolationEntry>,
    pub default: QtiValue,
}

impl InterpolationTable {
    /// The target of the **last** satisfied threshold in declaration
    /// order; later entries override earlier ones on overlap.
    pub fn lookup(&self, source: f64) -> QtiValue {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.satisfied_by(source))
            .map_or_else(|| self.default.clone(), |entry| entry.target.clone())
    }
}

/// Outcome-variable lookup table.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTable {
    Match(MatchTable),
    Interpolation(InterpolationTable),
}

/// A declared variable and its session state.
#[derive(Debug, Clone)]
pub struct Variable {
    identifier: String,
    kind: VariableKind,
    cardinality: Cardinality,
    /// `None` only for record cardinality
    base_type: Option<BaseType>,
    value: QtiValue,
    default_value: Option<QtiValue>,
    correct_response: Option<QtiValue>,
    mapping: Option<Mapping>,
    lookup_table: Option<LookupTable>,
}

impl Variable {
    fn new(
        identifier: impl Into<String>,
        kind: VariableKind,
        cardinality: Cardinality,
        base_type: Option<BaseType>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
            cardinality,
            base_type,
            value: QtiValue::Null,
            default_value: None,
            correct_response: None,
            mapping: None,
            lookup_table: None,
        }
    }

    /// A response variable, value initially NULL.
    pub fn response(
        identifier: impl Into<String>,
        cardinality: Cardinality,
        base_type: BaseType,
    ) -> Self {
        Self::new(identifier, VariableKind::Response, cardinality, Some(base_type))
    }

    /// An outcome variable, value initially NULL.
    pub fn outcome(
        identifier: impl Into<String>,
        cardinality: Cardinality,
        base_type: BaseType,
    ) -> Self {
        Self::new(identifier, VariableKind::Outcome, cardinality, Some(base_type))
    }

    /// A template variable, value initially NULL.
    pub fn template(
        identifier: impl Into<String>,
        cardinality: Cardinality,
        base_type: BaseType,
    ) -> Self {
        Self::new(identifier, VariableKind::Template, cardinality, Some(base_type))
    }

    /// A record-cardinality variable of the given kind.
    pub fn record(identifier: impl Into<String>, kind: VariableKind) -> Self {
        Self::new(identifier, kind, Cardinality::Record, None)
    }

    pub fn with_value(mut self, value: QtiValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_default(mut self, value: QtiValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_correct_response(mut self, value: QtiValue) -> Self {
        self.correct_response = Some(value);
        self
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn with_lookup_table(mut self, table: LookupTable) -> Self {
        self.lookup_table = Some(table);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn base_type(&self) -> Option<BaseType> {
        self.base_type
    }

    pub fn value(&self) -> &QtiValue {
        &self.value
    }

    pub fn default_value(&self) -> Option<&QtiValue> {
        self.default_value.as_ref()
    }

    pub fn correct_response(&self) -> Option<&QtiValue> {
        self.correct_response.as_ref()
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    pub fn lookup_table(&self) -> Option<&LookupTable> {
        self.lookup_table.as_ref()
    }

    /// Overwrite the current value. Shape checking is the rule layer's
    /// concern; the context stores what it is given.
    pub fn set_value(&mut self, value: QtiValue) {
        self.value = value;
    }

    /// Overwrite the default value.
    pub fn set_default_value(&mut self, value: QtiValue) {
        self.default_value = Some(value);
    }

    /// Overwrite the correct response.
    pub fn set_correct_response(&mut self, value: QtiValue) {
        self.correct_response = Some(value);
    }
}

/// The live variable store shared by one item/test's expression and rule
/// evaluations.
///
/// Expression processors take `&EvaluationContext`; every mutation goes
/// through rule processors holding `&mut`. The RNG sits behind a
/// `RefCell` so drawing random values does not widen that boundary.
pub struct EvaluationContext {
    variables: IndexMap<String, Variable>,
    rng: RefCell<StdRng>,
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationContext {
    /// An empty context with an entropy-seeded random source.
    pub fn new() -> Self {
        Self {
            variables: IndexMap::new(),
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    /// An empty context with a deterministic random source, for tests and
    /// replayable sessions.
    pub fn with_rng_seed(seed: u64) -> Self {
        Self {
            variables: IndexMap::new(),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Declare a variable, replacing any previous declaration of the same
    /// identifier.
    pub fn declare(&mut self, variable: Variable) {
        self.variables
            .insert(variable.identifier().to_string(), variable);
    }

    pub fn get(&self, identifier: &str) -> Option<&Variable> {
        self.variables.get(identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Variable> {
        self.variables.get_mut(identifier)
    }

    /// Shorthand for a variable's current value.
    pub fn value_of(&self, identifier: &str) -> Option<&QtiValue> {
        self.get(identifier).map(Variable::value)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Variable)> {
        self.variables.iter()
    }

    /// Borrow the random source.
    pub fn rng(&self) -> RefMut<'_, StdRng> {
        self.rng.borrow_mut()
    }
}
