//! QTI runtime value model
//!
//! This crate defines the value lattice shared by the expression and rule
//! processing engines:
//!
//! - **`BaseType` / `Cardinality`**: the two axes of every QTI type
//!   constraint, derived from value variants rather than tracked separately
//! - **`QtiValue`**: the closed union over scalars (boolean, integer, float,
//!   string, identifier, point, pair, directedPair, duration, uri,
//!   intOrIdentifier), containers (multiple, ordered, record) and NULL
//! - **Containers**: base-type-homogeneous bags/sequences with multiset or
//!   positional equality and a `distinct()` operation, plus heterogeneous
//!   records
//! - **`QtiDuration`**: ISO-8601 periods normalized to second totals
//!
//! Equality throughout is QTI value equality: pairs compare symmetrically,
//! multiple containers as multisets, ordered containers positionally and
//! durations by normalized seconds.

pub mod container;
pub mod duration;
pub mod types;
pub mod value;

pub use container::{ContainerError, MultipleContainer, OrderedContainer, RecordContainer};
pub use duration::{DurationParseError, QtiDuration};
pub use types::{BaseType, Cardinality, is_valid_identifier};
pub use value::{IntOrIdentifier, QtiDirectedPair, QtiPair, QtiPoint, QtiValue};
