//! Value model semantics tests
//!
//! Covers the equality rules, emptiness behavior and the distinct()
//! container operation, including the algebraic properties the processing
//! engines depend on.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use qtikit_types::{
    BaseType, Cardinality, MultipleContainer, OrderedContainer, QtiDuration, QtiValue,
    RecordContainer,
};
use rstest::rstest;

fn identifiers(ids: &[&str]) -> MultipleContainer {
    MultipleContainer::with_values(
        BaseType::Identifier,
        ids.iter().map(|id| QtiValue::identifier(*id)),
    )
    .unwrap()
}

#[test]
fn multiset_equality_counts_duplicates() {
    assert_eq!(identifiers(&["A", "B", "B"]), identifiers(&["B", "B", "A"]));
    assert_ne!(identifiers(&["A", "B", "B"]), identifiers(&["A", "A", "B"]));
}

#[test]
fn pair_containers_use_symmetric_element_equality() {
    let a = MultipleContainer::with_values(BaseType::Pair, [QtiValue::pair("X", "Y")]).unwrap();
    let b = MultipleContainer::with_values(BaseType::Pair, [QtiValue::pair("Y", "X")]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn duration_equality_ignores_field_spelling() {
    let a = QtiValue::duration(QtiDuration::parse("PT1M30S").unwrap());
    let b = QtiValue::duration(QtiDuration::parse("PT90S").unwrap());
    assert_eq!(a, b);
}

#[rstest]
#[case(QtiValue::Null, true)]
#[case(QtiValue::string(""), true)]
#[case(QtiValue::string("x"), false)]
#[case(QtiValue::integer(0), false)]
#[case(QtiValue::Multiple(MultipleContainer::new(BaseType::Integer)), true)]
#[case(QtiValue::Ordered(OrderedContainer::new(BaseType::Integer)), true)]
#[case(QtiValue::Record(RecordContainer::new()), true)]
fn emptiness(#[case] value: QtiValue, #[case] expected: bool) {
    assert_eq!(value.is_null(), expected);
}

#[test]
fn scalars_report_single_cardinality() {
    for value in [
        QtiValue::boolean(true),
        QtiValue::integer(7),
        QtiValue::float(1.5),
        QtiValue::point(3, 4),
        QtiValue::pair("A", "B"),
    ] {
        assert_eq!(value.cardinality(), Some(Cardinality::Single));
    }
}

#[test]
fn record_reports_no_base_type() {
    let mut record = RecordContainer::new();
    record.set("score", QtiValue::float(0.5)).unwrap();
    let value = QtiValue::Record(record);
    assert_eq!(value.base_type(), None);
    assert_eq!(value.cardinality(), Some(Cardinality::Record));
}

proptest! {
    // distinct() is idempotent whatever the element mix.
    #[test]
    fn distinct_is_idempotent(values in proptest::collection::vec(-20i32..20, 0..30)) {
        let container = MultipleContainer::with_values(
            BaseType::Integer,
            values.into_iter().map(QtiValue::integer),
        )
        .unwrap();
        let once = container.distinct();
        let twice = once.distinct();
        prop_assert_eq!(once.values(), twice.values());
    }

    // distinct() never grows a container and preserves membership.
    #[test]
    fn distinct_preserves_membership(values in proptest::collection::vec(-20i32..20, 0..30)) {
        let container = MultipleContainer::with_values(
            BaseType::Integer,
            values.iter().copied().map(QtiValue::integer),
        )
        .unwrap();
        let reduced = container.distinct();
        prop_assert!(reduced.len() <= container.len());
        for v in values {
            prop_assert!(reduced.contains(&QtiValue::integer(v)));
        }
    }
}
