use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use redblack_map::{Error, NaturalOrder, Reversed, StrictSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_000;

fn value_strategy() -> impl Strategy<Value = i64> {
    -1_500i64..1_500i64
}

#[test]
fn duplicate_insert_is_an_error() {
    let mut set = StrictSet::new();
    for value in [5, 3, 8] {
        set.insert(value).unwrap();
    }

    assert_eq!(set.insert(3), Err(Error::DuplicateKey));
    assert_eq!(set.len(), 3);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 5, 8]);
}

#[test]
fn building_from_repeated_values_fails() {
    assert_eq!(StrictSet::try_from_iter([1, 2, 1], NaturalOrder).err(), Some(Error::DuplicateKey));

    let set = StrictSet::try_from_iter(["b", "c", "a"], Reversed(NaturalOrder)).unwrap();
    assert_eq!(set.first(), Some(&"c"));
    assert_eq!(set.last(), Some(&"a"));
    assert_eq!(format!("{set:?}"), r#"{"c", "b", "a"}"#);
}

#[test]
fn remove_then_reinsert() {
    let mut set = StrictSet::try_from_iter(0..10, NaturalOrder).unwrap();
    assert!(set.remove(&4));
    assert!(!set.remove(&4));
    assert_eq!(set.take(&7), Some(7));
    set.insert(4).unwrap();
    assert!(set.contains(&4));
    assert!(!set.contains(&7));
    assert_eq!(set.len(), 9);
}

#[test]
fn copy_checks_room_first() {
    let set = StrictSet::try_from_iter([3, 1, 2], NaturalOrder).unwrap();

    let mut short = [0; 2];
    assert_eq!(
        set.copy_to(&mut short, 0),
        Err(Error::Bounds {
            offset: 0,
            capacity: 2,
            required: 3,
        })
    );
    assert_eq!(short, [0; 2]);

    let mut exact = [0; 4];
    set.copy_to(&mut exact, 1).unwrap();
    assert_eq!(exact, [0, 1, 2, 3]);
}

#[test]
fn copies_are_independent() {
    let mut original = StrictSet::try_from_iter([1, 2, 3], NaturalOrder).unwrap();
    let copy = StrictSet::from_set(&original);
    original.clear();
    original.insert(9).unwrap();

    assert_eq!(copy.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(original.iter().copied().collect::<Vec<_>>(), [9]);
    assert!(copy != original);
}

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random operation sequence on both sets; a duplicate insert must fail
    /// exactly where `BTreeSet::insert` reports the value was already present.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut set: StrictSet<i64> = StrictSet::new();
        let mut model: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    let expected = if model.insert(*v) { Ok(()) } else { Err(Error::DuplicateKey) };
                    prop_assert_eq!(set.insert(*v), expected, "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(set.remove(v), model.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(set.take(v), model.take(v), "take({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(set.contains(v), model.contains(v), "contains({})", v);
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(set.pop_first(), model.pop_first());
                }
                SetOp::PopLast => {
                    prop_assert_eq!(set.pop_last(), model.pop_last());
                }
            }
            prop_assert_eq!(set.len(), model.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(set.first(), model.first());
            prop_assert_eq!(set.last(), model.last());
        }

        prop_assert!(set.iter().eq(model.iter()));
        prop_assert!(set.iter().rev().eq(model.iter().rev()));
    }
}
