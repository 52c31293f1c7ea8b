//! Property tests of the slotted containers
//!
//! Random insert/erase sequences are checked against a `BTreeMap` model.

use std::collections::BTreeMap;

use nextgran_adt::{SlottedArray, SlottedHeapArray, SlottedIdTable, SlottedVector};
use nextgran_common::DuUeIndex;
use proptest::prelude::*;

const CAPACITY: usize = 64;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, u32),
    Emplace(usize, u32),
    Erase(usize),
}

fn op(max_index: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..max_index, any::<u32>()).prop_map(|(idx, v)| Op::Insert(idx, v)),
        (0..max_index, any::<u32>()).prop_map(|(idx, v)| Op::Emplace(idx, v)),
        (0..max_index).prop_map(Op::Erase),
    ]
}

fn apply_model(model: &mut BTreeMap<usize, u32>, op: &Op) {
    match *op {
        Op::Insert(idx, v) => {
            model.entry(idx).or_insert(v);
        }
        Op::Emplace(idx, v) => {
            model.insert(idx, v);
        }
        Op::Erase(idx) => {
            model.remove(&idx);
        }
    }
}

proptest! {
    #[test]
    fn prop_slotted_array_references_stay_put(
        pinned in 0..CAPACITY,
        value in any::<u32>(),
        ops in prop::collection::vec(op(CAPACITY), 0..200),
    ) {
        let mut array: SlottedArray<u32, CAPACITY> = SlottedArray::new();
        prop_assert!(array.insert(pinned, value));
        let addr = &array[pinned] as *const u32;

        for op in ops.iter() {
            match *op {
                Op::Insert(idx, v) if idx != pinned => { array.insert(idx, v); }
                Op::Emplace(idx, v) if idx != pinned => { array.emplace(idx, v); }
                Op::Erase(idx) if idx != pinned => { array.erase(idx); }
                _ => {}
            }
            prop_assert!(std::ptr::eq(addr, &array[pinned]));
            prop_assert_eq!(array[pinned], value);
        }
    }

    #[test]
    fn prop_slotted_heap_array_references_stay_put(
        pinned in 0..CAPACITY,
        ops in prop::collection::vec(op(CAPACITY), 0..200),
    ) {
        let mut array: SlottedHeapArray<u32, CAPACITY> = SlottedHeapArray::new();
        array.emplace(pinned, 7);
        let addr = &array[pinned] as *const u32;

        for op in ops.iter() {
            match *op {
                Op::Insert(idx, v) | Op::Emplace(idx, v) if idx != pinned => {
                    array.emplace(idx, v);
                }
                Op::Erase(idx) if idx != pinned => { array.erase(idx); }
                _ => {}
            }
        }
        prop_assert!(std::ptr::eq(addr, &array[pinned]));
        prop_assert_eq!(array[pinned], 7);
    }

    #[test]
    fn prop_slotted_array_matches_model(ops in prop::collection::vec(op(CAPACITY), 0..300)) {
        let mut array: SlottedArray<u32, CAPACITY> = SlottedArray::new();
        let mut model = BTreeMap::new();

        for op in ops.iter() {
            match *op {
                Op::Insert(idx, v) => {
                    prop_assert_eq!(array.insert(idx, v), !model.contains_key(&idx));
                }
                Op::Emplace(idx, v) => { array.emplace(idx, v); }
                Op::Erase(idx) => {
                    prop_assert_eq!(array.erase(idx), model.contains_key(&idx));
                }
            }
            apply_model(&mut model, op);
            prop_assert_eq!(array.len(), model.len());
        }

        let pairs: Vec<(usize, u32)> = array.iter_indexed().map(|(i, v)| (i, *v)).collect();
        let expected: Vec<(usize, u32)> = model.into_iter().collect();
        prop_assert_eq!(pairs, expected);
    }

    #[test]
    fn prop_slotted_vector_count_and_order(ops in prop::collection::vec(op(500), 0..300)) {
        let mut vec: SlottedVector<u32> = SlottedVector::new();
        let mut model = BTreeMap::new();

        for op in ops.iter() {
            match *op {
                Op::Insert(idx, v) => {
                    prop_assert_eq!(vec.insert(idx, v), !model.contains_key(&idx));
                }
                Op::Emplace(idx, v) => { vec.emplace(idx, v); }
                Op::Erase(idx) => {
                    prop_assert_eq!(vec.erase(idx), model.contains_key(&idx));
                }
            }
            apply_model(&mut model, op);
            prop_assert_eq!(vec.len(), model.len());
            prop_assert_eq!(vec.unsorted().len(), model.len());

            let keys: Vec<usize> = vec.keys().collect();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }

        let pairs: Vec<(usize, u32)> = vec.iter_indexed().map(|(i, v)| (i, *v)).collect();
        let expected: Vec<(usize, u32)> = model.into_iter().collect();
        prop_assert_eq!(pairs, expected);
    }

    #[test]
    fn prop_find_first_empty_is_first_hole(ops in prop::collection::vec(op(CAPACITY), 0..200)) {
        let mut array: SlottedArray<u32, CAPACITY> = SlottedArray::new();
        let mut vec: SlottedVector<u32> = SlottedVector::new();
        for op in ops.iter() {
            match *op {
                Op::Insert(idx, v) | Op::Emplace(idx, v) => {
                    array.emplace(idx, v);
                    vec.emplace(idx, v);
                }
                Op::Erase(idx) => {
                    array.erase(idx);
                    vec.erase(idx);
                }
            }
        }

        let hole = array.find_first_empty(0);
        prop_assert!(!array.contains(hole));
        prop_assert!((0..hole).all(|j| array.contains(j)));

        let hole = vec.find_first_empty(0);
        prop_assert!(!vec.contains(hole));
        prop_assert!((0..hole).all(|j| vec.contains(j)));
    }
}

#[test]
fn test_ue_table_allocates_in_order() {
    let mut table: SlottedIdTable<DuUeIndex, u32, 8> = SlottedIdTable::new();
    for expected in 0..8u16 {
        let ue = table.find_first_empty(DuUeIndex::new(0).unwrap()).unwrap();
        assert_eq!(ue.value(), expected);
        assert!(table.insert(ue, u32::from(expected)));
    }
    assert!(table.find_first_empty(DuUeIndex::new(0).unwrap()).is_none());

    assert!(table.erase(DuUeIndex::new(3).unwrap()));
    assert_eq!(table.find_first_empty(DuUeIndex::new(0).unwrap()), DuUeIndex::new(3));
}
