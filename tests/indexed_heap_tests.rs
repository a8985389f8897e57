//! Tests for the IndexedPriorityQueue implementations
//!
//! Covers the element index: duplicate rejection, `contains` and
//! `priority_of` bookkeeping, and `decrease_priority` in all its outcomes.

mod common;

use comparative_heaps::{HeapError, IndexedPriorityQueue, PriorityQueue};
use common::{drain, indexed_queues, BoxedIndexedQueue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

const UNIVERSE: u64 = 1 << 16;

fn check_decrease_scenario(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    queue.add(1, 1);
    queue.add(2, 2);
    queue.add(3, 3);
    assert_eq!(queue.decrease_priority(&2, 0), Ok(true), "{name}");
    assert_eq!(queue.priority_of(&2), Some(&0), "{name}");
    assert_eq!(queue.peek(), Some((&2, &0)), "{name}");
    assert_eq!(drain(queue), vec![(2, 0), (1, 1), (3, 3)], "{name}");
}

/// Equal, larger and absent requests report `false` and change nothing
fn check_rejected_decreases(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    queue.add(1, 10);
    queue.add(2, 20);
    assert_eq!(queue.decrease_priority(&1, 10), Ok(false), "{name}");
    assert_eq!(queue.decrease_priority(&1, 15), Ok(false), "{name}");
    assert_eq!(queue.decrease_priority(&9, 0), Ok(false), "{name}");
    assert_eq!(queue.priority_of(&1), Some(&10), "{name}");
    assert_eq!(queue.len(), 2, "{name}");
    assert!(!queue.contains(&9), "{name}");
    assert_eq!(drain(queue), vec![(1, 10), (2, 20)], "{name}");
}

fn check_duplicate_add_rejected(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    assert!(queue.add(5, 50), "{name}");
    assert!(!queue.add(5, 1), "{name}");
    assert_eq!(queue.len(), 1, "{name}");
    assert_eq!(queue.priority_of(&5), Some(&50), "{name}");
    assert_eq!(queue.extract_min(), Ok((5, 50)), "{name}");
    assert!(queue.add(5, 1), "{name}");
    assert_eq!(queue.priority_of(&5), Some(&1), "{name}");
}

fn check_index_follows_extraction(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    for element in 0..40u32 {
        queue.add(element, 1_000 - element * 10);
    }
    for step in 0..40u32 {
        let element = 39 - step;
        assert!(queue.contains(&element), "{name}");
        assert_eq!(queue.extract_min(), Ok((element, 1_000 - element * 10)), "{name}");
        assert!(!queue.contains(&element), "{name}");
        assert_eq!(queue.priority_of(&element), None, "{name}");
        assert_eq!(queue.decrease_priority(&element, 0), Ok(false), "{name}");
    }
}

fn check_clear_resets_index(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    for element in 0..10 {
        queue.add(element, element + 100);
    }
    queue.clear();
    assert!(queue.is_empty(), "{name}");
    assert!(!queue.contains(&3), "{name}");
    assert_eq!(queue.extract_min(), Err(HeapError::EmptyStructure), "{name}");
    assert!(queue.add(3, 7), "{name}");
    assert_eq!(queue.peek(), Some((&3, &7)), "{name}");
}

/// Repeated decreases of the same element, including the current minimum
fn check_repeated_decreases(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    for element in 0..20u32 {
        queue.add(element, 500 + element);
    }
    for target in (100..=400).rev().step_by(50) {
        assert_eq!(queue.decrease_priority(&13, target), Ok(true), "{name}");
        assert_eq!(queue.peek(), Some((&13, &target)), "{name}");
    }
    assert_eq!(queue.decrease_priority(&13, 0), Ok(true), "{name}");
    assert_eq!(queue.decrease_priority(&0, 1), Ok(true), "{name}");
    assert_eq!(queue.extract_min(), Ok((13, 0)), "{name}");
    assert_eq!(queue.extract_min(), Ok((0, 1)), "{name}");
    assert_eq!(queue.len(), 18, "{name}");
}

/// Random adds, decreases and extractions against a map model
fn check_against_model(name: &str, queue: &mut BoxedIndexedQueue<u32>) {
    let mut rng = StdRng::seed_from_u64(17);
    let mut model: HashMap<u32, u32> = HashMap::new();
    for _ in 0..3_000 {
        match rng.gen_range(0..10) {
            0..=4 => {
                let element = rng.gen_range(0..400);
                let priority = rng.gen_range(0..60_000);
                let fresh = !model.contains_key(&element);
                assert_eq!(queue.add(element, priority), fresh, "{name}");
                model.entry(element).or_insert(priority);
            }
            5..=7 => {
                let element = rng.gen_range(0..400);
                let priority = rng.gen_range(0..60_000);
                let improves = model.get(&element).map_or(false, |&p| priority < p);
                assert_eq!(queue.decrease_priority(&element, priority), Ok(improves), "{name}");
                if improves {
                    model.insert(element, priority);
                }
            }
            _ => {
                let lowest = model.values().min().copied();
                match queue.extract_min() {
                    Ok((element, priority)) => {
                        assert_eq!(Some(priority), lowest, "{name}");
                        assert_eq!(model.remove(&element), Some(priority), "{name}");
                    }
                    Err(err) => {
                        assert_eq!(err, HeapError::EmptyStructure, "{name}");
                        assert!(model.is_empty(), "{name}");
                    }
                }
            }
        }
        assert_eq!(queue.len(), model.len(), "{name}");
    }
    for (element, priority) in &model {
        assert_eq!(queue.priority_of(element), Some(priority), "{name}");
    }
}

macro_rules! indexed_test {
    ($test_name:ident, $helper:ident) => {
        #[test]
        fn $test_name() {
            for (name, mut queue) in indexed_queues::<u32>(UNIVERSE) {
                $helper(name, &mut queue);
            }
        }
    };
}

indexed_test!(test_decrease_scenario, check_decrease_scenario);
indexed_test!(test_rejected_decreases, check_rejected_decreases);
indexed_test!(test_duplicate_add_rejected, check_duplicate_add_rejected);
indexed_test!(test_index_follows_extraction, check_index_follows_extraction);
indexed_test!(test_clear_resets_index, check_clear_resets_index);
indexed_test!(test_repeated_decreases, check_repeated_decreases);
indexed_test!(test_against_model, check_against_model);

#[test]
fn test_string_elements() {
    for (name, mut queue) in indexed_queues::<String>(UNIVERSE) {
        queue.add("a".to_string(), 30);
        queue.add("b".to_string(), 20);
        assert_eq!(queue.decrease_priority(&"a".to_string(), 10), Ok(true), "{name}");
        assert!(queue.contains(&"b".to_string()), "{name}");
        assert_eq!(queue.extract_min(), Ok(("a".to_string(), 10)), "{name}");
    }
}
