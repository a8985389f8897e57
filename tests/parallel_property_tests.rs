//! Parallel tests comparing all queue implementations
//!
//! These tests generate random sequences of operations and apply them to ALL
//! queues of a family simultaneously. After every operation all queues must
//! report the same length and the same minimum priority.
//!
//! ## Testing Strategy
//!
//! 1. **Seeded scripts**: a long script with unique priorities, where every
//!    queue must hand back exactly the same records in the same order
//! 2. **Generated scripts**: proptest sequences. Unindexed scripts repeat
//!    priorities and queues may break ties differently, so only priorities
//!    are compared. Indexed scripts reuse elements and must agree exactly.

mod common;

use comparative_heaps::{HeapError, IndexedPriorityQueue, PriorityQueue};
use common::{drain, indexed_queues, unindexed_queues, BoxedIndexedQueue, BoxedQueue};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;

const SCRIPT_LENGTH: usize = 100_000;
const ADD_PRIORITIES: u32 = 300_000;
const UNIVERSE: u64 = 1 << 19;

/// Source of priorities that are never handed out twice
struct UniquePriorities {
    fresh: Vec<u32>,
    used: FxHashSet<u32>,
}

impl UniquePriorities {
    fn new(rng: &mut StdRng) -> Self {
        let mut fresh: Vec<u32> = (0..ADD_PRIORITIES).collect();
        fresh.shuffle(rng);
        Self {
            fresh,
            used: FxHashSet::default(),
        }
    }

    fn next(&mut self) -> Option<u32> {
        while let Some(p) = self.fresh.pop() {
            if self.used.insert(p) {
                return Some(p);
            }
        }
        None
    }

    /// A random unused priority strictly below `bound`
    fn below(&mut self, rng: &mut StdRng, bound: u32) -> Option<u32> {
        if bound == 0 {
            return None;
        }
        let candidate = rng.gen_range(0..bound);
        self.used.insert(candidate).then_some(candidate)
    }
}

fn same_state<Q>(queues: &[(&'static str, Q)], step: usize)
where
    Q: PriorityQueue<u32, u32>,
{
    let (first_name, first) = &queues[0];
    for (name, queue) in &queues[1..] {
        assert_eq!(queue.len(), first.len(), "{name} vs {first_name} at step {step}");
        assert_eq!(queue.peek(), first.peek(), "{name} vs {first_name} at step {step}");
    }
}

fn extract_everywhere<Q>(queues: &mut [(&'static str, Q)], step: usize) -> Option<(u32, u32)>
where
    Q: PriorityQueue<u32, u32>,
{
    let mut results = queues.iter_mut().map(|(name, queue)| (*name, queue.extract_min()));
    let (first_name, expected) = results.next()?;
    for (name, result) in results {
        assert_eq!(result, expected, "{name} vs {first_name} at step {step}");
    }
    expected.ok()
}

#[test]
fn test_unindexed_queues_agree_on_seeded_script() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut priorities = UniquePriorities::new(&mut rng);
    let mut queues: Vec<(&'static str, BoxedQueue<u32>)> = unindexed_queues(UNIVERSE);
    let mut next_element = 0u32;

    for step in 0..SCRIPT_LENGTH {
        if rng.gen_bool(0.6) {
            let Some(priority) = priorities.next() else { break };
            for (_, queue) in queues.iter_mut() {
                assert!(queue.add(next_element, priority));
            }
            next_element += 1;
        } else {
            extract_everywhere(&mut queues, step);
        }
        same_state(&queues, step);
    }

    while extract_everywhere(&mut queues, SCRIPT_LENGTH).is_some() {}
    for (name, queue) in &queues {
        assert!(queue.is_empty(), "{name}");
    }
}

#[test]
fn test_indexed_queues_agree_on_seeded_script() {
    let mut rng = StdRng::seed_from_u64(0xDECAF);
    let mut priorities = UniquePriorities::new(&mut rng);
    let mut queues: Vec<(&'static str, BoxedIndexedQueue<u32>)> = indexed_queues(UNIVERSE);
    let mut next_element = 0u32;

    for step in 0..SCRIPT_LENGTH {
        match rng.gen_range(0..10) {
            0..=4 => {
                let Some(priority) = priorities.next() else { break };
                for (_, queue) in queues.iter_mut() {
                    assert!(queue.add(next_element, priority));
                }
                next_element += 1;
            }
            5..=6 if next_element > 0 => {
                let element = rng.gen_range(0..next_element);
                let current = queues[0].1.priority_of(&element).copied();
                let target = current.and_then(|current| priorities.below(&mut rng, current));
                for (name, queue) in queues.iter_mut() {
                    assert_eq!(queue.priority_of(&element).copied(), current, "{name} at step {step}");
                    if let Some(target) = target {
                        assert_eq!(queue.decrease_priority(&element, target), Ok(true), "{name} at step {step}");
                    }
                }
            }
            _ => {
                if let Some((element, _)) = extract_everywhere(&mut queues, step) {
                    for (name, queue) in &queues {
                        assert!(!queue.contains(&element), "{name} at step {step}");
                    }
                }
            }
        }
        same_state(&queues, step);
    }

    while extract_everywhere(&mut queues, SCRIPT_LENGTH).is_some() {}
}

/// Apply a generated script to every unindexed queue
///
/// Ops: 0 and 1 add, 2 extracts, 3 occasionally clears
fn run_unindexed_script(ops: &[(u8, u16)]) -> Result<(), TestCaseError> {
    let mut queues = unindexed_queues::<u32>(UNIVERSE);
    for (i, &(op, value)) in ops.iter().enumerate() {
        match op % 4 {
            0 | 1 => {
                for (_, queue) in queues.iter_mut() {
                    prop_assert!(queue.add(i as u32, u32::from(value)));
                }
            }
            2 => {
                let mut priorities = queues.iter_mut().map(|(_, q)| q.extract_min().map(|(_, p)| p));
                let expected = priorities.next();
                for got in priorities {
                    prop_assert_eq!(Some(got), expected);
                }
            }
            _ if value % 16 == 0 => {
                for (_, queue) in queues.iter_mut() {
                    queue.clear();
                }
            }
            _ => {}
        }
        let (_, first) = &queues[0];
        let min = first.peek().map(|(_, &p)| p);
        for (name, queue) in &queues[1..] {
            prop_assert_eq!(queue.len(), first.len(), "{}", name);
            prop_assert_eq!(queue.peek().map(|(_, &p)| p), min, "{}", name);
        }
    }

    let mut reference: Option<Vec<u32>> = None;
    for (name, queue) in queues.iter_mut() {
        let drained: Vec<u32> = drain(queue).into_iter().map(|(_, p)| p).collect();
        prop_assert!(drained.windows(2).all(|w| w[0] <= w[1]), "{} not sorted", name);
        match &reference {
            None => reference = Some(drained),
            Some(expected) => prop_assert_eq!(&drained, expected, "{}", name),
        }
    }
    Ok(())
}

/// Apply a generated script to every indexed queue
///
/// Elements come from a small range so adds collide with live elements.
/// Priorities encode the element, so two live records never tie and every
/// queue must return exactly the same records.
fn run_indexed_script(ops: &[(u8, u8, u16)]) -> Result<(), TestCaseError> {
    let mut queues = indexed_queues::<u32>(UNIVERSE);
    for &(op, element, value) in ops {
        let element = u32::from(element % 32);
        let priority = u32::from(value) * 32 + element;
        match op % 3 {
            0 => {
                let mut added = queues.iter_mut().map(|(_, q)| q.add(element, priority));
                let expected = added.next();
                for got in added {
                    prop_assert_eq!(Some(got), expected);
                }
            }
            1 => {
                let mut outcomes = queues
                    .iter_mut()
                    .map(|(_, q)| q.decrease_priority(&element, priority));
                let expected = outcomes.next();
                for got in outcomes {
                    prop_assert_eq!(Some(got), expected);
                }
            }
            _ => {
                let mut records = queues.iter_mut().map(|(_, q)| q.extract_min());
                let expected = records.next();
                for got in records {
                    prop_assert_eq!(Some(got), expected);
                }
            }
        }
        let (_, first) = &queues[0];
        for (name, queue) in &queues[1..] {
            prop_assert_eq!(queue.len(), first.len(), "{}", name);
            prop_assert_eq!(queue.peek(), first.peek(), "{}", name);
            prop_assert_eq!(queue.priority_of(&element), first.priority_of(&element), "{}", name);
        }
    }

    let mut reference: Option<Vec<(u32, u32)>> = None;
    for (name, queue) in queues.iter_mut() {
        let drained = drain(queue);
        prop_assert_eq!(queue.extract_min(), Err(HeapError::EmptyStructure));
        match &reference {
            None => reference = Some(drained),
            Some(expected) => prop_assert_eq!(&drained, expected, "{}", name),
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_unindexed_queues_agree(ops in prop::collection::vec((0u8..4, 0u16..2_000), 0..400)) {
        run_unindexed_script(&ops)?;
    }

    #[test]
    fn prop_indexed_queues_agree(
        ops in prop::collection::vec((0u8..3, any::<u8>(), 0u16..500), 0..400)
    ) {
        run_indexed_script(&ops)?;
    }
}
