//! Full-rescan strategy with a partial-selection heap.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::oracle::LogDetOracle;
use crate::strategy::{DUMMY_GAIN, GainEntry, SelectionStrategy};

/// Evaluates every remaining element per query and keeps the top `i + 1`
/// candidates in a min-heap, so `pop_kth_largest(i)` costs one oracle
/// evaluation per ground element and O(log i) heap work per candidate.
pub struct NonLazyStrategy {
    ground: HashSet<usize>,
    add_dummy: bool,
    /// Scratch heap reused across queries.
    heap: BinaryHeap<Reverse<GainEntry>>,
}

impl SelectionStrategy for NonLazyStrategy {
    fn over<O: LogDetOracle>(_oracle: &mut O, ground: &[usize], add_dummy: bool) -> Self {
        Self {
            ground: ground.iter().copied().collect(),
            add_dummy,
            heap: BinaryHeap::new(),
        }
    }

    fn pop_largest<O: LogDetOracle>(&mut self, oracle: &mut O) -> Option<usize> {
        self.pop_kth_largest(oracle, 0)
    }

    fn pop_kth_largest<O: LogDetOracle>(&mut self, oracle: &mut O, i: usize) -> Option<usize> {
        debug_assert!(self.add_dummy || i < self.ground.len());
        if i >= self.ground.len() {
            return None;
        }

        let mut heap = std::mem::take(&mut self.heap);
        heap.clear();

        for &e in &self.ground {
            let next = GainEntry {
                element: e,
                gain: oracle.marginal_gain(e),
            };
            if heap.len() <= i {
                heap.push(Reverse(next));
            } else if heap.peek().is_some_and(|Reverse(smallest)| *smallest < next) {
                heap.pop();
                heap.push(Reverse(next));
            }
        }

        // The heap root is the (i+1)-th largest entry overall.
        let Reverse(kth) = heap.pop().expect("ground set has at least i + 1 elements");
        self.heap = heap;

        if self.add_dummy && kth.gain <= DUMMY_GAIN {
            return None;
        }
        self.remove(kth.element);
        Some(kth.element)
    }

    fn remove(&mut self, e: usize) {
        debug_assert!(self.ground.contains(&e));
        self.ground.remove(&e);
    }
}
