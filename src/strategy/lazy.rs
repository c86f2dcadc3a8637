//! Lazy strategy: stale gains as upper bounds.

use std::collections::{BinaryHeap, HashSet};

use smallvec::SmallVec;

use crate::oracle::LogDetOracle;
use crate::strategy::{DUMMY_GAIN, GainEntry, SelectionStrategy};

/// Keeps a max-heap of `(gain, element)` pairs seeded with the diagonal
/// gains. Because marginal gains only shrink as the selection grows, a
/// popped entry needs recomputation at most once per query round: if its
/// fresh gain still tops the heap it is the true maximum and is
/// committed, otherwise it is pushed back with the tightened bound.
///
/// Entries for removed elements stay in the heap and are filtered when
/// they surface.
pub struct LazyStrategy {
    ground: HashSet<usize>,
    add_dummy: bool,
    queue: BinaryHeap<GainEntry>,
}

impl SelectionStrategy for LazyStrategy {
    fn over<O: LogDetOracle>(oracle: &mut O, ground: &[usize], add_dummy: bool) -> Self {
        let mut queue = BinaryHeap::with_capacity(ground.len());
        for &e in ground {
            queue.push(GainEntry {
                element: e,
                gain: oracle.last_gain(e),
            });
        }
        Self {
            ground: ground.iter().copied().collect(),
            add_dummy,
            queue,
        }
    }

    fn pop_largest<O: LogDetOracle>(&mut self, oracle: &mut O) -> Option<usize> {
        loop {
            debug_assert!(self.add_dummy || !self.queue.is_empty());
            if self.add_dummy
                && self
                    .queue
                    .peek()
                    .is_none_or(|top| top.gain <= DUMMY_GAIN)
            {
                return None;
            }

            let entry = self.queue.pop()?;
            if !self.ground.contains(&entry.element) {
                // Stale entry for an element removed elsewhere.
                continue;
            }

            let gain = oracle.marginal_gain(entry.element);
            if self.queue.peek().is_none_or(|top| gain >= top.gain) {
                if self.add_dummy && gain <= DUMMY_GAIN {
                    return None;
                }
                self.remove(entry.element);
                return Some(entry.element);
            }

            self.queue.push(GainEntry {
                element: entry.element,
                gain,
            });
        }
    }

    fn pop_kth_largest<O: LogDetOracle>(&mut self, oracle: &mut O, i: usize) -> Option<usize> {
        debug_assert!(self.add_dummy || i < self.ground.len());

        let mut skipped: SmallVec<[usize; 8]> = SmallVec::new();
        for _ in 0..i {
            match self.pop_largest(oracle) {
                Some(e) => skipped.push(e),
                None => break,
            }
        }

        let ret = self.pop_largest(oracle);

        // Reinstate the skipped elements; their last computed gains are
        // still valid upper bounds.
        for &e in &skipped {
            self.ground.insert(e);
            self.queue.push(GainEntry {
                element: e,
                gain: oracle.last_gain(e),
            });
        }

        ret
    }

    fn remove(&mut self, e: usize) {
        debug_assert!(self.ground.contains(&e));
        self.ground.remove(&e);
    }
}
