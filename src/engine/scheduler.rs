//! Cancellable timed events with deterministic ordering.
//!
//! Front ends schedule follow-up work (for example "clear highlights two
//! seconds after an insert") instead of sleeping inside an operation.
//! Events are released in (due time, insertion order). Every event carries
//! the scheduler generation it was created in; [`TickScheduler::cancel_all`]
//! bumps the generation, so an event created before a reset or a new run
//! can never fire afterwards.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

/// Handle returned by [`TickScheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle {
    sequence: u64,
    generation: u64,
}

impl TickHandle {
    /// Generation the event was scheduled in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct PendingTick<E> {
    due_ms: u64,
    sequence: u64,
    generation: u64,
    event: E,
}

impl<E> PartialEq for PendingTick<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.sequence == other.sequence
    }
}

impl<E> Eq for PendingTick<E> {}

impl<E> PartialOrd for PendingTick<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for PendingTick<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.due_ms.cmp(&other.due_ms) {
            Ordering::Equal => self.sequence.cmp(&other.sequence),
            ord => ord,
        }
    }
}

/// Min-heap of pending events keyed by due time.
///
/// # Example
///
/// ```rust
/// use algoviz::engine::TickScheduler;
///
/// let mut scheduler = TickScheduler::new();
/// scheduler.schedule(2_000, "clear");
/// assert!(scheduler.drain_due(1_999).is_empty());
/// assert_eq!(scheduler.drain_due(2_000), vec!["clear"]);
/// ```
#[derive(Debug)]
pub struct TickScheduler<E> {
    queue: BinaryHeap<Reverse<PendingTick<E>>>,
    cancelled: HashSet<u64>,
    sequence: u64,
    generation: u64,
}

impl<E> Default for TickScheduler<E> {
    fn default() -> Self {
        Self {
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            sequence: 0,
            generation: 0,
        }
    }
}

impl<E> TickScheduler<E> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Schedule `event` to fire at `due_ms`.
    pub fn schedule(&mut self, due_ms: u64, event: E) -> TickHandle {
        let sequence = self.sequence;
        self.sequence += 1;
        self.queue.push(Reverse(PendingTick {
            due_ms,
            sequence,
            generation: self.generation,
            event,
        }));
        TickHandle {
            sequence,
            generation: self.generation,
        }
    }

    /// Cancel one pending event. Returns false if it already fired or was
    /// invalidated by [`cancel_all`](Self::cancel_all).
    pub fn cancel(&mut self, handle: TickHandle) -> bool {
        if handle.generation != self.generation {
            return false;
        }
        let pending = self
            .queue
            .iter()
            .any(|Reverse(tick)| tick.sequence == handle.sequence);
        pending && self.cancelled.insert(handle.sequence)
    }

    /// Drop every pending event and invalidate all outstanding handles.
    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
        self.generation += 1;
    }

    /// Remove and return all live events due at or before `now_ms`, in order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<E> {
        let mut fired = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due_ms > now_ms {
                break;
            }
            let Some(Reverse(tick)) = self.queue.pop() else {
                break;
            };
            if tick.generation != self.generation || self.cancelled.remove(&tick.sequence) {
                continue;
            }
            fired.push(tick.event);
        }
        fired
    }

    /// Due time of the earliest live event.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|Reverse(tick)| !self.cancelled.contains(&tick.sequence))
            .map(|Reverse(tick)| tick.due_ms)
            .min()
    }

    /// Number of live pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ordering() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(300, 'c');
        scheduler.schedule(100, 'a');
        scheduler.schedule(200, 'b');
        assert_eq!(scheduler.drain_due(1_000), vec!['a', 'b', 'c']);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_ties_break_by_insertion() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(50, 1);
        scheduler.schedule(50, 2);
        scheduler.schedule(50, 3);
        assert_eq!(scheduler.drain_due(50), vec![1, 2, 3]);
    }

    #[test]
    fn test_only_due_events_fire() {
        let mut scheduler = TickScheduler::new();
        scheduler.schedule(100, "early");
        scheduler.schedule(500, "late");
        assert_eq!(scheduler.drain_due(99), Vec::<&str>::new());
        assert_eq!(scheduler.drain_due(100), vec!["early"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(500));
    }

    #[test]
    fn test_cancel_single() {
        let mut scheduler = TickScheduler::new();
        let keep = scheduler.schedule(10, "keep");
        let drop = scheduler.schedule(20, "drop");
        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(10));
        assert_eq!(scheduler.drain_due(100), vec!["keep"]);
        assert!(!scheduler.cancel(keep));
    }

    #[test]
    fn test_cancel_all_invalidates_handles() {
        let mut scheduler = TickScheduler::new();
        let stale = scheduler.schedule(10, "stale");
        scheduler.cancel_all();
        assert_eq!(scheduler.generation(), 1);
        assert!(scheduler.is_empty());
        assert!(!scheduler.cancel(stale));

        let fresh = scheduler.schedule(10, "fresh");
        assert_eq!(fresh.generation(), 1);
        assert_eq!(scheduler.drain_due(10), vec!["fresh"]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Drained events come out sorted by due time.
        #[test]
        fn prop_drain_sorted(times in proptest::collection::vec(0u64..10_000, 0..100)) {
            let mut scheduler = TickScheduler::new();
            for &t in &times {
                scheduler.schedule(t, t);
            }
            let fired = scheduler.drain_due(u64::MAX);
            prop_assert_eq!(fired.len(), times.len());
            for pair in fired.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        /// Nothing scheduled before cancel_all ever fires.
        #[test]
        fn prop_cancel_all_is_total(before in 1usize..50, after in 0usize..50) {
            let mut scheduler = TickScheduler::new();
            for i in 0..before {
                scheduler.schedule(i as u64, false);
            }
            scheduler.cancel_all();
            for i in 0..after {
                scheduler.schedule(i as u64, true);
            }
            let fired = scheduler.drain_due(u64::MAX);
            prop_assert_eq!(fired.len(), after);
            prop_assert!(fired.iter().all(|&fresh| fresh));
        }
    }
}
