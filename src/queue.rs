//! Ordered storage for pending one-shot actions.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::time::Instant;

/// A queued action waiting to fire.
///
/// `seq` is assigned at insertion and breaks ties between equal due
/// times, so entries sharing a due time pop in submission order.
pub(crate) struct PendingAction {
    due: Instant,
    seq: u64,
    run: Box<dyn FnOnce()>,
}

impl PendingAction {
    /// The virtual time at which this entry becomes eligible to fire.
    pub(crate) fn due(&self) -> Instant {
        self.due
    }

    /// Consumes the entry and runs its action.
    pub(crate) fn invoke(self) {
        (self.run)();
    }
}

impl PartialEq for PendingAction {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for PendingAction {}

impl Ord for PendingAction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap ordering: earliest due first, then lowest seq
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingAction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAction")
            .field("due", &self.due)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

/// Pending actions ordered by `(due, seq)`.
///
/// Ascending due order with FIFO tie-breaking falls out of the heap key:
/// an action whose due time equals the latest already-queued entry for
/// that timestamp always lands after it.
pub(crate) struct EventQueue {
    heap: BinaryHeap<PendingAction>,
    next_seq: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub(crate) fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Inserts an action due at `due`, returning its sequence token.
    pub(crate) fn insert(&mut self, due: Instant, run: Box<dyn FnOnce()>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(PendingAction { due, seq, run });
        seq
    }

    /// Removes and returns the earliest entry if it is due at or before
    /// `now`.
    pub(crate) fn pop_if_due(&mut self, now: Instant) -> Option<PendingAction> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop()
    }

    /// Due time of the earliest pending entry.
    pub(crate) fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|entry| entry.due)
    }

    /// Number of pending entries.
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no entries are pending.
    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending entry without running it.
    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}

impl fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.heap.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}
