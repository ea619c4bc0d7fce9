//! The virtual-time scheduler engine.
//!
//! [`VirtualScheduler`] owns a virtual clock and an ordered queue of
//! pending actions. Time moves only through explicit calls (`run`, `step`,
//! `advance_time`, `set_time`); each move synchronously fires every action
//! that becomes due, in due-time order with FIFO ties, including actions
//! scheduled by other actions during the same move.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::cancel::CancelToken;
use crate::queue::EventQueue;
use crate::time::{Duration, Instant};

/// Error returned by [`VirtualScheduler::try_schedule_repeating`] when the
/// repeat interval is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("repeat interval {interval} is negative")]
pub struct NegativeInterval {
    /// The offending interval.
    pub interval: Duration,
}

/// Shared engine state behind a scheduler handle.
struct Core {
    now: Cell<Instant>,
    queue: RefCell<EventQueue>,
    draining: Cell<bool>,
}

impl Core {
    fn insert(&self, due: Instant, run: Box<dyn FnOnce()>) {
        let seq = self.queue.borrow_mut().insert(due, run);
        tracing::trace!(due = %due, seq, "enqueued action");
    }
}

/// Clears the drain flag when the loop exits, including by unwinding out
/// of a firing action.
struct DrainGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DrainGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Self-rescheduling wrapper around a repeating action.
///
/// Keeps its own next-due bookkeeping so the occurrence chain stays
/// anchored to the original cadence: a large time jump drains every
/// skipped occurrence instead of stalling the series at `now` plus one
/// interval. The back-reference to the engine is weak; a wrapper that
/// outlives its scheduler simply has nothing left to reschedule.
struct RepeatingAction {
    core: Weak<Core>,
    token: CancelToken,
    interval: Duration,
    next_due: Cell<Instant>,
    action: RefCell<Box<dyn FnMut()>>,
}

impl RepeatingAction {
    /// Runs one occurrence: bail out if cancelled, enqueue the next
    /// occurrence, then invoke the body.
    ///
    /// The next occurrence must be enqueued before the body runs: a body
    /// that cancels its own token leaves that occurrence to pop and
    /// no-op, so cancellation affects future firings only.
    fn fire(self: Rc<Self>) {
        if self.token.is_cancelled() {
            tracing::trace!("repeating occurrence popped after cancellation");
            return;
        }
        let next = self.next_due.get().advanced_by(self.interval);
        self.next_due.set(next);
        if let Some(core) = self.core.upgrade() {
            let occurrence = Rc::clone(&self);
            core.insert(next, Box::new(move || occurrence.fire()));
        }
        (&mut *self.action.borrow_mut())();
    }
}

/// A deterministic, manually-driven scheduler over virtual time.
///
/// The clock starts at [`Instant::ORIGIN`] and moves only when told to.
/// Draining is synchronous and reentrancy-safe: at most one drain loop is
/// active per scheduler, and a time change made from inside a firing
/// action is absorbed by the loop already running, which re-reads the
/// clock on every iteration. Handles are cheap clones sharing one engine,
/// so actions may capture a clone and schedule further work while firing.
///
/// The scheduler is single-threaded by design and does not implement
/// `Send`; actions are plain closures without `Send` bounds, free to
/// capture and mutate local test state.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use timelab::{Duration, Instant, VirtualScheduler};
///
/// let scheduler = VirtualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// scheduler.schedule_after(scheduler.now() + Duration::from_secs(3), move || flag.set(true));
///
/// scheduler.run();
/// assert!(fired.get());
/// assert_eq!(scheduler.now(), Instant::from_secs(3));
/// ```
#[derive(Clone)]
pub struct VirtualScheduler {
    core: Rc<Core>,
}

impl VirtualScheduler {
    /// Creates a scheduler with the clock at [`Instant::ORIGIN`].
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(Instant::ORIGIN)
    }

    /// Creates a scheduler with the clock preset to `now`.
    #[must_use]
    pub fn starting_at(now: Instant) -> Self {
        Self {
            core: Rc::new(Core {
                now: Cell::new(now),
                queue: RefCell::new(EventQueue::new()),
                draining: Cell::new(false),
            }),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.core.now.get()
    }

    /// The scheduling tolerance, always zero.
    ///
    /// The engine never coalesces or reorders by tolerance; this exists
    /// for consumers whose scheduler interface expects one.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn minimum_tolerance(&self) -> Duration {
        Duration::ZERO
    }

    /// Number of actions waiting to fire.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.core.queue.borrow().len()
    }

    /// Whether no actions are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.core.queue.borrow().is_empty()
    }

    /// Drops every pending action without firing it. The clock does not
    /// move, and repeating actions stop for good: their queued
    /// occurrences are gone and nothing remains to reschedule them.
    pub fn clear(&self) {
        self.core.queue.borrow_mut().clear();
        tracing::debug!(now = %self.now(), "cleared pending actions");
    }

    /// Schedules a one-shot action at the current time.
    ///
    /// Equivalent to `schedule_after(self.now(), action)`: the action
    /// fires on the next drain, after anything already queued at or
    /// before the current time.
    pub fn schedule_immediate(&self, action: impl FnOnce() + 'static) {
        self.schedule_after(self.now(), action);
    }

    /// Schedules a one-shot action to fire once the clock reaches `due`.
    ///
    /// `due` may lie in the past; the action then fires on the very next
    /// drain. Actions with equal due times fire in submission order.
    pub fn schedule_after(&self, due: Instant, action: impl FnOnce() + 'static) {
        self.core.insert(due, Box::new(action));
    }

    /// Schedules `action` to fire at `due` and then every `interval`
    /// thereafter, until the returned token is cancelled.
    ///
    /// The next occurrence is enqueued before the current one runs, so an
    /// action cancelling its own token still lets the already-enqueued
    /// occurrence pop and no-op. A time jump spanning several intervals
    /// fires every skipped occurrence in order (catch-up). A zero
    /// interval is accepted; draining it with [`run`](Self::run) never
    /// terminates unless the action cancels the token.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::Cell;
    /// use std::rc::Rc;
    /// use timelab::{Duration, Instant, VirtualScheduler};
    ///
    /// let scheduler = VirtualScheduler::new();
    /// let count = Rc::new(Cell::new(0));
    /// let hits = Rc::clone(&count);
    /// let token = scheduler.schedule_repeating(
    ///     Instant::from_secs(1),
    ///     Duration::from_secs(1),
    ///     move || hits.set(hits.get() + 1),
    /// );
    ///
    /// scheduler.advance_time(Duration::from_secs(3));
    /// assert_eq!(count.get(), 3);
    /// token.cancel();
    /// ```
    pub fn schedule_repeating(
        &self,
        due: Instant,
        interval: Duration,
        action: impl FnMut() + 'static,
    ) -> CancelToken {
        self.try_schedule_repeating(due, interval, action)
            .expect("repeat interval must be non-negative")
    }

    /// Non-panicking form of
    /// [`schedule_repeating`](Self::schedule_repeating).
    ///
    /// # Errors
    ///
    /// Returns [`NegativeInterval`] if `interval` is negative.
    pub fn try_schedule_repeating(
        &self,
        due: Instant,
        interval: Duration,
        action: impl FnMut() + 'static,
    ) -> Result<CancelToken, NegativeInterval> {
        if interval.is_negative() {
            return Err(NegativeInterval { interval });
        }
        let token = CancelToken::new();
        let repeat = Rc::new(RepeatingAction {
            core: Rc::downgrade(&self.core),
            token: token.clone(),
            interval,
            next_due: Cell::new(due),
            action: RefCell::new(Box::new(action)),
        });
        tracing::debug!(due = %due, interval = %interval, "scheduled repeating action");
        self.core.insert(due, Box::new(move || repeat.fire()));
        Ok(token)
    }

    /// Repeatedly calls [`step`](Self::step) until no actions remain.
    ///
    /// A repeating action that is never cancelled keeps the queue
    /// populated forever, making this loop endless; bounding it is the
    /// caller's responsibility.
    pub fn run(&self) {
        while !self.is_empty() {
            self.step();
        }
    }

    /// Moves the clock to the earliest pending due time (never backward)
    /// and fires everything that becomes due.
    ///
    /// No-op when the queue is empty. If the earliest due time is already
    /// in the past, the clock stays put and the drain still fires the
    /// overdue entries. Work scheduled by a firing action at or before
    /// the target time is serviced within the same call.
    pub fn step(&self) {
        let next = self.core.queue.borrow().next_due();
        let Some(due) = next else { return };
        self.set_time(self.now().max(due));
    }

    /// Moves the clock forward by `by` and fires everything that becomes
    /// due.
    ///
    /// Monotonic: a negative or zero `by` leaves the clock where it is
    /// (this entry point never moves time backward), though anything
    /// already due still drains.
    pub fn advance_time(&self, by: Duration) {
        let now = self.now();
        self.set_time(now.max(now.advanced_by(by)));
    }

    /// Sets the clock to exactly `to` (forward, backward, or unchanged)
    /// and fires every action due at or before the new time.
    ///
    /// This is the drain primitive behind `run`, `step`, and
    /// `advance_time`, and the only way to move time backward. When
    /// called from inside a firing action, the clock is updated but the
    /// drain stays with the outer call: the active loop re-reads the
    /// clock on every iteration and services the new cutoff before
    /// returning. At most one drain loop is active per scheduler.
    pub fn set_time(&self, to: Instant) {
        let from = self.core.now.get();
        self.core.now.set(to);
        if self.core.draining.get() {
            tracing::trace!(from = %from, to = %to, "nested time change absorbed by active drain");
            return;
        }

        tracing::debug!(from = %from, to = %to, "draining");
        let _guard = DrainGuard::engage(&self.core.draining);
        loop {
            // The queue borrow ends before the invoke so the action can
            // schedule, cancel, or move time on this same scheduler.
            let entry = self.core.queue.borrow_mut().pop_if_due(self.core.now.get());
            let Some(entry) = entry else { break };
            tracing::trace!(due = %entry.due(), now = %self.core.now.get(), "firing");
            entry.invoke();
        }
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VirtualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScheduler")
            .field("now", &self.now())
            .field("pending", &self.pending_count())
            .field("draining", &self.core.draining.get())
            .finish()
    }
}
