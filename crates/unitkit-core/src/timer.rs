#![forbid(unsafe_code)]

//! Single-slot cancellable deferred tasks.
//!
//! A [`DeferredSlot`] owns at most one pending [`Deferred`] task. Starting a
//! new task supersedes (cancels) the previous one, and the owner cancels
//! explicitly on every transition out of the state that scheduled it.
//!
//! Nothing here reads a clock: callers pass the current [`Instant`] when
//! scheduling and when polling, which keeps hover delays deterministic under
//! test.
//!
//! # Migration rationale
//!
//! Web components schedule delayed work with `setTimeout` and cancel it with
//! `clearTimeout`. This module is the tick-driven equivalent: the host's event
//! loop calls [`DeferredSlot::poll`] with the current instant and the slot
//! reports, exactly once, that the deadline has passed.
//!
//! ```
//! use unitkit_core::timer::DeferredSlot;
//! use web_time::{Duration, Instant};
//!
//! let t0 = Instant::now();
//! let mut slot = DeferredSlot::new();
//! slot.start(t0, Duration::from_millis(200));
//!
//! assert!(!slot.poll(t0 + Duration::from_millis(199)));
//! assert!(slot.poll(t0 + Duration::from_millis(200)));
//! assert!(!slot.poll(t0 + Duration::from_millis(400))); // fires once
//! ```

use web_time::{Duration, Instant};

/// Identifier of a scheduled task, unique within its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A task due at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    id: TaskId,
    due: Instant,
}

impl Deferred {
    /// The task's id.
    #[inline]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// The instant at which the task becomes due.
    #[inline]
    pub const fn due(&self) -> Instant {
        self.due
    }

    /// Whether the task is due at `now`.
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Time left until the task is due (zero once due).
    #[inline]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

/// Owned optional task handle.
///
/// # Invariants
///
/// 1. At most one task is pending.
/// 2. A task fires at most once; firing clears the slot.
/// 3. A cancelled or superseded task never fires.
#[derive(Debug, Default)]
pub struct DeferredSlot {
    pending: Option<Deferred>,
    next_id: u64,
}

impl DeferredSlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            next_id: 0,
        }
    }

    /// Schedule a task due at `now + delay`, cancelling any pending one.
    pub fn start(&mut self, now: Instant, delay: Duration) -> TaskId {
        let superseded = self.cancel();
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(Deferred {
            id,
            due: now + delay,
        });

        #[cfg(feature = "tracing")]
        tracing::trace!(
            task = id.get(),
            delay_ms = delay.as_millis() as u64,
            superseded,
            "deferred task scheduled"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = superseded;

        id
    }

    /// Cancel the pending task, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(_task) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(task = _task.id.get(), "deferred task cancelled");
                true
            }
            None => false,
        }
    }

    /// Fire the pending task if it is due at `now`.
    ///
    /// Returns `true` exactly once per task, and clears the slot when it does.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(task) if task.is_due(now) => {
                self.pending = None;
                #[cfg(feature = "tracing")]
                tracing::trace!(task = task.id.get(), "deferred task fired");
                true
            }
            _ => false,
        }
    }

    /// Whether a task is pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending task, if any.
    #[inline]
    pub fn pending(&self) -> Option<&Deferred> {
        self.pending.as_ref()
    }

    /// Deadline of the pending task, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|t| t.due)
    }
}
