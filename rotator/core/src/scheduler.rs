//! Delayed-Task Scheduling
//!
//! Drivers and the store never block: every continuation (the next
//! character step, the tick after a restart) is handed to a [`Scheduler`]
//! with a delay and control returns to the caller.
//!
//! # Implementations
//!
//! - [`TokioScheduler`]: real timers on a tokio `LocalSet`
//! - [`ManualScheduler`]: a virtual clock advanced explicitly, for tests
//!   and offline simulation

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A deferred unit of work
///
/// Tasks run on the scheduler's single thread, so they need not be `Send`.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Runs tasks after a delay, one at a time, on one logical thread
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed
    fn schedule(&self, delay: Duration, task: Task);
}

// ============================================================================
// Tokio
// ============================================================================

/// Scheduler backed by `tokio::task::spawn_local` and `tokio::time::sleep`
///
/// Must be used from inside a [`tokio::task::LocalSet`]; all tasks run on
/// that set's thread, never concurrently.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Create a tokio scheduler
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        tracing::trace!(delay_ms = delay.as_millis() as u64, "Scheduling task");
        // Dropping the JoinHandle detaches the task.
        drop(tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            task();
        }));
    }
}

// ============================================================================
// Manual (virtual clock)
// ============================================================================

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    // Reversed so the BinaryHeap pops the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Pending>,
}

/// Deterministic scheduler driven by an explicit virtual clock
///
/// Nothing runs until [`run_next`](Self::run_next) or
/// [`advance`](Self::advance) is called. Tasks due at the same instant run
/// in the order they were scheduled.
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<ManualState>,
}

impl ManualScheduler {
    /// Create a scheduler with the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time since creation
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Delay from now until the earliest pending task
    pub fn next_delay(&self) -> Option<Duration> {
        let state = self.state.borrow();
        state
            .queue
            .peek()
            .map(|p| p.due.saturating_sub(state.now))
    }

    /// Jump the clock to the earliest pending task and run it
    ///
    /// Returns `false` when nothing is pending.
    pub fn run_next(&self) -> bool {
        // The borrow must end before the task runs: tasks schedule more tasks.
        let next = {
            let mut state = self.state.borrow_mut();
            let next = state.queue.pop();
            if let Some(ref pending) = next {
                state.now = state.now.max(pending.due);
            }
            next
        };

        match next {
            Some(pending) => {
                (pending.task)();
                true
            }
            None => false,
        }
    }

    /// Run at most `limit` tasks; returns how many ran
    pub fn run_tasks(&self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit && self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Move the clock forward by `by`, running every task that falls due
    ///
    /// Tasks scheduled by other tasks during the advance also run if they
    /// fall inside the window. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let deadline = self.now() + by;
        let mut ran = 0;

        loop {
            let due = self.state.borrow().queue.peek().map(|p| p.due);
            match due {
                Some(due) if due <= deadline => {
                    self.run_next();
                    ran += 1;
                }
                _ => break,
            }
        }

        self.state.borrow_mut().now = deadline;
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(Pending { due, seq, task });
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}
