#![forbid(unsafe_code)]

//! Deferred effect queue ("next tick").
//!
//! Reactive effects that must not run inside the mutation that triggered
//! them are queued on a [`Scheduler`] and run when the host calls
//! [`flush()`](Scheduler::flush), typically once per turn of its event loop.
//! Until then the effect's writes are not visible.
//!
//! # Usage
//!
//! ```ignore
//! use stepmodel_runtime::reactive::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! scheduler.next_tick(|| println!("later"));
//! assert_eq!(scheduler.pending_count(), 1);
//! scheduler.flush(); // prints "later"
//! ```
//!
//! # Invariants
//!
//! 1. Tasks run in the order they were first enqueued.
//! 2. A keyed task replaces an already-queued task with the same key, keeping
//!    the original queue position, so repeated triggers within one tick
//!    coalesce into a single run.
//! 3. Tasks queued while a flush is running run in the same flush.
//! 4. A nested `flush()` from inside a task is a no-op; the outer flush
//!    drains the queue.
//!
//! # Failure Modes
//!
//! - **Task panics during flush**: remaining tasks still run. The first
//!   panic is re-raised after the queue drains.
//! - **Tasks that keep re-queueing themselves**: the flush stops after
//!   [`MAX_FLUSH_ROUNDS`] rounds and leaves the rest queued.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug_span, trace, warn};
use web_time::Instant;

/// Upper bound on drain rounds per flush.
pub const MAX_FLUSH_ROUNDS: usize = 64;

type Task = Box<dyn FnOnce()>;

struct QueuedTask {
    key: Option<usize>,
    run: Task,
}

#[derive(Default)]
struct SchedulerInner {
    queue: Vec<QueuedTask>,
    flushing: bool,
    /// Completed flushes that ran at least one task.
    ticks: u64,
}

/// Explicit, single-threaded deferred task queue.
///
/// Cloning a `Scheduler` creates a new handle to the **same** queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `f` to run on the next flush.
    pub fn next_tick(&self, f: impl FnOnce() + 'static) {
        self.inner.borrow_mut().queue.push(QueuedTask {
            key: None,
            run: Box::new(f),
        });
    }

    /// Queue `f` under `key`.
    ///
    /// Returns `false` if a task with the same key was already pending and
    /// has been replaced by `f`.
    pub fn next_tick_keyed(&self, key: usize, f: impl FnOnce() + 'static) -> bool {
        let mut inner = self.inner.borrow_mut();
        if let Some(task) = inner.queue.iter_mut().find(|t| t.key == Some(key)) {
            task.run = Box::new(f);
            trace!(key, "coalesced keyed task");
            false
        } else {
            inner.queue.push(QueuedTask {
                key: Some(key),
                run: Box::new(f),
            });
            true
        }
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Whether no task is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.inner.borrow().queue.is_empty()
    }

    /// Number of flushes that ran at least one task.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.inner.borrow().ticks
    }

    /// Run every queued task, including tasks queued by tasks.
    ///
    /// Returns the number of tasks run.
    pub fn flush(&self) -> usize {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.flushing || inner.queue.is_empty() {
                return 0;
            }
            inner.flushing = true;
        }

        let start = Instant::now();
        let _span = debug_span!(
            "scheduler.flush",
            tasks = tracing::field::Empty,
            rounds = tracing::field::Empty,
            duration_us = tracing::field::Empty
        )
        .entered();

        let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
        let mut ran = 0usize;
        let mut rounds = 0usize;
        loop {
            let batch = std::mem::take(&mut self.inner.borrow_mut().queue);
            if batch.is_empty() {
                break;
            }
            if rounds == MAX_FLUSH_ROUNDS {
                warn!(
                    pending = batch.len(),
                    "scheduler flush exceeded round limit; leaving tasks queued"
                );
                let mut inner = self.inner.borrow_mut();
                let requeued = std::mem::take(&mut inner.queue);
                inner.queue = batch;
                inner.queue.extend(requeued);
                break;
            }
            rounds += 1;

            for task in batch {
                ran += 1;
                let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task.run));
                if let Err(payload) = result
                    && first_panic.is_none()
                {
                    first_panic = Some(payload);
                }
            }
        }

        {
            let mut inner = self.inner.borrow_mut();
            inner.flushing = false;
            inner.ticks += 1;
        }

        let span = tracing::Span::current();
        span.record("tasks", ran as u64);
        span.record("rounds", rounds as u64);
        span.record("duration_us", start.elapsed().as_micros() as u64);

        if let Some(payload) = first_panic {
            std::panic::resume_unwind(payload);
        }
        ran
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("pending", &inner.queue.len())
            .field("flushing", &inner.flushing)
            .field("ticks", &inner.ticks)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
