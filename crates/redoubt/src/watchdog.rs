//! Deadline watchdog for a single recovery-block attempt.
//!
//! Each attempt runs on its own worker thread while the orchestrator
//! blocks on a channel for whichever comes first: the worker's result or
//! the deadline. Forcibly killing a thread mid-execution is unsafe, so the
//! watchdog uses cooperative cancellation instead: when the deadline
//! fires it sets the attempt's [`CancelToken`] and waits a bounded grace
//! period for the worker to observe it at its next checkpoint. A worker
//! that never checkpoints is detached, not killed.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::computation::{AttemptContext, Computation, Sequence};

/// Outcome of running one attempt under a deadline.
///
/// `Completed` means the worker returned before the deadline; the payload
/// is `None` if the computation aborted on a declared fault rather than
/// reaching natural termination. `TimedOut` means the deadline fired
/// first and cancellation was forced. Exactly one of the two occurs per
/// attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineOutcome {
    /// The worker finished on its own (output present iff it completed).
    Completed(Option<Sequence>),
    /// The deadline elapsed before the worker finished.
    TimedOut,
}

/// Runs a computation under a wall-clock deadline.
#[derive(Debug, Clone, Copy)]
pub struct Watchdog {
    deadline: Duration,
    grace: Duration,
}

impl Watchdog {
    /// How long to wait, after forcing cancellation, for the worker to
    /// observe it and exit before the thread is detached.
    pub const DEFAULT_GRACE: Duration = Duration::from_millis(100);

    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            grace: Self::DEFAULT_GRACE,
        }
    }

    /// Overrides the post-cancellation grace period.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Runs `computation` on its own worker thread, bounded by this
    /// watchdog's deadline.
    ///
    /// The context's resource-access counter remains observable through
    /// the handle the caller retained when constructing it.
    pub fn run(
        &self,
        computation: Box<dyn Computation>,
        input: Sequence,
        mut ctx: AttemptContext,
    ) -> DeadlineOutcome {
        let cancel = ctx.cancel_token();
        let name = computation.name();

        // A deadline that has already elapsed gives the attempt no budget
        // at all. Resolving it here keeps the zero-deadline case
        // deterministic instead of racing the worker's first checkpoint.
        if self.deadline.is_zero() {
            cancel.cancel();
            warn!(algorithm = name, "deadline elapsed before attempt started");
            return DeadlineOutcome::TimedOut;
        }

        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let output = computation.execute(input, &mut ctx);
            // The watchdog may have stopped listening after the grace
            // period; a send failure is then expected.
            let _ = tx.send(output);
        });

        match rx.recv_timeout(self.deadline) {
            Ok(output) => {
                let _ = worker.join();
                debug!(algorithm = name, completed = output.is_some(), "attempt finished within deadline");
                DeadlineOutcome::Completed(output)
            }
            Err(RecvTimeoutError::Timeout) => {
                cancel.cancel();
                // Bounded wait for the worker to hit a checkpoint and
                // unwind; detach it if it never does.
                match rx.recv_timeout(self.grace) {
                    Ok(_) | Err(RecvTimeoutError::Disconnected) => {
                        let _ = worker.join();
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        warn!(algorithm = name, "worker ignored cancellation; detaching");
                        drop(worker);
                    }
                }
                warn!(algorithm = name, deadline_ms = self.deadline.as_millis() as u64, "attempt timed out");
                DeadlineOutcome::TimedOut
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Worker dropped the channel without sending; treat as an
                // aborted attempt rather than crashing the chain.
                let _ = worker.join();
                DeadlineOutcome::Completed(None)
            }
        }
    }
}
