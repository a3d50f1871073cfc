//! The `Computation` capability and its per-attempt execution context.
//!
//! A computation is one candidate algorithm in a recovery chain. It owns
//! its input copy outright, charges a synthetic resource-access counter
//! for each meaningful internal step, and polls [`AttemptContext::checkpoint`]
//! at well-defined points. The first checkpoint that observes a declared
//! fault or a cancellation aborts the attempt, an ordinary early return,
//! never a panic or an error surfaced to the orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::fault::FailureInjector;
use crate::rng::RandomSource;

/// Element type sorted by the demonstration computations.
pub type Value = i64;

/// An ordered collection of values, owned exclusively by whichever
/// computation is currently operating on it.
pub type Sequence = Vec<Value>;

/// Why a checkpoint aborted the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The failure injector declared a simulated hardware fault.
    Fault,
    /// The watchdog's deadline elapsed and cancellation was requested.
    Cancelled,
}

/// Cooperative cancellation signal shared between the watchdog and the
/// worker running an attempt.
///
/// The worker polls [`is_cancelled`](Self::is_cancelled) at its fault
/// checkpoints rather than being killed mid-execution.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Per-attempt execution context handed to a [`Computation`].
///
/// Bundles the resource-access counter (shared with the orchestrator so it
/// is observable while the attempt runs), the fault injector, the attempt's
/// random stream, and the cancellation token.
pub struct AttemptContext {
    accesses: Arc<AtomicU64>,
    injector: FailureInjector,
    rng: Box<dyn RandomSource>,
    cancel: CancelToken,
}

impl AttemptContext {
    pub fn new(
        injector: FailureInjector,
        rng: Box<dyn RandomSource>,
        cancel: CancelToken,
        accesses: Arc<AtomicU64>,
    ) -> Self {
        Self {
            accesses,
            injector,
            rng,
            cancel,
        }
    }

    /// Context with fault injection and cancellation both disabled.
    /// Useful for exercising an algorithm in isolation.
    pub fn unchecked() -> Self {
        Self::new(
            FailureInjector::disabled(),
            Box::new(crate::rng::SeededRng::new(0)),
            CancelToken::new(),
            Arc::new(AtomicU64::new(0)),
        )
    }

    /// Charges `n` resource accesses (comparisons, swaps, element reads).
    ///
    /// The counter is monotonically non-decreasing and feeds the hazard
    /// computation at the next checkpoint.
    #[inline]
    pub fn charge(&self, n: u64) {
        self.accesses.fetch_add(n, Ordering::Relaxed);
    }

    /// Accumulated resource accesses so far.
    pub fn resource_accesses(&self) -> u64 {
        self.accesses.load(Ordering::Relaxed)
    }

    /// A handle to this attempt's cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Polls cancellation and the fault model.
    ///
    /// Cancellation wins over fault injection: once the watchdog has given
    /// up on this attempt there is no point burning a random draw.
    pub fn checkpoint(&mut self) -> Result<(), Interrupt> {
        if self.cancel.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        if self
            .injector
            .should_fail(self.resource_accesses(), self.rng.as_mut())
        {
            return Err(Interrupt::Fault);
        }
        Ok(())
    }
}

/// A unit of work capable of producing a candidate result from an input
/// sequence.
///
/// Contract:
/// - operate only on the owned `input` copy, never on state shared with
///   other attempts;
/// - charge the context for each meaningful internal step so the fault
///   model has a signal proportional to work performed;
/// - poll [`AttemptContext::checkpoint`] at structural milestones and
///   abort immediately (return `None`) on the first interrupt;
/// - return `Some(output)` only on natural termination.
pub trait Computation: Send {
    /// Human-readable algorithm name, used in log events.
    fn name(&self) -> &'static str;

    /// Runs the algorithm to completion, a declared fault, or cancellation.
    fn execute(&self, input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence>;
}
