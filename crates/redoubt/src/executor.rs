//! The Recovery Block orchestrator.
//!
//! Walks a non-empty chain of attempts (one primary, then backups) in
//! fixed declared order. Each attempt gets a fresh copy of the original
//! input, its own forked random stream, and the full configured deadline;
//! attempt `i+1` never starts before attempt `i`'s deadline outcome and
//! (if it completed) adjudication verdict are fully resolved. The first
//! accepted candidate ends the run; exhausting the chain is a normal
//! outcome, not an error.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::adjudicator::{Adjudicator, AdjudicationVerdict, OrderDirection};
use crate::computation::{AttemptContext, CancelToken, Computation, Sequence};
use crate::fault::FailureInjector;
use crate::rng::RandomSource;
use crate::watchdog::{DeadlineOutcome, Watchdog};

/// One attempt in a recovery chain: a computation plus its per-attempt
/// failure probability and deadline.
pub struct AttemptSpec {
    computation: Box<dyn Computation>,
    failure_probability: Option<f64>,
    deadline: Duration,
}

impl AttemptSpec {
    /// Default per-attempt deadline when none is configured.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

    pub fn new(computation: Box<dyn Computation>) -> Self {
        Self {
            computation,
            failure_probability: None,
            deadline: Self::DEFAULT_DEADLINE,
        }
    }

    /// Sets the simulated per-access failure probability (`0.0..=1.0`).
    pub fn with_failure_probability(mut self, probability: f64) -> Self {
        self.failure_probability = Some(probability);
        self
    }

    /// Sets this attempt's wall-clock deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Ordered, non-empty chain: one primary followed by zero or more backups.
///
/// Evaluation order is the declared order; there is no reordering based on
/// estimated cost or probability.
pub struct RecoveryChain {
    attempts: Vec<AttemptSpec>,
}

impl RecoveryChain {
    /// Creates a chain with `primary` as its only attempt.
    pub fn new(primary: AttemptSpec) -> Self {
        Self {
            attempts: vec![primary],
        }
    }

    /// Appends a backup attempt after the existing ones.
    pub fn with_backup(mut self, backup: AttemptSpec) -> Self {
        self.attempts.push(backup);
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Always false: a chain is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}

/// Terminal result of a recovery-block run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionReport {
    /// An attempt's output passed adjudication.
    Success {
        output: Sequence,
        /// Zero-based index into the chain (0 = primary).
        attempt: usize,
    },
    /// Every attempt was rejected, faulted, or timed out.
    AllFailed,
}

/// Orchestrates a recovery chain over one fixed original input.
///
/// The original input is immutable at this level: every attempt receives
/// its own copy, so a failed attempt cannot corrupt what the next one
/// sees, and no locking is needed between attempts.
pub struct RecoveryBlockExecutor {
    input: Sequence,
    chain: RecoveryChain,
    direction: OrderDirection,
    adjudicator: Adjudicator,
}

impl RecoveryBlockExecutor {
    pub fn new(input: Sequence, chain: RecoveryChain) -> Self {
        Self {
            input,
            chain,
            direction: OrderDirection::Ascending,
            adjudicator: Adjudicator::new(),
        }
    }

    /// Sets the order direction the adjudicator requires.
    pub fn with_direction(mut self, direction: OrderDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Runs the chain to a terminal state.
    ///
    /// Attempt-level failures (timeout, simulated fault, rejection) are
    /// absorbed into the chain walk; the result is always `Success` or
    /// `AllFailed`, never an error.
    pub fn run(self, rng: &mut dyn RandomSource) -> ExecutionReport {
        let total = self.chain.len();

        for (index, attempt) in self.chain.attempts.into_iter().enumerate() {
            let name = attempt.computation.name();
            info!(
                attempt = index,
                total,
                algorithm = name,
                failure_probability = attempt.failure_probability,
                deadline_ms = attempt.deadline.as_millis() as u64,
                "running attempt"
            );

            let accesses = Arc::new(AtomicU64::new(0));
            let ctx = AttemptContext::new(
                FailureInjector::new(attempt.failure_probability),
                rng.fork(),
                CancelToken::new(),
                Arc::clone(&accesses),
            );

            let watchdog = Watchdog::new(attempt.deadline);
            let outcome = watchdog.run(attempt.computation, self.input.clone(), ctx);
            let spent = accesses.load(Ordering::Relaxed);

            // A timeout or an incomplete computation is an automatic
            // rejection; the adjudicator is only consulted for candidates
            // that reached natural termination.
            let candidate = match outcome {
                DeadlineOutcome::TimedOut => {
                    warn!(attempt = index, algorithm = name, "attempt timed out; advancing chain");
                    continue;
                }
                DeadlineOutcome::Completed(None) => {
                    warn!(
                        attempt = index,
                        algorithm = name,
                        resource_accesses = spent,
                        "attempt aborted on simulated fault; advancing chain"
                    );
                    continue;
                }
                DeadlineOutcome::Completed(Some(candidate)) => candidate,
            };

            match self
                .adjudicator
                .accepts(&self.input, &candidate, self.direction)
            {
                AdjudicationVerdict::Accepted => {
                    info!(
                        attempt = index,
                        algorithm = name,
                        resource_accesses = spent,
                        "candidate accepted"
                    );
                    return ExecutionReport::Success {
                        output: candidate,
                        attempt: index,
                    };
                }
                AdjudicationVerdict::Rejected => {
                    debug!(
                        attempt = index,
                        algorithm = name,
                        "candidate rejected by adjudicator; advancing chain"
                    );
                }
            }
        }

        warn!(total, "recovery chain exhausted");
        ExecutionReport::AllFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;
    use std::sync::Mutex;

    /// Sorts correctly unless it hits an interrupt first.
    struct GoodSort;

    impl Computation for GoodSort {
        fn name(&self) -> &'static str {
            "good-sort"
        }

        fn execute(&self, mut input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence> {
            ctx.charge(input.len() as u64);
            if ctx.checkpoint().is_err() {
                return None;
            }
            input.sort_unstable();
            Some(input)
        }
    }

    /// Always aborts, as if the injector struck immediately.
    struct FaultySort;

    impl Computation for FaultySort {
        fn name(&self) -> &'static str {
            "faulty-sort"
        }

        fn execute(&self, _input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence> {
            ctx.charge(1);
            None
        }
    }

    /// Completes but produces garbage the adjudicator must reject.
    struct WrongSort;

    impl Computation for WrongSort {
        fn name(&self) -> &'static str {
            "wrong-sort"
        }

        fn execute(&self, input: Sequence, ctx: &mut AttemptContext) -> Option<Sequence> {
            ctx.charge(input.len() as u64);
            Some(vec![0; input.len()])
        }
    }

    /// Records the order attempts were invoked in.
    struct Recorder {
        label: usize,
        log: Arc<Mutex<Vec<usize>>>,
        succeed: bool,
    }

    impl Computation for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn execute(&self, mut input: Sequence, _ctx: &mut AttemptContext) -> Option<Sequence> {
            self.log.lock().expect("log lock").push(self.label);
            if self.succeed {
                input.sort_unstable();
                Some(input)
            } else {
                None
            }
        }
    }

    #[test]
    fn primary_success_ends_the_run() {
        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(GoodSort)));
        let executor = RecoveryBlockExecutor::new(vec![5, 3, 4, 1, 2], chain);

        let report = executor.run(&mut SeededRng::new(0));
        assert_eq!(
            report,
            ExecutionReport::Success {
                output: vec![1, 2, 3, 4, 5],
                attempt: 0,
            }
        );
    }

    #[test]
    fn faulted_primary_falls_through_to_backup() {
        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(FaultySort)))
            .with_backup(AttemptSpec::new(Box::new(GoodSort)));
        let executor = RecoveryBlockExecutor::new(vec![5, 3, 4, 1, 2], chain);

        let report = executor.run(&mut SeededRng::new(0));
        assert_eq!(
            report,
            ExecutionReport::Success {
                output: vec![1, 2, 3, 4, 5],
                attempt: 1,
            }
        );
    }

    #[test]
    fn rejected_candidate_falls_through_to_backup() {
        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(WrongSort)))
            .with_backup(AttemptSpec::new(Box::new(GoodSort)));
        let executor = RecoveryBlockExecutor::new(vec![5, 3, 4, 1, 2], chain);

        let report = executor.run(&mut SeededRng::new(0));
        assert_eq!(
            report,
            ExecutionReport::Success {
                output: vec![1, 2, 3, 4, 5],
                attempt: 1,
            }
        );
    }

    #[test]
    fn exhausted_chain_reports_all_failed() {
        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(FaultySort)))
            .with_backup(AttemptSpec::new(Box::new(FaultySort)));
        let executor = RecoveryBlockExecutor::new(vec![5, 3, 4, 1, 2], chain);

        assert_eq!(
            executor.run(&mut SeededRng::new(0)),
            ExecutionReport::AllFailed
        );
    }

    #[test]
    fn timed_out_primary_with_no_backup_reports_all_failed() {
        let chain = RecoveryChain::new(
            AttemptSpec::new(Box::new(GoodSort)).with_deadline(Duration::ZERO),
        );
        let executor = RecoveryBlockExecutor::new(vec![7, 2, 9], chain);

        assert_eq!(
            executor.run(&mut SeededRng::new(0)),
            ExecutionReport::AllFailed
        );
    }

    #[test]
    fn attempts_run_in_declared_order_and_stop_at_first_acceptance() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mk = |label, succeed| {
            AttemptSpec::new(Box::new(Recorder {
                label,
                log: Arc::clone(&log),
                succeed,
            }))
        };

        let chain = RecoveryChain::new(mk(0, false))
            .with_backup(mk(1, true))
            .with_backup(mk(2, true));
        let executor = RecoveryBlockExecutor::new(vec![2, 1], chain);

        let report = executor.run(&mut SeededRng::new(0));
        assert_eq!(
            report,
            ExecutionReport::Success {
                output: vec![1, 2],
                attempt: 1,
            }
        );
        // Attempt 2 never ran: evaluation stopped at the first acceptance.
        assert_eq!(*log.lock().expect("log lock"), vec![0, 1]);
    }

    #[test]
    fn empty_input_is_rejected_for_every_attempt() {
        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(GoodSort)))
            .with_backup(AttemptSpec::new(Box::new(GoodSort)));
        let executor = RecoveryBlockExecutor::new(Vec::new(), chain);

        // Length 0 is not monotonic, so no candidate can ever be accepted.
        assert_eq!(
            executor.run(&mut SeededRng::new(0)),
            ExecutionReport::AllFailed
        );
    }

    #[test]
    fn descending_direction_is_honored() {
        /// Sorts descending.
        struct DescSort;

        impl Computation for DescSort {
            fn name(&self) -> &'static str {
                "desc-sort"
            }

            fn execute(&self, mut input: Sequence, _ctx: &mut AttemptContext) -> Option<Sequence> {
                input.sort_unstable_by(|a, b| b.cmp(a));
                Some(input)
            }
        }

        let chain = RecoveryChain::new(AttemptSpec::new(Box::new(DescSort)));
        let executor = RecoveryBlockExecutor::new(vec![1, 3, 2], chain)
            .with_direction(OrderDirection::Descending);

        assert_eq!(
            executor.run(&mut SeededRng::new(0)),
            ExecutionReport::Success {
                output: vec![3, 2, 1],
                attempt: 0,
            }
        );
    }
}
