//! # redoubt: Recovery Block execution engine
//!
//! This crate implements the Recovery Block fault-tolerance pattern: run a
//! primary computation under a wall-clock deadline and a simulated
//! hardware-fault model, verify its result with an independent acceptance
//! test, and fall through an ordered chain of backup computations until one
//! is accepted or all are exhausted.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  RecoveryBlockExecutor                        │
//! │                                                               │
//! │  RunningAttempt(i) ──► Adjudicating(i) ──► Success            │
//! │        │                     │                                │
//! │        │ timeout / fault     │ rejected                       │
//! │        ▼                     ▼                                │
//! │  RunningAttempt(i+1)  ...  ──► AllFailed                      │
//! │                                                               │
//! │  ┌──────────┐  ┌─────────────────┐  ┌────────────────────┐   │
//! │  │ Watchdog │  │ FailureInjector │  │ Adjudicator        │   │
//! │  │ (deadline)│  │ (hazard model) │  │ (acceptance test)  │   │
//! │  └──────────┘  └─────────────────┘  └────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key concepts
//!
//! - **`Computation`**: a candidate algorithm; charges a synthetic
//!   resource-access counter as it works and polls checkpoints for faults
//!   and cancellation.
//! - **`FailureInjector`**: declares a simulated hardware fault when a
//!   uniform draw lands in the hazard window derived from accumulated
//!   resource accesses.
//! - **`Watchdog`**: bounds one attempt with a wall-clock deadline and
//!   cooperative cancellation.
//! - **`Adjudicator`**: accepts or rejects a candidate result,
//!   independently of which computation produced it.
//! - **`SeededRng`**: deterministic randomness; same seed, same run.
//!
//! ## Quick start
//!
//! ```ignore
//! use redoubt::{AttemptSpec, RecoveryBlockExecutor, RecoveryChain, SeededRng};
//! use std::time::Duration;
//!
//! let chain = RecoveryChain::new(AttemptSpec::new(primary).with_deadline(Duration::from_secs(5)))
//!     .with_backup(AttemptSpec::new(backup));
//! let executor = RecoveryBlockExecutor::new(input, chain);
//! let report = executor.run(&mut SeededRng::new(12345));
//! ```

mod adjudicator;
mod computation;
mod executor;
mod fault;
mod rng;
mod watchdog;

pub use adjudicator::{Adjudicator, AdjudicationVerdict, OrderDirection};
pub use computation::{AttemptContext, CancelToken, Computation, Interrupt, Sequence, Value};
pub use executor::{AttemptSpec, ExecutionReport, RecoveryBlockExecutor, RecoveryChain};
pub use fault::FailureInjector;
pub use rng::{RandomSource, SeededRng};
pub use watchdog::{DeadlineOutcome, Watchdog};
