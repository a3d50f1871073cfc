//! Injectable randomness for the fault-injection model.
//!
//! Fault decisions must be reproducible: the same seed must produce the
//! same run. Randomness is therefore never ambient: it enters through the
//! [`RandomSource`] trait, and each attempt gets its own forked stream so
//! adding a checkpoint to one algorithm cannot perturb the draws seen by
//! another.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

/// Source of uniform random draws for fault decisions.
///
/// Implementations are either deterministic (seeded, for tests and
/// reproducible runs) or entropy-seeded (for production use). Tests may
/// also script a fixed sequence of draws.
pub trait RandomSource: Send {
    /// Returns a uniform draw in `[0.0, 1.0)`.
    fn next_f64(&mut self) -> f64;

    /// Forks an independent stream deterministically derived from this one.
    ///
    /// Each attempt in a recovery chain runs on its own forked stream, so
    /// the number of draws one attempt makes never shifts the draws seen
    /// by the next.
    fn fork(&mut self) -> Box<dyn RandomSource>;
}

/// Deterministic, seedable random source.
///
/// Same seed, same sequence of draws, same run. This is the backbone of
/// reproducible fault-injection testing.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: SmallRng,
}

impl SeededRng {
    /// Creates a source with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a source seeded from OS entropy (non-reproducible runs).
    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRng {
    #[inline]
    fn next_f64(&mut self) -> f64 {
        // Uniform [0, 1) from the top 53 bits, the widest span an f64
        // mantissa can hold exactly.
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn fork(&mut self) -> Box<dyn RandomSource> {
        Box::new(SeededRng::new(self.inner.next_u64()))
    }
}
