//! Simulated hardware-fault injection.
//!
//! The fault model is a synthetic hazard proportional to work performed:
//! every comparison, swap, or element access a computation charges to its
//! resource-access counter widens the window in which a uniform draw is
//! declared a fault. A computation that does more work is more likely to
//! be struck, which is the whole point of the model.

use crate::rng::RandomSource;

/// Decides whether a simulated hardware fault occurred, given a
/// computation's accumulated resource-access count.
///
/// The hazard is `accesses × probability`, and a fault is declared iff a
/// uniform draw `r ∈ [0, 1)` lands in `[0.5, 0.5 + hazard)`.
///
/// The hazard is deliberately **not clamped**: for large enough counts or
/// probabilities the window exceeds `1.0` and every draw `≥ 0.5` is a
/// fault. This nonlinearity is inherited from the original model and is a
/// documented property, not a bug.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailureInjector {
    probability: Option<f64>,
}

impl FailureInjector {
    /// Creates an injector with the given per-access failure probability.
    ///
    /// `None` means the computation can never fault, regardless of how
    /// much work it performs.
    pub fn new(probability: Option<f64>) -> Self {
        if let Some(p) = probability {
            debug_assert!(
                (0.0..=1.0).contains(&p),
                "failure probability out of range: {p}"
            );
        }
        Self { probability }
    }

    /// An injector that never declares a fault.
    pub fn disabled() -> Self {
        Self { probability: None }
    }

    /// Returns the configured probability, if any.
    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    /// Evaluates one hazard decision for the given resource-access count.
    ///
    /// Pure apart from the injected randomness; with a seeded source the
    /// decision sequence is fully reproducible.
    pub fn should_fail(&self, resource_accesses: u64, rng: &mut dyn RandomSource) -> bool {
        let Some(probability) = self.probability else {
            return false;
        };
        if probability == 0.0 {
            return false;
        }

        let hazard = resource_accesses as f64 * probability;
        let draw = rng.next_f64();
        (0.5..0.5 + hazard).contains(&draw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    /// Scripted source replaying a fixed list of draws.
    struct Script {
        draws: Vec<f64>,
        next: usize,
    }

    impl Script {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for Script {
        fn next_f64(&mut self) -> f64 {
            let draw = self.draws[self.next % self.draws.len()];
            self.next += 1;
            draw
        }

        fn fork(&mut self) -> Box<dyn RandomSource> {
            Box::new(Script::new(&self.draws))
        }
    }

    #[test]
    fn unset_probability_never_faults() {
        let injector = FailureInjector::disabled();
        let mut rng = SeededRng::new(0);

        for accesses in [0, 1, 1_000, u64::MAX] {
            assert!(!injector.should_fail(accesses, &mut rng));
        }
    }

    #[test]
    fn zero_probability_never_faults() {
        let injector = FailureInjector::new(Some(0.0));
        let mut rng = SeededRng::new(0);

        for accesses in [0, 1, 1_000_000] {
            assert!(!injector.should_fail(accesses, &mut rng));
        }
    }

    #[test]
    fn zero_accesses_never_fault() {
        // hazard = 0 × p = 0, so the window is empty.
        let injector = FailureInjector::new(Some(1.0));
        let mut rng = Script::new(&[0.5]);
        assert!(!injector.should_fail(0, &mut rng));
    }

    #[test]
    fn draw_inside_window_is_a_fault() {
        // hazard = 10 × 0.02 = 0.2, window [0.5, 0.7)
        let injector = FailureInjector::new(Some(0.02));

        assert!(injector.should_fail(10, &mut Script::new(&[0.5])));
        assert!(injector.should_fail(10, &mut Script::new(&[0.69])));
        assert!(!injector.should_fail(10, &mut Script::new(&[0.49])));
        assert!(!injector.should_fail(10, &mut Script::new(&[0.7])));
        assert!(!injector.should_fail(10, &mut Script::new(&[0.0])));
    }

    #[test]
    fn hazard_is_unclamped() {
        // hazard = 1000 × 1.0 = 1000; every draw ≥ 0.5 faults.
        let injector = FailureInjector::new(Some(1.0));

        assert!(injector.should_fail(1000, &mut Script::new(&[0.999])));
        assert!(injector.should_fail(1000, &mut Script::new(&[0.5])));
        // Draws below the window floor still pass.
        assert!(!injector.should_fail(1000, &mut Script::new(&[0.499])));
    }

    #[test]
    fn seeded_decisions_are_reproducible() {
        let injector = FailureInjector::new(Some(0.001));

        let run = |seed: u64| -> Vec<bool> {
            let mut rng = SeededRng::new(seed);
            (0..256)
                .map(|accesses| injector.should_fail(accesses, &mut rng))
                .collect()
        };

        assert_eq!(run(12345), run(12345));
    }
}
