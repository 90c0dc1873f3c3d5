//! Random source capability
//!
//! The simulator never touches an ambient RNG. It draws from a
//! [`RandomSource`] handed to it at construction, so tests can replay a
//! known sequence and get byte-for-byte identical readings.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform noise for the simulator
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource: Send {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Fair coin flip
    fn next_bool(&mut self) -> bool;
}

/// Adapter from any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng + Send> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source seeded from a `u64`
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn next_bool(&mut self) -> bool {
        self.rng.random_bool(0.5)
    }
}

/// Replays a fixed list of unit values, cycling when exhausted
///
/// `next_bool` consumes the next value too and reports `value >= 0.5`.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    position: usize,
}

impl ScriptedSource {
    /// Values outside `[0, 1)` are clamped into it. Non-finite values become 0.5.
    pub fn new(values: Vec<f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| {
                if v.is_finite() {
                    v.clamp(0.0, 1.0 - f64::EPSILON)
                } else {
                    0.5
                }
            })
            .collect();
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value
    }

    fn next_bool(&mut self) -> bool {
        self.next_unit() >= 0.5
    }
}
