//! Pluggable random number sources.
//!
//! Geometry generation only needs uniform samples in `[0, 1)`. Tests inject
//! fixed or scripted sources; the viewer uses [`StdRandom`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random numbers in `[0, 1)`.
pub trait RandomSource {
    /// Returns the next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Returns a sample in `[min, max)`.
    fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// Returns a sample in `[-0.5, 0.5)`.
    fn next_centered(&mut self) -> f32 {
        self.next_unit() - 0.5
    }
}

/// Random source backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a reproducible source from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Random source that always returns the same value. Useful for tests that
/// need to pin generation to one end of a range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRandom(pub f32);

impl RandomSource for ConstantRandom {
    fn next_unit(&mut self) -> f32 {
        self.0
    }
}
