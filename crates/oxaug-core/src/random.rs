//! Explicit random generator
//!
//! Every stochastic decision in a pipeline draws from a [`Generator`] that the
//! caller owns. Two generators built from the same seed produce the same
//! sequence, so the same pipeline run against both backends makes identical
//! decisions.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Seeded random generator handed to every transform call
#[derive(Debug, Clone)]
pub struct Generator {
    rng: ChaCha8Rng,
}

impl Generator {
    /// Create a generator from a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in [0, 1)
    pub fn random(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform draw in [lo, hi)
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.random()
    }

    /// Integer draw in [lo, hi], both ends inclusive
    ///
    /// Returns `lo` when `hi <= lo`.
    pub fn randint(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::seeded(0)
    }
}
