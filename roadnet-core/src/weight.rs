// Random edge weights

use crate::layout::round_to;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const MIN_WEIGHT: f64 = 1.0;
pub const MAX_WEIGHT: f64 = 20.0;

/// Uniform weight source in `[MIN_WEIGHT, MAX_WEIGHT]`, one decimal place.
///
/// Seed it for reproducible documents; `from_entropy` gives a fresh
/// sequence per run.
pub struct WeightSampler(SmallRng);

impl WeightSampler {
    pub fn seeded(seed: u64) -> Self {
        WeightSampler(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        WeightSampler(SmallRng::from_entropy())
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    #[inline]
    pub fn sample(&mut self) -> f64 {
        round_to(self.0.gen_range(MIN_WEIGHT..=MAX_WEIGHT), 1)
    }
}
