//! Discrete Gaussian sampling for error terms.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Rejection sampler for the discrete Gaussian D_σ over Z.
#[derive(Clone)]
pub struct ErrorSampler {
    sigma: f64,
    /// Samples beyond this many multiples of σ are rejected outright.
    tailcut: i64,
    rng: ChaCha20Rng,
}

impl ErrorSampler {
    /// Sampler seeded from OS entropy. Every encryption draws from a
    /// fresh entropy-seeded sampler, so repeated encryptions of the same
    /// plaintext never share randomness.
    pub fn from_entropy(sigma: f64) -> Self {
        Self::with_rng(sigma, ChaCha20Rng::from_entropy())
    }

    /// Deterministic sampler for reproducible tests.
    pub fn with_seed(sigma: f64, seed: u64) -> Self {
        Self::with_rng(sigma, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(sigma: f64, rng: ChaCha20Rng) -> Self {
        Self {
            sigma,
            tailcut: (sigma * 6.0).ceil() as i64,
            rng,
        }
    }

    /// One sample in centered (signed) representation.
    pub fn sample(&mut self) -> i64 {
        let denom = 2.0 * self.sigma * self.sigma;
        loop {
            let x = self.rng.gen_range(-self.tailcut..=self.tailcut);
            let accept = (-((x * x) as f64) / denom).exp();
            if self.rng.gen::<f64>() < accept {
                return x;
            }
        }
    }

    /// A vector of signed samples.
    pub fn sample_vec(&mut self, len: usize) -> Vec<i64> {
        (0..len).map(|_| self.sample()).collect()
    }
}

impl std::fmt::Debug for ErrorSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSampler")
            .field("sigma", &self.sigma)
            .field("tailcut", &self.tailcut)
            .finish()
    }
}
