//! Ring parameter sets.
//!
//! A parameter set fixes the polynomial ring `Z_q[X]/(X^d + 1)` and the
//! plaintext modulus `t`. The plaintext modulus must satisfy
//! `t ≡ 1 (mod 2d)` so the batching transform exists; the ciphertext
//! modulus must satisfy the same congruence so the ring admits an NTT.

use serde::{Deserialize, Serialize};

use crate::error::{params_err, Result};

/// Default ciphertext modulus: a 61-bit prime with
/// `q ≡ 1 (mod 16384)` (NTT-friendly through degree 8192) and
/// `q ≡ 1 (mod 40961)`, which keeps the `q mod t` rounding term of
/// homomorphic multiplication at 1 for the recommended plaintext modulus.
pub const DEFAULT_CT_MODULUS: u64 = 1152921505020264449;

/// Default error distribution width.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Default digit width (bits) for gadget decomposition in
/// relinearization and rotation key-switching.
pub const DEFAULT_DECOMP_LOG_BASE: u32 = 16;

/// Plaintext moduli must stay below 2^60.
pub const MAX_PLAIN_MODULUS: u64 = 1 << 60;

/// Core ring parameters.
///
/// # Example
///
/// ```
/// use hemat::RingParams;
///
/// let params = RingParams::recommended();
/// assert_eq!(params.degree, 4096);
/// assert_eq!(params.plain_modulus, 40961);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingParams {
    /// Ring dimension d (power of two). Typical values: 2048, 4096.
    pub degree: usize,

    /// Plaintext modulus t. Must satisfy t ≡ 1 (mod 2d) and t < 2^60.
    pub plain_modulus: u64,

    /// Ciphertext modulus q. Must satisfy q ≡ 1 (mod 2d) and q > t.
    pub ct_modulus: u64,

    /// Standard deviation for Gaussian error sampling.
    pub sigma: f64,

    /// Digit width (bits) for gadget decomposition.
    pub decomp_log_base: u32,
}

impl RingParams {
    /// Parameters with the given degree and plaintext modulus and the
    /// default ciphertext modulus, error width, and decomposition base.
    pub fn new(degree: usize, plain_modulus: u64) -> Self {
        Self {
            degree,
            plain_modulus,
            ct_modulus: DEFAULT_CT_MODULUS,
            sigma: DEFAULT_SIGMA,
            decomp_log_base: DEFAULT_DECOMP_LOG_BASE,
        }
    }

    /// The recommended pair: degree 4096, plaintext modulus 40961.
    ///
    /// 40961 = 5·2^13 + 1 is prime, so it satisfies the congruence for
    /// every supported degree up to 4096 and admits batching roots.
    pub fn recommended() -> Self {
        Self::new(4096, 40961)
    }

    /// Number of packing slots per ciphertext, and the maximum matrix
    /// dimension this context accepts.
    pub fn slot_count(&self) -> usize {
        self.degree / 2
    }

    /// Scaling factor Δ = ⌊q/t⌋.
    pub fn delta(&self) -> u64 {
        self.ct_modulus / self.plain_modulus
    }

    /// Number of gadget digits ℓ = ⌈bits(q) / decomp_log_base⌉.
    pub fn decomp_len(&self) -> usize {
        let qbits = 64 - self.ct_modulus.leading_zeros();
        qbits.div_ceil(self.decomp_log_base) as usize
    }

    /// Check all construction-time constraints.
    ///
    /// Violating any of them is a construction failure, never a later
    /// runtime failure.
    pub fn validate(&self) -> Result<()> {
        if !self.degree.is_power_of_two() {
            return Err(params_err!("degree {} is not a power of two", self.degree));
        }
        if !(8..=8192).contains(&self.degree) {
            return Err(params_err!("degree {} outside supported range [8, 8192]", self.degree));
        }
        let two_d = 2 * self.degree as u64;
        if self.plain_modulus < 2 {
            return Err(params_err!("plaintext modulus must be at least 2"));
        }
        if self.plain_modulus >= MAX_PLAIN_MODULUS {
            return Err(params_err!(
                "plaintext modulus {} must be below 2^60",
                self.plain_modulus
            ));
        }
        if self.plain_modulus % two_d != 1 {
            return Err(params_err!(
                "plaintext modulus {} is not ≡ 1 (mod {})",
                self.plain_modulus,
                two_d
            ));
        }
        if self.ct_modulus % two_d != 1 {
            return Err(params_err!(
                "ciphertext modulus {} is not ≡ 1 (mod {})",
                self.ct_modulus,
                two_d
            ));
        }
        if self.ct_modulus <= self.plain_modulus {
            return Err(params_err!("ciphertext modulus must exceed the plaintext modulus"));
        }
        if !(self.sigma > 0.0) {
            return Err(params_err!("sigma must be positive"));
        }
        if self.decomp_log_base == 0 || self.decomp_log_base > 32 {
            return Err(params_err!("decomposition base must be between 1 and 32 bits"));
        }
        Ok(())
    }
}

impl Default for RingParams {
    fn default() -> Self {
        Self::recommended()
    }
}
