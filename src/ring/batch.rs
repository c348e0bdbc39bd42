//! Slot batching: the plaintext-side view of a polynomial as a vector
//! of independent scalar slots.
//!
//! A plaintext polynomial `m ∈ Z_t[X]/(X^d + 1)` with `t ≡ 1 (mod 2d)`
//! evaluates at the `d` primitive 2d-th roots of unity mod `t`. Listing
//! the evaluation points along the orbit of the generator 3 — slot `j`
//! is the evaluation at `ζ^(3^j)`, and slot `d/2 + j` at `ζ^(-3^j)` —
//! makes the automorphism `X → X^(3^r)` act as a cyclic left-rotation
//! by `r` within each half. Polynomial multiplication is then slot-wise
//! multiplication, which is what turns a matrix product into a handful
//! of ring operations instead of a scalar loop.
//!
//! The engine packs data into the first `d/2` slots only and leaves the
//! conjugate half at zero; rotations never mix the halves.
//!
//! Both transforms are direct O(d²) evaluations.
// TODO: replace the direct evaluation with the mod-t NTT plus the
// orbit permutation; needs the bit-reversed-order bookkeeping worked
// out for the tables in math::ntt.

use crate::error::{params_err, Result};
use crate::math::modular::{mod_inv, mod_mul, primitive_root};

/// Precomputed batching transform for one `(degree, t)` pair.
#[derive(Debug, Clone)]
pub struct SlotEncoder {
    degree: usize,
    t: u64,
    /// Exponent orbit: `3^j mod 2d` for `j < d/2`.
    orbit: Vec<usize>,
    /// Powers `ζ^i mod t` for `i < 2d`.
    root_pow: Vec<u64>,
    /// `d^{-1} mod t`.
    inv_degree: u64,
}

impl SlotEncoder {
    /// Build the transform. Fails when `t` admits no primitive 2d-th
    /// root of unity (every prime `t ≡ 1 (mod 2d)` admits one).
    pub fn new(degree: usize, t: u64) -> Result<Self> {
        let two_d = 2 * degree;
        let zeta = primitive_root(two_d as u64, t).ok_or_else(|| {
            params_err!("plaintext modulus {t} admits no primitive {two_d}-th root of unity")
        })?;

        let mut orbit = Vec::with_capacity(degree / 2);
        let mut e = 1usize;
        for _ in 0..degree / 2 {
            orbit.push(e);
            e = e * 3 % two_d;
        }

        let mut root_pow = Vec::with_capacity(two_d);
        let mut acc = 1u64;
        for _ in 0..two_d {
            root_pow.push(acc);
            acc = mod_mul(acc, zeta, t);
        }

        Ok(Self {
            degree,
            t,
            orbit,
            root_pow,
            inv_degree: mod_inv(degree as u64 % t, t),
        })
    }

    /// Usable packing slots (`degree / 2`).
    pub fn slot_count(&self) -> usize {
        self.degree / 2
    }

    /// Interpolate the polynomial whose slot values are `slots`
    /// (length ≤ degree; missing slots are zero).
    pub fn encode(&self, slots: &[u64]) -> Vec<u64> {
        let d = self.degree;
        let two_d = 2 * d;
        debug_assert!(slots.len() <= d);

        // evaluation targets indexed by root exponent
        let mut by_exp = vec![0u64; two_d];
        for (j, &e) in self.orbit.iter().enumerate() {
            by_exp[e] = slots.get(j).copied().unwrap_or(0) % self.t;
            by_exp[two_d - e] = slots.get(d / 2 + j).copied().unwrap_or(0) % self.t;
        }

        // inverse Vandermonde over the odd root powers:
        // m_i = d^{-1} · Σ_e by_exp[e] · ζ^{-e·i}
        // terms are reduced before summing so the accumulator stays
        // below d·t < 2^74 for every supported modulus
        let mut coeffs = vec![0u64; d];
        for (i, c) in coeffs.iter_mut().enumerate() {
            let mut acc: u128 = 0;
            for e in (1..two_d).step_by(2) {
                if by_exp[e] == 0 {
                    continue;
                }
                let exp = (two_d - e * i % two_d) % two_d;
                acc += by_exp[e] as u128 * self.root_pow[exp] as u128 % self.t as u128;
            }
            *c = mod_mul((acc % self.t as u128) as u64, self.inv_degree, self.t);
        }
        coeffs
    }

    /// Evaluate the polynomial at the orbit roots, returning the first
    /// `degree / 2` (packing) slots.
    pub fn decode(&self, coeffs: &[u64]) -> Vec<u64> {
        let two_d = 2 * self.degree;
        self.orbit
            .iter()
            .map(|&e| {
                let mut acc: u128 = 0;
                for (i, &c) in coeffs.iter().enumerate() {
                    if c == 0 {
                        continue;
                    }
                    acc += c as u128 * self.root_pow[e * i % two_d] as u128 % self.t as u128;
                }
                (acc % self.t as u128) as u64
            })
            .collect()
    }
}
