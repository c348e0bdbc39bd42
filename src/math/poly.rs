//! Polynomials in `Z_q[X]/(X^d + 1)`.
//!
//! Coefficients are kept in the standard representative range `[0, q)`
//! and in the coefficient domain; multiplication goes through an
//! [`NttTable`] each time. Operators are implemented on references so
//! expressions like `&(&a + &b) + &c` avoid clones.

use std::ops::{Add, AddAssign, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::modular::{mod_add, mod_mul, mod_neg, mod_sub, reduce_signed};
use crate::math::ntt::NttTable;
use crate::math::sampler::ErrorSampler;

/// Dense polynomial with coefficients modulo `q`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poly {
    coeffs: Vec<u64>,
    q: u64,
}

impl Poly {
    /// The zero polynomial.
    pub fn zero(dim: usize, q: u64) -> Self {
        Self {
            coeffs: vec![0; dim],
            q,
        }
    }

    /// From coefficients already in `[0, q)`-compatible range.
    pub fn from_coeffs(mut coeffs: Vec<u64>, q: u64) -> Self {
        for c in coeffs.iter_mut() {
            *c %= q;
        }
        Self { coeffs, q }
    }

    /// From signed coefficients, reduced into `[0, q)`.
    pub fn from_signed(signed: &[i64], q: u64) -> Self {
        Self {
            coeffs: signed.iter().map(|&x| reduce_signed(x, q)).collect(),
            q,
        }
    }

    /// Uniformly random polynomial.
    pub fn random<R: Rng>(dim: usize, q: u64, rng: &mut R) -> Self {
        Self {
            coeffs: (0..dim).map(|_| rng.gen_range(0..q)).collect(),
            q,
        }
    }

    /// Polynomial with uniform ternary coefficients in {-1, 0, 1}.
    pub fn ternary<R: Rng>(dim: usize, q: u64, rng: &mut R) -> Self {
        let signed: Vec<i64> = (0..dim).map(|_| rng.gen_range(-1i64..=1)).collect();
        Self::from_signed(&signed, q)
    }

    /// Polynomial with discrete-Gaussian coefficients.
    pub fn gaussian(dim: usize, q: u64, sampler: &mut ErrorSampler) -> Self {
        Self::from_signed(&sampler.sample_vec(dim), q)
    }

    /// Ring dimension.
    pub fn dimension(&self) -> usize {
        self.coeffs.len()
    }

    /// Coefficient modulus.
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Coefficient access.
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs[i]
    }

    /// Coefficient slice.
    pub fn coeffs(&self) -> &[u64] {
        &self.coeffs
    }

    /// Multiply by a scalar.
    pub fn scalar_mul(&self, s: u64) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|&c| mod_mul(c, s, self.q)).collect(),
            q: self.q,
        }
    }

    /// Negacyclic product via the given table.
    ///
    /// The table must match this polynomial's dimension and modulus.
    pub fn mul(&self, other: &Poly, table: &NttTable) -> Poly {
        debug_assert_eq!(self.q, other.q);
        debug_assert_eq!(table.modulus(), self.q);
        debug_assert_eq!(table.dimension(), self.dimension());
        Poly {
            coeffs: table.mul(&self.coeffs, &other.coeffs),
            q: self.q,
        }
    }

    /// Apply the Galois automorphism `X → X^g`.
    ///
    /// `X^i` maps to `X^(g·i mod 2d)` with a sign flip whenever the
    /// exponent wraps past `d` (since `X^d = -1`). `g` must be odd.
    pub fn automorphism(&self, g: usize) -> Poly {
        let d = self.dimension();
        let two_d = 2 * d;
        debug_assert_eq!(g % 2, 1, "galois element must be odd");
        let mut out = vec![0u64; d];
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let idx = (g * i) % two_d;
            if idx < d {
                out[idx] = mod_add(out[idx], c, self.q);
            } else {
                out[idx - d] = mod_sub(out[idx - d], c, self.q);
            }
        }
        Poly {
            coeffs: out,
            q: self.q,
        }
    }

    /// Decompose into `levels` digit polynomials of `log_base` bits each,
    /// least significant digit first: `self = Σ 2^(log_base·i) · digit_i`.
    pub fn gadget_decompose(&self, log_base: u32, levels: usize) -> Vec<Poly> {
        let mask = (1u64 << log_base) - 1;
        (0..levels)
            .map(|i| Poly {
                coeffs: self
                    .coeffs
                    .iter()
                    .map(|&c| (c >> (log_base * i as u32)) & mask)
                    .collect(),
                q: self.q,
            })
            .collect()
    }
}

impl Add for &Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.q, rhs.q);
        Poly {
            coeffs: self
                .coeffs
                .iter()
                .zip(&rhs.coeffs)
                .map(|(&a, &b)| mod_add(a, b, self.q))
                .collect(),
            q: self.q,
        }
    }
}

impl Sub for &Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        debug_assert_eq!(self.q, rhs.q);
        Poly {
            coeffs: self
                .coeffs
                .iter()
                .zip(&rhs.coeffs)
                .map(|(&a, &b)| mod_sub(a, b, self.q))
                .collect(),
            q: self.q,
        }
    }
}

impl Neg for &Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|&c| mod_neg(c, self.q)).collect(),
            q: self.q,
        }
    }
}

impl AddAssign<&Poly> for Poly {
    fn add_assign(&mut self, rhs: &Poly) {
        debug_assert_eq!(self.q, rhs.q);
        for (a, &b) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *a = mod_add(*a, b, self.q);
        }
    }
}
