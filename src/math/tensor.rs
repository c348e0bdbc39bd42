//! Exact degree-2 tensor products for ciphertext multiplication.
//!
//! The tensor step of a ciphertext-ciphertext product needs the three
//! polynomials `c0·d0`, `c0·d1 + c1·d0`, `c1·d1` over the *integers*
//! (no reduction mod q) before they are scaled by `t/q` and rounded.
//! Centered coefficients are bounded by `d · (q/2)²`, far beyond 128-bit
//! range, so each product is computed by NTT over a fixed basis of three
//! primes and reconstructed per coefficient with a CRT lift into
//! `num-bigint` integers.

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::{params_err, Result};
use crate::math::modular::center;
use crate::math::ntt::NttTable;

/// Reduce a signed value into `[0, p)` for any u64 modulus, including
/// moduli above `i64::MAX`.
#[inline]
fn lift_mod(x: i64, p: u64) -> u64 {
    if x >= 0 {
        x as u64 % p
    } else {
        let r = x.unsigned_abs() % p;
        if r == 0 {
            0
        } else {
            p - r
        }
    }
}

/// Basis primes: all ≡ 1 (mod 16384), so every supported degree admits a
/// negacyclic NTT, and their product (~2^155) exceeds twice the largest
/// possible tensor coefficient for any u64 ciphertext modulus.
pub const TENSOR_PRIMES: [u64; 3] = [1152921504606830593, 18446744069414584321, 2013265921];

/// Precomputed CRT basis for exact tensoring at one degree.
#[derive(Debug, Clone)]
pub struct TensorBasis {
    tables: Vec<NttTable>,
    /// Product of the basis primes.
    big_m: BigInt,
    half_m: BigInt,
    /// big_m / p_i.
    m_over_p: Vec<BigInt>,
    /// (big_m / p_i)^{-1} mod p_i.
    y: Vec<u64>,
    q: BigInt,
    t: BigInt,
}

impl TensorBasis {
    /// Build the basis for ring dimension `degree`, ciphertext modulus
    /// `q`, and plaintext modulus `t`.
    pub fn new(degree: usize, q: u64, t: u64) -> Result<Self> {
        let tables = TENSOR_PRIMES
            .iter()
            .map(|&p| NttTable::new(degree, p))
            .collect::<Result<Vec<_>>>()?;

        let big_m: BigInt = TENSOR_PRIMES.iter().map(|&p| BigInt::from(p)).product();
        // capacity check: centered tensor coefficients reach d·(q/2)²
        let half_q = BigInt::from(q / 2);
        let bound = BigInt::from(degree) * &half_q * &half_q * 2 + 1;
        if big_m < bound {
            return Err(params_err!(
                "tensor basis too small for degree {degree} and modulus {q}"
            ));
        }

        let mut m_over_p = Vec::with_capacity(TENSOR_PRIMES.len());
        let mut y = Vec::with_capacity(TENSOR_PRIMES.len());
        for &p in &TENSOR_PRIMES {
            let mi = &big_m / BigInt::from(p);
            let r = (&mi % BigInt::from(p)).to_u64().expect("residue fits u64");
            y.push(crate::math::modular::mod_inv(r, p));
            m_over_p.push(mi);
        }

        Ok(Self {
            tables,
            half_m: &big_m / 2,
            big_m,
            m_over_p,
            y,
            q: BigInt::from(q),
            t: BigInt::from(t),
        })
    }

    /// Compute `round(t/q · (c ⊗ d))` for ciphertexts `c = (c0, c1)` and
    /// `d = (d0, d1)` with coefficients in `[0, q)`, returning the three
    /// scaled tensor components with coefficients in `[0, q)`.
    pub fn scaled_tensor(
        &self,
        q: u64,
        c0: &[u64],
        c1: &[u64],
        d0: &[u64],
        d1: &[u64],
    ) -> (Vec<u64>, Vec<u64>, Vec<u64>) {
        let degree = c0.len();
        let centered: Vec<Vec<i64>> = [c0, c1, d0, d1]
            .iter()
            .map(|poly| poly.iter().map(|&x| center(x, q)).collect())
            .collect();

        // residues of the three tensor polynomials, per basis prime
        let mut residues: [Vec<Vec<u64>>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for table in &self.tables {
            let p = table.modulus();
            let mut evals: Vec<Vec<u64>> = centered
                .iter()
                .map(|poly| {
                    let mut v: Vec<u64> = poly.iter().map(|&x| lift_mod(x, p)).collect();
                    table.forward(&mut v);
                    v
                })
                .collect();
            let fd1 = evals.pop().unwrap();
            let fd0 = evals.pop().unwrap();
            let fc1 = evals.pop().unwrap();
            let fc0 = evals.pop().unwrap();

            let pointwise = |a: &[u64], b: &[u64]| -> Vec<u64> {
                a.iter()
                    .zip(b)
                    .map(|(&x, &y)| ((x as u128 * y as u128) % p as u128) as u64)
                    .collect()
            };
            let mut e0 = pointwise(&fc0, &fd0);
            let mut e1: Vec<u64> = pointwise(&fc0, &fd1)
                .iter()
                .zip(&pointwise(&fc1, &fd0))
                .map(|(&x, &y)| ((x as u128 + y as u128) % p as u128) as u64)
                .collect();
            let mut e2 = pointwise(&fc1, &fd1);
            table.inverse(&mut e0);
            table.inverse(&mut e1);
            table.inverse(&mut e2);
            residues[0].push(e0);
            residues[1].push(e1);
            residues[2].push(e2);
        }

        let mut out = [vec![0u64; degree], vec![0u64; degree], vec![0u64; degree]];
        for (k, rk) in residues.iter().enumerate() {
            for j in 0..degree {
                let mut x = BigInt::zero();
                for i in 0..TENSOR_PRIMES.len() {
                    let p = TENSOR_PRIMES[i];
                    let term = (rk[i][j] as u128 * self.y[i] as u128 % p as u128) as u64;
                    x += &self.m_over_p[i] * BigInt::from(term);
                }
                x = x.mod_floor(&self.big_m);
                if x > self.half_m {
                    x -= &self.big_m;
                }
                out[k][j] = self.scale_round(x);
            }
        }
        let [o0, o1, o2] = out;
        (o0, o1, o2)
    }

    /// `round(t·x / q)` reduced into `[0, q)`.
    fn scale_round(&self, x: BigInt) -> u64 {
        let num = &self.t * x;
        let (mut quo, rem) = num.div_rem(&self.q);
        if &rem.abs() * 2 >= self.q {
            if num.is_negative() {
                quo -= 1;
            } else {
                quo += 1;
            }
        }
        quo.mod_floor(&self.q).to_u64().expect("reduced value fits u64")
    }
}
