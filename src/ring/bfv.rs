//! Reference ring provider: a BFV-style RLWE scheme with slot batching.
//!
//! Ciphertexts are pairs `(c0, c1)` over `R_q = Z_q[X]/(X^d + 1)` with
//! `c0 + c1·s = Δ·m + v` for the scaling factor `Δ = ⌊q/t⌋` and noise
//! `v`. Secret and ephemeral keys are uniform ternary; errors are
//! discrete Gaussian. One homomorphic multiplication is supported:
//! exact tensoring (through [`TensorBasis`]), `t/q` scale-and-round,
//! then gadget relinearization back to a two-component ciphertext.
//! Slot rotations apply the Galois automorphism `X → X^(3^r)` and
//! switch back to the original key with per-step Galois keys.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{params_err, Result};
use crate::math::modular::mod_pow;
use crate::math::{ErrorSampler, NttTable, Poly, TensorBasis};
use crate::params::RingParams;
use crate::ring::{ProviderKeySet, RingProvider, SlotEncoder};

/// Decryption key: a ternary polynomial.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecretKey {
    pub(crate) s: Poly,
}

/// Encryption key `(p0, p1)` with `p0 + p1·s = e`.
#[derive(Clone, Serialize, Deserialize)]
pub struct PublicKey {
    pub(crate) p0: Poly,
    pub(crate) p1: Poly,
}

/// One gadget row set: encryptions of `z^i · payload` under `s`.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeySwitchKey {
    rows: Vec<(Poly, Poly)>,
}

/// Relinearization key: key-switch rows for the payload `s²`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RelinKey {
    ks: KeySwitchKey,
}

/// Galois keys for every power-of-two rotation step below the slot
/// count, keyed by step size.
#[derive(Clone, Serialize, Deserialize)]
pub struct GaloisKeys {
    keys: BTreeMap<usize, KeySwitchKey>,
}

/// BFV ciphertext.
#[derive(Clone, Serialize, Deserialize)]
pub struct BfvCiphertext {
    pub(crate) c0: Poly,
    pub(crate) c1: Poly,
}

/// The reference provider. Immutable after construction; all
/// operations take `&self`.
#[derive(Debug, Clone)]
pub struct BfvRing {
    params: RingParams,
    ntt: NttTable,
    encoder: SlotEncoder,
    tensor: TensorBasis,
}

impl BfvRing {
    /// Precompute the NTT table, batching transform, and tensor basis
    /// for validated parameters.
    pub fn new(params: RingParams) -> Result<Self> {
        params.validate()?;
        let ntt = NttTable::new(params.degree, params.ct_modulus)?;
        let encoder = SlotEncoder::new(params.degree, params.plain_modulus)?;
        let tensor = TensorBasis::new(params.degree, params.ct_modulus, params.plain_modulus)?;
        Ok(Self {
            params,
            ntt,
            encoder,
            tensor,
        })
    }

    /// The parameter set this provider was built for.
    pub fn params(&self) -> &RingParams {
        &self.params
    }

    fn sampler(&self) -> ErrorSampler {
        ErrorSampler::from_entropy(self.params.sigma)
    }

    /// Gadget key-switch rows for `payload` under `s`:
    /// `row_i = (z^i·payload − a_i·s + e_i, a_i)`.
    fn keyswitch_key<R: Rng>(
        &self,
        payload: &Poly,
        s: &Poly,
        rng: &mut R,
        sampler: &mut ErrorSampler,
    ) -> KeySwitchKey {
        let d = self.params.degree;
        let q = self.params.ct_modulus;
        let z = 1u64 << self.params.decomp_log_base;
        let mut rows = Vec::with_capacity(self.params.decomp_len());
        let mut scale = 1u64;
        for _ in 0..self.params.decomp_len() {
            let a = Poly::random(d, q, rng);
            let e = Poly::gaussian(d, q, sampler);
            let k0 = &(&payload.scalar_mul(scale) - &a.mul(s, &self.ntt)) + &e;
            rows.push((k0, a));
            scale = crate::math::modular::mod_mul(scale, z % q, q);
        }
        KeySwitchKey { rows }
    }

    /// Switch `(c0, c1_src)` — where `c1_src` multiplies the source key
    /// the rows were generated for — back under `s`.
    fn keyswitch(&self, c0: &Poly, c1_src: &Poly, key: &KeySwitchKey) -> (Poly, Poly) {
        let d = self.params.degree;
        let q = self.params.ct_modulus;
        let digits = c1_src.gadget_decompose(self.params.decomp_log_base, self.params.decomp_len());
        let mut r0 = c0.clone();
        let mut r1 = Poly::zero(d, q);
        for (digit, (k0, k1)) in digits.iter().zip(&key.rows) {
            r0 += &digit.mul(k0, &self.ntt);
            r1 += &digit.mul(k1, &self.ntt);
        }
        (r0, r1)
    }

    fn galois_element(&self, steps: usize) -> usize {
        let two_d = 2 * self.params.degree;
        mod_pow(3, steps as u64, two_d as u64) as usize
    }
}

impl RingProvider for BfvRing {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type GaloisKeys = GaloisKeys;
    type RelinKey = RelinKey;
    type Ciphertext = BfvCiphertext;

    fn slot_count(&self) -> usize {
        self.encoder.slot_count()
    }

    fn plain_modulus(&self) -> u64 {
        self.params.plain_modulus
    }

    fn generate_keys(&self) -> Result<ProviderKeySet<Self>> {
        let d = self.params.degree;
        let q = self.params.ct_modulus;
        let mut rng = rand::thread_rng();
        let mut sampler = self.sampler();

        let s = Poly::ternary(d, q, &mut rng);

        let a = Poly::random(d, q, &mut rng);
        let e = Poly::gaussian(d, q, &mut sampler);
        let p0 = &(-&a.mul(&s, &self.ntt)) + &e;
        let public = PublicKey { p0, p1: a };

        let s_squared = s.mul(&s, &self.ntt);
        let relin = RelinKey {
            ks: self.keyswitch_key(&s_squared, &s, &mut rng, &mut sampler),
        };

        let mut keys = BTreeMap::new();
        let mut step = 1usize;
        let mut g = 3usize;
        let two_d = 2 * d;
        while step < self.slot_count() {
            let s_mapped = s.automorphism(g);
            keys.insert(step, self.keyswitch_key(&s_mapped, &s, &mut rng, &mut sampler));
            step *= 2;
            g = g * g % two_d;
        }
        debug!(degree = d, galois_steps = keys.len(), "generated key set");

        Ok(ProviderKeySet {
            public,
            secret: SecretKey { s },
            galois: GaloisKeys { keys },
            relin,
        })
    }

    fn encrypt(&self, slots: &[u64], public: &Self::PublicKey) -> Result<Self::Ciphertext> {
        if slots.len() > self.slot_count() {
            return Err(params_err!(
                "{} slot values exceed the {} packing slots",
                slots.len(),
                self.slot_count()
            ));
        }
        let d = self.params.degree;
        let q = self.params.ct_modulus;
        let t = self.params.plain_modulus;
        let mut rng = rand::thread_rng();
        let mut sampler = self.sampler();

        // centered message lift: Δ·m with m in (-t/2, t/2]
        let encoded = self.encoder.encode(slots);
        let centered: Vec<i64> = encoded
            .iter()
            .map(|&c| {
                if c > t / 2 {
                    c as i64 - t as i64
                } else {
                    c as i64
                }
            })
            .collect();
        let dm = Poly::from_signed(&centered, q).scalar_mul(self.params.delta());

        let u = Poly::ternary(d, q, &mut rng);
        let e0 = Poly::gaussian(d, q, &mut sampler);
        let e1 = Poly::gaussian(d, q, &mut sampler);
        let c0 = &(&public.p0.mul(&u, &self.ntt) + &e0) + &dm;
        let c1 = &public.p1.mul(&u, &self.ntt) + &e1;
        Ok(BfvCiphertext { c0, c1 })
    }

    fn decrypt(&self, ct: &Self::Ciphertext, secret: &Self::SecretKey) -> Result<Vec<u64>> {
        let q = self.params.ct_modulus;
        let t = self.params.plain_modulus;
        let x = &ct.c0 + &ct.c1.mul(&secret.s, &self.ntt);
        let coeffs: Vec<u64> = x
            .coeffs()
            .iter()
            .map(|&v| {
                let scaled = (t as u128 * v as u128 + q as u128 / 2) / q as u128;
                (scaled % t as u128) as u64
            })
            .collect();
        Ok(self.encoder.decode(&coeffs))
    }

    fn multiply(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
        relin: &Self::RelinKey,
    ) -> Result<Self::Ciphertext> {
        let q = self.params.ct_modulus;
        let (h0, h1, h2) = self.tensor.scaled_tensor(
            q,
            a.c0.coeffs(),
            a.c1.coeffs(),
            b.c0.coeffs(),
            b.c1.coeffs(),
        );
        let d = self.params.degree;
        let h0 = Poly::from_coeffs(h0, q);
        let h1 = Poly::from_coeffs(h1, q);
        let h2 = Poly::from_coeffs(h2, q);
        debug_assert_eq!(h0.dimension(), d);

        // relinearize the s² component straight away so rotations see a
        // canonical two-component ciphertext
        let (r0, r1) = self.keyswitch(&h0, &h2, &relin.ks);
        Ok(BfvCiphertext {
            c0: r0,
            c1: &h1 + &r1,
        })
    }

    fn rotate(
        &self,
        ct: &Self::Ciphertext,
        steps: usize,
        galois: &Self::GaloisKeys,
    ) -> Result<Self::Ciphertext> {
        let key = galois
            .keys
            .get(&steps)
            .ok_or_else(|| params_err!("no galois key for rotation step {steps}"))?;
        let g = self.galois_element(steps);
        let a0 = ct.c0.automorphism(g);
        let a1 = ct.c1.automorphism(g);
        let (r0, r1) = self.keyswitch(&a0, &a1, key);
        Ok(BfvCiphertext { c0: r0, c1: r1 })
    }

    fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext> {
        Ok(BfvCiphertext {
            c0: &a.c0 + &b.c0,
            c1: &a.c1 + &b.c1,
        })
    }
}
