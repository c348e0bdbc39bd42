//! hemat: homomorphic encrypted matrix multiplication.
//!
//! Computes the product of two integer matrices while both stay
//! encrypted, so the computing party never sees the data and only the
//! secret-key holder can read the result. Matrices are packed into the
//! plaintext slots of an RLWE ciphertext — left operands row-major,
//! right operands column-major — which turns the product into one
//! slot-wise ciphertext multiplication plus a logarithmic number of
//! slot rotations per output block, instead of a scalar triple loop.
//!
//! Pipeline:
//!
//! 1. [`RingContext::create`] validates parameters and precomputes ring
//!    state.
//! 2. [`KeyMaterial::generate`] produces the four key buffers (public,
//!    secret, Galois, relinearization) atomically.
//! 3. [`RingContext::encrypt_left`] / [`RingContext::encrypt_right`]
//!    pack and encrypt the operands.
//! 4. [`RingContext::multiply`] runs the homomorphic product
//!    (bounded depth: products cannot be multiplied again).
//! 5. [`RingContext::decrypt`] recovers the product modulo the
//!    plaintext modulus.
//!
//! The ring arithmetic sits behind the [`ring::RingProvider`] trait;
//! [`ring::BfvRing`] is the built-in BFV-style implementation.
//!
//! ```
//! use hemat::{KeyMaterial, Matrix, RingContext};
//!
//! let ctx = RingContext::create(256, 40961)?;
//! let keys = KeyMaterial::generate(&ctx)?;
//!
//! let mut rng = rand::thread_rng();
//! let left = Matrix::random(8, 4, 2, &mut rng);
//! let right = Matrix::random(4, 3, 2, &mut rng);
//!
//! let enc_left = ctx.encrypt_left(&left, &keys.public_key)?;
//! let enc_right = ctx.encrypt_right(&right, &keys.public_key)?;
//! let enc_product = ctx.multiply(&enc_left, &enc_right, &keys.galois_keys, &keys.relin_keys)?;
//!
//! let product = ctx.decrypt(&enc_product, &keys.secret_key)?;
//! assert_eq!(product, left.matmul_mod(&right, 40961));
//! # Ok::<(), hemat::Error>(())
//! ```

pub mod context;
pub mod error;
pub mod keys;
pub mod math;
pub mod matrix;
pub mod params;
pub mod ring;

pub use context::RingContext;
pub use error::{Error, Result};
pub use keys::{KeyBuffer, KeyMaterial, KeyRole};
pub use matrix::{EncryptedMatrix, Layout, Matrix};
pub use params::RingParams;
