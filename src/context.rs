//! Session context: validated parameters plus precomputed ring state.

use std::sync::Arc;

use crate::error::Result;
use crate::keys::KeyBuffer;
use crate::matrix::{decrypt, encrypt, multiply, EncryptedMatrix, Matrix};
use crate::params::RingParams;
use crate::ring::{BfvRing, RingProvider};

struct ContextInner<P> {
    params: RingParams,
    provider: P,
}

/// A validated ring context.
///
/// Created once per session and shared by reference counting: keys and
/// encrypted matrices hold a handle to their context, so the context's
/// precomputed state outlives everything derived from it and is
/// released when the last handle drops. Distinct contexts are fully
/// independent; a single context's operations take `&self` on immutable
/// state and may be used from several threads.
///
/// # Example
///
/// ```
/// use hemat::{KeyMaterial, Matrix, RingContext};
///
/// let ctx = RingContext::create(256, 40961).unwrap();
/// let keys = KeyMaterial::generate(&ctx).unwrap();
///
/// let left = Matrix::from_rows(2, 2, vec![1, 2, 3, 4]);
/// let right = Matrix::from_rows(2, 1, vec![5, 6]);
///
/// let enc_left = ctx.encrypt_left(&left, &keys.public_key).unwrap();
/// let enc_right = ctx.encrypt_right(&right, &keys.public_key).unwrap();
/// let product = ctx
///     .multiply(&enc_left, &enc_right, &keys.galois_keys, &keys.relin_keys)
///     .unwrap();
///
/// let out = ctx.decrypt(&product, &keys.secret_key).unwrap();
/// assert_eq!(out, left.matmul_mod(&right, 40961));
/// ```
pub struct RingContext<P: RingProvider = BfvRing> {
    inner: Arc<ContextInner<P>>,
}

impl RingContext<BfvRing> {
    /// Create a context for the given polynomial degree and plaintext
    /// modulus with the default provider configuration.
    ///
    /// Fails with [`crate::Error::InvalidParameters`] unless
    /// `plain_modulus ≡ 1 (mod 2·degree)`, the modulus is below 2^60,
    /// and the degree is a supported power of two.
    pub fn create(degree: usize, plain_modulus: u64) -> Result<Self> {
        Self::with_params(RingParams::new(degree, plain_modulus))
    }

    /// Create a context from a full parameter set.
    pub fn with_params(params: RingParams) -> Result<Self> {
        let provider = BfvRing::new(params.clone())?;
        Ok(Self::from_provider(params, provider))
    }
}

impl<P: RingProvider> RingContext<P> {
    /// Wrap an already-constructed provider. Intended for alternative
    /// backends and for driving the engine against a mock in tests.
    pub fn from_provider(params: RingParams, provider: P) -> Self {
        Self {
            inner: Arc::new(ContextInner { params, provider }),
        }
    }

    /// The validated parameters.
    pub fn params(&self) -> &RingParams {
        &self.inner.params
    }

    /// The maximum rows or columns one matrix may have.
    pub fn max_dimension(&self) -> usize {
        self.inner.provider.slot_count()
    }

    pub(crate) fn provider(&self) -> &P {
        &self.inner.provider
    }

    /// Whether two handles refer to the same context instance.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Encrypt a left operand (row-major encoding).
    ///
    /// Both dimensions must be nonzero and at most
    /// [`max_dimension`](Self::max_dimension). Encryption draws fresh
    /// randomness per call.
    pub fn encrypt_left(&self, matrix: &Matrix, public: &KeyBuffer) -> Result<EncryptedMatrix<P>> {
        encrypt::encrypt_left(self, matrix, public)
    }

    /// Encrypt a right operand (column-major encoding). The `Matrix`
    /// argument is row-major storage; this call reads it column by
    /// column while packing.
    pub fn encrypt_right(&self, matrix: &Matrix, public: &KeyBuffer) -> Result<EncryptedMatrix<P>> {
        encrypt::encrypt_right(self, matrix, public)
    }

    /// Homomorphic product of a row-major left operand and a
    /// column-major right operand.
    ///
    /// Validates context identity, layout tags, depth, shape, and key
    /// binding before any ring operation runs. The result has shape
    /// `(left.rows, right.cols)` and cannot be multiplied again.
    pub fn multiply(
        &self,
        left: &EncryptedMatrix<P>,
        right: &EncryptedMatrix<P>,
        galois: &KeyBuffer,
        relin: &KeyBuffer,
    ) -> Result<EncryptedMatrix<P>> {
        multiply::multiply(self, left, right, galois, relin)
    }

    /// Decrypt any encrypted matrix produced under this context.
    ///
    /// Entries are the non-negative representatives modulo the
    /// plaintext modulus. A secret key from a different generation or
    /// context fails with [`crate::Error::DecryptionKeyMismatch`].
    pub fn decrypt(&self, matrix: &EncryptedMatrix<P>, secret: &KeyBuffer) -> Result<Matrix> {
        decrypt::decrypt(self, matrix, secret)
    }
}

impl<P: RingProvider> Clone for RingContext<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: RingProvider> std::fmt::Debug for RingContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingContext")
            .field("params", &self.inner.params)
            .finish()
    }
}
