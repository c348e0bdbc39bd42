//! Ring-arithmetic provider boundary.
//!
//! The matrix engine never touches polynomials directly: it sees a
//! provider as a capability interface over slot vectors — key
//! generation, encrypt, decrypt, slot-wise multiply, slot rotation, and
//! addition. The reference implementation is [`BfvRing`]; tests drive
//! the engine against a trivial mock to exercise orchestration and
//! validation independently of the cryptography.

pub mod batch;
pub mod bfv;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub use batch::SlotEncoder;
pub use bfv::BfvRing;

/// All four key roles, produced atomically by one generation call.
///
/// There are no partial key sets: generation either yields all four
/// artifacts or fails.
pub struct ProviderKeySet<P: RingProvider + ?Sized> {
    /// Encryption key; safe to hand to the data-contributing party.
    pub public: P::PublicKey,
    /// Decryption key; never leaves the decrypting party.
    pub secret: P::SecretKey,
    /// Rotation keys consumed during homomorphic multiplication.
    pub galois: P::GaloisKeys,
    /// Relinearization key applied after each ciphertext product.
    pub relin: P::RelinKey,
}

/// Capability interface over the polynomial-ring arithmetic.
///
/// A provider exposes `slot_count` addressable plaintext slots per
/// ciphertext. Slot values are integers modulo the plaintext modulus;
/// `multiply` is slot-wise and `rotate` cyclically shifts slot `j + r`
/// into slot `j`. Providers are immutable after construction and their
/// operations take `&self`, so one provider may serve concurrent calls
/// (the engine fans independent products out across threads).
pub trait RingProvider: Send + Sync {
    /// Opaque encryption key.
    type PublicKey: Clone + Serialize + DeserializeOwned;
    /// Opaque decryption key.
    type SecretKey: Clone + Serialize + DeserializeOwned;
    /// Opaque rotation key set.
    type GaloisKeys: Clone + Serialize + DeserializeOwned + Send + Sync;
    /// Opaque relinearization key.
    type RelinKey: Clone + Serialize + DeserializeOwned + Send + Sync;
    /// Opaque ciphertext handle.
    type Ciphertext: Clone + Serialize + DeserializeOwned + Send + Sync;

    /// Number of packing slots per ciphertext.
    fn slot_count(&self) -> usize;

    /// Plaintext modulus slot values live under.
    fn plain_modulus(&self) -> u64;

    /// Generate a complete key set.
    ///
    /// Fails with [`crate::Error::KeyGenerationFailure`] when the
    /// underlying entropy or allocation fails; the failure is not
    /// recoverable for this context.
    fn generate_keys(&self) -> Result<ProviderKeySet<Self>>;

    /// Encrypt `slots` (length at most `slot_count`; shorter inputs are
    /// zero-padded). Fresh randomness is drawn on every call.
    fn encrypt(&self, slots: &[u64], public: &Self::PublicKey) -> Result<Self::Ciphertext>;

    /// Decrypt to `slot_count` slot values in `[0, plain_modulus)`.
    fn decrypt(&self, ct: &Self::Ciphertext, secret: &Self::SecretKey) -> Result<Vec<u64>>;

    /// Slot-wise product, relinearized to canonical form.
    ///
    /// Consumes one multiplicative level; the result must not be fed
    /// back into `multiply`.
    fn multiply(
        &self,
        a: &Self::Ciphertext,
        b: &Self::Ciphertext,
        relin: &Self::RelinKey,
    ) -> Result<Self::Ciphertext>;

    /// Cyclic slot rotation: output slot `j` holds input slot
    /// `(j + steps) mod slot_count`. `steps` must be one of the
    /// power-of-two step sizes the Galois key set covers.
    fn rotate(
        &self,
        ct: &Self::Ciphertext,
        steps: usize,
        galois: &Self::GaloisKeys,
    ) -> Result<Self::Ciphertext>;

    /// Slot-wise sum.
    fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Result<Self::Ciphertext>;
}
