//! Key material as opaque serialized buffers.
//!
//! A key set is four byte buffers — public, secret, Galois, and
//! relinearization — produced atomically by one generation call. Each
//! buffer carries a header binding it to the ring parameters and to a
//! random per-generation key id; the engine checks both before any ring
//! work, so a key from another context or generation is rejected
//! instead of producing garbage. Buffer length and internal layout are
//! provider-defined; callers only move the bytes around.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::context::RingContext;
use crate::error::{Error, Result};
use crate::ring::RingProvider;

/// Which of the four key roles a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRole {
    /// Encryption key.
    Public,
    /// Decryption key.
    Secret,
    /// Rotation keys.
    Galois,
    /// Relinearization key.
    Relin,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Public => write!(f, "public key"),
            KeyRole::Secret => write!(f, "secret key"),
            KeyRole::Galois => write!(f, "galois keys"),
            KeyRole::Relin => write!(f, "relinearization keys"),
        }
    }
}

/// Binding header embedded in every key buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct KeyHeader {
    pub role: KeyRole,
    pub degree: usize,
    pub plain_modulus: u64,
    pub ct_modulus: u64,
    /// Random id shared by the four buffers of one generation.
    pub key_id: u64,
}

#[derive(Serialize, Deserialize)]
struct Sealed<K> {
    header: KeyHeader,
    key: K,
}

/// One opaque key buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBuffer {
    bytes: Vec<u8>,
}

impl KeyBuffer {
    /// Wrap bytes received from the other party.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The serialized form, for transport.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Provider-reported length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The four key roles of one generation.
///
/// The secret key is the sensitive asset: ship `public_key`,
/// `galois_keys`, and `relin_keys` to the computing party and keep
/// `secret_key` with the decrypting party.
#[derive(Debug)]
pub struct KeyMaterial {
    /// Encryption key buffer.
    pub public_key: KeyBuffer,
    /// Decryption key buffer. Never send this to the computing party.
    pub secret_key: KeyBuffer,
    /// Rotation key buffer, consumed by multiplication.
    pub galois_keys: KeyBuffer,
    /// Relinearization key buffer, consumed by multiplication.
    pub relin_keys: KeyBuffer,
}

impl KeyMaterial {
    /// Generate a complete key set under `ctx`.
    ///
    /// All four buffers are produced, or the call fails with
    /// [`Error::KeyGenerationFailure`]; there are no partial key sets.
    /// Re-generating is allowed but ciphertexts stay bound to the
    /// generation that encrypted them.
    pub fn generate<P: RingProvider>(ctx: &RingContext<P>) -> Result<Self> {
        let keys = ctx.provider().generate_keys()?;
        let key_id: u64 = rand::random();
        let header = |role| KeyHeader {
            role,
            degree: ctx.params().degree,
            plain_modulus: ctx.params().plain_modulus,
            ct_modulus: ctx.params().ct_modulus,
            key_id,
        };
        Ok(Self {
            public_key: seal(header(KeyRole::Public), &keys.public)?,
            secret_key: seal(header(KeyRole::Secret), &keys.secret)?,
            galois_keys: seal(header(KeyRole::Galois), &keys.galois)?,
            relin_keys: seal(header(KeyRole::Relin), &keys.relin)?,
        })
    }
}

fn seal<K: Serialize>(header: KeyHeader, key: &K) -> Result<KeyBuffer> {
    let bytes = bincode::serialize(&SealedRef { header, key })?;
    Ok(KeyBuffer { bytes })
}

#[derive(Serialize)]
struct SealedRef<'a, K> {
    header: KeyHeader,
    key: &'a K,
}

/// Decode a key buffer for use under `ctx`, checking role and binding.
pub(crate) fn open_key<P: RingProvider, K: DeserializeOwned>(
    buffer: &KeyBuffer,
    ctx: &RingContext<P>,
    role: KeyRole,
) -> Result<(KeyHeader, K)> {
    let sealed: Sealed<K> = bincode::deserialize(&buffer.bytes)?;
    let h = sealed.header;
    if h.role != role {
        return Err(Error::Serialization(format!(
            "buffer holds a {} where a {} was expected",
            h.role, role
        )));
    }
    let p = ctx.params();
    if h.degree != p.degree || h.plain_modulus != p.plain_modulus || h.ct_modulus != p.ct_modulus {
        return Err(Error::ContextMismatch {
            what: match role {
                KeyRole::Public => "public key",
                KeyRole::Secret => "secret key",
                KeyRole::Galois => "galois keys",
                KeyRole::Relin => "relinearization keys",
            },
        });
    }
    Ok((h, sealed.key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_display() {
        assert_eq!(KeyRole::Public.to_string(), "public key");
        assert_eq!(KeyRole::Galois.to_string(), "galois keys");
    }

    #[test]
    fn buffer_transport_roundtrip() {
        let buf = KeyBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(buf.len(), 3);
        let moved = KeyBuffer::from_bytes(buf.as_bytes().to_vec());
        assert_eq!(moved, buf);
    }
}
