//! Trivial slot provider for engine tests.
//!
//! Ciphertexts are plain slot vectors and every operation is the
//! plaintext slot semantics the real provider implements: slot-wise
//! multiply, cyclic left rotation, slot-wise add. This lets the tests
//! exercise packing, orchestration, and validation with exact integers
//! and observable call counts, independent of the cryptography.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ring::{ProviderKeySet, RingProvider};

#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct MockKey {
    tag: u8,
}

#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct MockCiphertext {
    slots: Vec<u64>,
}

pub(crate) struct MockRing {
    slot_count: usize,
    t: u64,
    fail_keygen: bool,
    multiplies: Arc<AtomicUsize>,
}

impl MockRing {
    pub(crate) fn new(slot_count: usize, t: u64) -> Self {
        Self {
            slot_count,
            t,
            fail_keygen: false,
            multiplies: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing_keygen(slot_count: usize, t: u64) -> Self {
        Self {
            fail_keygen: true,
            ..Self::new(slot_count, t)
        }
    }

    pub(crate) fn multiply_count(&self) -> usize {
        self.multiplies.load(Ordering::SeqCst)
    }
}

impl RingProvider for MockRing {
    type PublicKey = MockKey;
    type SecretKey = MockKey;
    type GaloisKeys = MockKey;
    type RelinKey = MockKey;
    type Ciphertext = MockCiphertext;

    fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn plain_modulus(&self) -> u64 {
        self.t
    }

    fn generate_keys(&self) -> Result<ProviderKeySet<Self>> {
        if self.fail_keygen {
            return Err(Error::KeyGenerationFailure("mock entropy exhausted".into()));
        }
        Ok(ProviderKeySet {
            public: MockKey { tag: 0 },
            secret: MockKey { tag: 1 },
            galois: MockKey { tag: 2 },
            relin: MockKey { tag: 3 },
        })
    }

    fn encrypt(&self, slots: &[u64], _public: &MockKey) -> Result<MockCiphertext> {
        let mut padded: Vec<u64> = slots.iter().map(|&v| v % self.t).collect();
        padded.resize(self.slot_count, 0);
        Ok(MockCiphertext { slots: padded })
    }

    fn decrypt(&self, ct: &MockCiphertext, _secret: &MockKey) -> Result<Vec<u64>> {
        Ok(ct.slots.clone())
    }

    fn multiply(
        &self,
        a: &MockCiphertext,
        b: &MockCiphertext,
        _relin: &MockKey,
    ) -> Result<MockCiphertext> {
        self.multiplies.fetch_add(1, Ordering::SeqCst);
        Ok(MockCiphertext {
            slots: a
                .slots
                .iter()
                .zip(&b.slots)
                .map(|(&x, &y)| x * y % self.t)
                .collect(),
        })
    }

    fn rotate(&self, ct: &MockCiphertext, steps: usize, _galois: &MockKey) -> Result<MockCiphertext> {
        let mut slots = ct.slots.clone();
        slots.rotate_left(steps % self.slot_count);
        Ok(MockCiphertext { slots })
    }

    fn add(&self, a: &MockCiphertext, b: &MockCiphertext) -> Result<MockCiphertext> {
        Ok(MockCiphertext {
            slots: a
                .slots
                .iter()
                .zip(&b.slots)
                .map(|(&x, &y)| (x + y) % self.t)
                .collect(),
        })
    }
}
