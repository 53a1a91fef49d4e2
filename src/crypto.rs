//! Credential hashing and UVC generation
//!
//! Two small capabilities back the ledger's credential handling:
//!
//! 1. [`CredentialVerifier`] — the opaque "credential verifier" the voter
//!    registry uses for sign-in secrets: a keyed Blake3 hash under a
//!    process-wide pepper, compared in constant time. The pepper is wiped
//!    from memory on drop.
//! 2. [`UvcGenerator`] — mints batches of unique random voting codes for
//!    the seeding collaborator to load into the credential store.

use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{Error, Result};

/// Default length of a generated UVC code
pub const DEFAULT_UVC_LENGTH: usize = 8;

/// Peppered hash of a sign-in secret (32 bytes, keyed Blake3)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretHash([u8; 32]);

impl SecretHash {
    /// Constant-time comparison against another hash.
    pub fn constant_time_eq(&self, other: &SecretHash) -> bool {
        self.0.ct_eq(&other.0).into()
    }

    /// Hex rendering, for diagnostics only.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Verifier for voter and commissioner sign-in secrets.
///
/// Hashing is keyed with a process-wide pepper so a leaked relation dump
/// alone cannot be dictionary-attacked. Verification always recomputes the
/// hash and compares in constant time; a mismatch is a normal outcome for
/// callers, never an error.
#[derive(Clone)]
pub struct CredentialVerifier {
    pepper: Zeroizing<[u8; 32]>,
}

impl CredentialVerifier {
    /// Create a verifier over the given pepper.
    pub fn new(pepper: [u8; 32]) -> Self {
        Self {
            pepper: Zeroizing::new(pepper),
        }
    }

    /// Create a verifier from base64-encoded pepper material
    /// (minimum 32 bytes decoded; only the first 32 are used).
    pub fn from_base64(encoded: &str) -> Result<Self> {
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| Error::config("credential pepper must be valid base64"))?;

        if decoded.len() < 32 {
            return Err(Error::config(
                "credential pepper must be at least 32 bytes when decoded",
            ));
        }

        let mut pepper = [0u8; 32];
        pepper.copy_from_slice(&decoded[..32]);
        Ok(Self::new(pepper))
    }

    /// Create a verifier with a random pepper for testing.
    pub fn for_testing() -> Self {
        let mut pepper = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut pepper);
        Self::new(pepper)
    }

    /// Hash a plaintext secret under the pepper.
    pub fn hash_secret(&self, secret: &str) -> SecretHash {
        let mut hasher = blake3::Hasher::new_keyed(&self.pepper);
        hasher.update(secret.as_bytes());
        SecretHash(hasher.finalize().into())
    }

    /// Verify a presented secret against a stored hash in constant time.
    pub fn verify(&self, expected: &SecretHash, presented: &str) -> bool {
        self.hash_secret(presented).constant_time_eq(expected)
    }
}

/// Generator of unique single-use voting codes.
pub struct UvcGenerator {
    code_length: usize,
}

impl UvcGenerator {
    /// Create a generator producing codes of the given length.
    pub fn new(code_length: usize) -> Self {
        Self { code_length }
    }

    /// Generate one random alphanumeric code.
    pub fn generate_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.code_length)
            .map(|_| rng.sample(Alphanumeric) as char)
            .collect()
    }

    /// Generate a batch of `count` distinct codes.
    ///
    /// Duplicates within the batch are regenerated, so the returned set is
    /// safe to hand straight to the credential store.
    pub fn generate_batch(&self, count: usize) -> Vec<String> {
        let mut codes = HashSet::with_capacity(count);
        while codes.len() < count {
            codes.insert(self.generate_code());
        }
        codes.into_iter().collect()
    }
}

impl Default for UvcGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_UVC_LENGTH)
    }
}
