//! AES-256-GCM authenticated encryption of keystore blobs.
//!
//! Blob layout:
//!
//! ```text
//! nonce (12) || ciphertext || tag (16)
//! ```
//!
//! Each encryption draws a fresh 96-bit nonce from OS entropy, so the
//! blob is self-contained. Decryption fails closed: a wrong key, a
//! flipped bit or a truncated blob yields
//! [`ChainiumError::DecryptionError`] and no plaintext.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use chainium_types::{ChainiumError, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

// ---------------------------------------------------------------------------
// AeadNonce
// ---------------------------------------------------------------------------

/// 96-bit (12-byte) nonce for AES-256-GCM.
///
/// Must be unique per encryption under one key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AeadNonce([u8; 12]);

impl AeadNonce {
    /// Fixed byte length of an AES-GCM nonce.
    pub const LEN: usize = 12;

    /// Creates an [`AeadNonce`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 12-byte array.
    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

/// Generates a fresh 96-bit random nonce from OS entropy.
pub fn generate_aead_nonce() -> AeadNonce {
    let mut bytes = [0u8; AeadNonce::LEN];
    OsRng.fill_bytes(&mut bytes);
    AeadNonce(bytes)
}

// ---------------------------------------------------------------------------
// Encrypt / Decrypt
// ---------------------------------------------------------------------------

/// Encrypts `plaintext` under a 32-byte key with a fresh random nonce.
///
/// Returns `nonce || ciphertext || tag`.
pub fn encrypt(plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
    encrypt_with_nonce(plaintext, key, &generate_aead_nonce())
}

/// Encrypts `plaintext` under a caller-chosen nonce.
///
/// Deterministic core of [`encrypt`]. Reusing a nonce under the same
/// key breaks GCM confidentiality and authenticity.
///
/// # Errors
///
/// Returns [`ChainiumError::EncryptionError`] if the cipher rejects the
/// input (plaintext beyond the GCM length limit).
pub fn encrypt_with_nonce(plaintext: &[u8], key: &[u8; 32], nonce: &AeadNonce) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce.0), plaintext)
        .map_err(|e| ChainiumError::EncryptionError {
            reason: format!("AES-256-GCM encryption failed: {e}"),
        })?;

    let mut blob = Vec::with_capacity(AeadNonce::LEN + sealed.len());
    blob.extend_from_slice(&nonce.0);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypts a `nonce || ciphertext || tag` blob.
///
/// # Errors
///
/// Returns [`ChainiumError::DecryptionError`] if the blob is shorter
/// than a nonce plus a tag, or if the tag does not verify (wrong key or
/// tampered data).
pub fn decrypt(blob: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
    if blob.len() < AeadNonce::LEN + TAG_LEN {
        return Err(ChainiumError::DecryptionError {
            reason: format!(
                "blob of {} bytes is shorter than nonce and tag ({} bytes)",
                blob.len(),
                AeadNonce::LEN + TAG_LEN
            ),
        });
    }

    let (nonce, sealed) = blob.split_at(AeadNonce::LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| ChainiumError::DecryptionError {
            reason: "authentication tag mismatch".into(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
