//! secp256k1 key pairs and recoverable signatures.
//!
//! Keys travel as Base58 text: the private key is the 32-byte scalar
//! (left-padded with zeros), the public key is the 65-byte uncompressed
//! point. Signatures are 65 bytes `r || s || recovery_id` so the signer's
//! public key, and therefore its address, can be recovered from the
//! signature and the signed digest alone. Verification is address
//! recovery: callers compare the recovered address with the one they
//! expect.
//!
//! Signing is deterministic (RFC 6979) and always yields a low-S
//! signature.

use chainium_types::{ChainiumError, Result};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::FieldBytes;
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::address::derive_address;
use crate::encoding::{decode58, encode58};
use crate::hash::sha256;

/// Byte length of an encoded private key.
pub const PRIVATE_KEY_LEN: usize = 32;

// ---------------------------------------------------------------------------
// RecoverableSignature
// ---------------------------------------------------------------------------

/// A 65-byte recoverable ECDSA signature: `r (32) || s (32) || v (1)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecoverableSignature([u8; 65]);

impl RecoverableSignature {
    /// Fixed byte length of a recoverable signature.
    pub const LEN: usize = 65;

    /// Creates a [`RecoverableSignature`] from raw bytes.
    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    /// Decodes a Base58 signature string.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::SignatureRecoveryError`] if the text is
    /// not Base58 or does not decode to exactly 65 bytes.
    pub fn from_base58(text: &str) -> Result<Self> {
        let raw = decode58(text).map_err(|e| ChainiumError::SignatureRecoveryError {
            reason: e.to_string(),
        })?;
        let bytes: [u8; 65] =
            raw.as_slice()
                .try_into()
                .map_err(|_| ChainiumError::SignatureRecoveryError {
                    reason: format!("expected {} signature bytes, got {}", Self::LEN, raw.len()),
                })?;
        Ok(Self(bytes))
    }

    /// Returns the underlying 65-byte array.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Encodes the signature as Base58 text.
    pub fn to_base58(&self) -> String {
        encode58(&self.0)
    }

    /// Recovers the signer's address from this signature and the signed
    /// 32-byte digest.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::SignatureRecoveryError`] if the `r`/`s`
    /// scalars or the recovery id are out of range, or if no public key
    /// satisfies the signature. A wrong address is never returned.
    pub fn recover_address(&self, digest: &[u8; 32]) -> Result<String> {
        let signature = Signature::from_slice(&self.0[..64]).map_err(|e| {
            ChainiumError::SignatureRecoveryError {
                reason: format!("malformed signature: {e}"),
            }
        })?;
        let recovery_id =
            RecoveryId::from_byte(self.0[64]).ok_or_else(|| ChainiumError::SignatureRecoveryError {
                reason: format!("invalid recovery id {}", self.0[64]),
            })?;

        let verifying_key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|e| ChainiumError::SignatureRecoveryError {
                reason: format!("public key recovery failed: {e}"),
            })?;

        Ok(derive_address(
            verifying_key.to_encoded_point(false).as_bytes(),
        ))
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// secp256k1 signing key pair.
///
/// Wraps a `k256` [`SigningKey`], which zeroizes its scalar on drop.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a new random key pair using OS-level entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    /// Reconstructs a key pair from raw scalar bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::InvalidKey`] unless `bytes` is exactly 32
    /// bytes holding a scalar in `[1, n)`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(ChainiumError::InvalidKey {
                reason: format!(
                    "expected {PRIVATE_KEY_LEN} private key bytes, got {}",
                    bytes.len()
                ),
            });
        }
        let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(bytes)).map_err(|_| {
            ChainiumError::InvalidKey {
                reason: "private key is not a valid secp256k1 scalar".into(),
            }
        })?;
        Ok(Self { signing_key })
    }

    /// Reconstructs a key pair from a Base58 private key.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::InvalidKey`] if the text is not Base58 or
    /// does not hold a valid scalar.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let mut raw = decode58(private_key).map_err(|e| ChainiumError::InvalidKey {
            reason: e.to_string(),
        })?;
        let result = Self::from_bytes(&raw);
        raw.zeroize();
        result
    }

    /// Returns the private key as Base58 text of the 32-byte scalar.
    pub fn private_key(&self) -> String {
        encode58(&self.signing_key.to_bytes())
    }

    /// Returns the 65-byte uncompressed public key.
    pub fn public_key(&self) -> [u8; 65] {
        let point = self.signing_key.verifying_key().to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Returns the ledger address of this key pair.
    pub fn address(&self) -> String {
        derive_address(&self.public_key())
    }

    /// Signs a 32-byte digest.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::InvalidKey`] if the signer rejects the
    /// digest, which does not happen for a valid key.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<RecoverableSignature> {
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| ChainiumError::InvalidKey {
                reason: format!("signing failed: {e}"),
            })?;

        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&signature.to_bytes());
        out[64] = recovery_id.to_byte();
        Ok(RecoverableSignature(out))
    }
}

// KeyPair does not implement Clone or Debug so the scalar cannot leak
// through copies or logs.

// ---------------------------------------------------------------------------
// Digests
// ---------------------------------------------------------------------------

/// Network-bound message digest:
/// `SHA-256(SHA-256(message) || SHA-256(network_code))`.
pub fn message_digest(network_code: &[u8], message: &[u8]) -> [u8; 32] {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(&sha256(message));
    preimage[32..].copy_from_slice(&sha256(network_code));
    sha256(&preimage)
}

/// Plain-text digest: `SHA-256(text)`.
pub fn plain_text_digest(text: &[u8]) -> [u8; 32] {
    sha256(text)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Derives the address of a Base58 private key.
pub fn address_from_private_key(private_key: &str) -> Result<String> {
    Ok(KeyPair::from_private_key(private_key)?.address())
}

/// Signs a 32-byte digest with a Base58 private key and returns the
/// Base58 signature.
pub fn sign(private_key: &str, digest: &[u8; 32]) -> Result<String> {
    let key_pair = KeyPair::from_private_key(private_key)?;
    Ok(key_pair.sign_digest(digest)?.to_base58())
}

/// Signs `message` bound to `network_code`.
///
/// A signature produced for one network code never recovers the
/// signer's address under another.
pub fn sign_message(network_code: &[u8], private_key: &str, message: &[u8]) -> Result<String> {
    sign(private_key, &message_digest(network_code, message))
}

/// Signs `text` without network binding.
pub fn sign_plain_text(private_key: &str, text: &[u8]) -> Result<String> {
    sign(private_key, &plain_text_digest(text))
}

/// Recovers the signer's address of a [`sign_message`] signature.
pub fn verify_message(network_code: &[u8], signature: &str, message: &[u8]) -> Result<String> {
    RecoverableSignature::from_base58(signature)?
        .recover_address(&message_digest(network_code, message))
}

/// Recovers the signer's address of a [`sign_plain_text`] signature.
pub fn verify_plain_text(signature: &str, text: &[u8]) -> Result<String> {
    RecoverableSignature::from_base58(signature)?.recover_address(&plain_text_digest(text))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_key_roundtrips_through_base58() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let restored = KeyPair::from_private_key(&key_pair.private_key())?;
        assert_eq!(key_pair.public_key(), restored.public_key());
        assert_eq!(decode58(&key_pair.private_key())?.len(), PRIVATE_KEY_LEN);
        Ok(())
    }

    #[test]
    fn public_key_is_uncompressed() {
        let key_pair = KeyPair::generate();
        assert_eq!(key_pair.public_key()[0], 0x04);
    }

    #[test]
    fn short_private_key_rejected() {
        // 31 bytes: leading zero padding is mandatory.
        let short = encode58(&[0x01; 31]);
        assert!(matches!(
            KeyPair::from_private_key(&short),
            Err(ChainiumError::InvalidKey { .. })
        ));
    }

    #[test]
    fn zero_and_out_of_range_scalars_rejected() {
        assert!(KeyPair::from_bytes(&[0u8; 32]).is_err());
        assert!(KeyPair::from_bytes(&[0xFF; 32]).is_err());
    }

    #[test]
    fn non_base58_private_key_rejected() {
        assert!(matches!(
            address_from_private_key("not-base58-0OIl"),
            Err(ChainiumError::InvalidKey { .. })
        ));
    }

    #[test]
    fn sign_message_known_vector() -> std::result::Result<(), ChainiumError> {
        let signature = sign_message(
            b"UNIT_TESTS",
            "B6WNNx9oK8qRUU52PpzjXHZuv4NUb3Z33hdju3hhrceS",
            b"Chainium",
        )?;
        assert_eq!(
            signature,
            "6Hhxz2eP3AagR56mP4AAaKViUxHi3gM9c5weLDR48x4X4ynRBDfxsHGjhX9cni1mtCkNxbnZ783YPgMwVYV52X1w5"
        );
        Ok(())
    }

    #[test]
    fn sign_plain_text_known_vector() -> std::result::Result<(), ChainiumError> {
        let signature = sign_plain_text("3rzY3EENhYrWXzUqNnMEbGUr3iEzzSZrjMwJ1CgQpJpq", b"Chainium")?;
        assert_eq!(
            signature,
            "EzCsWgPozyVT9o6TycYV6q1n4YK4QWixa6Lk4GFvwrj6RU3K1wHcwNPZJUMBYcsGp5oFhytHiThon5zqE8uLk8naB"
        );
        Ok(())
    }

    #[test]
    fn signing_is_deterministic() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let digest = sha256(b"same input");
        assert_eq!(key_pair.sign_digest(&digest)?, key_pair.sign_digest(&digest)?);
        Ok(())
    }

    #[test]
    fn plain_text_recovers_signer() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let private_key = key_pair.private_key();
        let signature = sign_plain_text(&private_key, b"Chainium")?;
        assert_eq!(verify_plain_text(&signature, b"Chainium")?, key_pair.address());
        assert_eq!(address_from_private_key(&private_key)?, key_pair.address());
        Ok(())
    }

    #[test]
    fn message_recovers_signer_only_on_same_network() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let signature = sign_message(b"UNIT_TESTS", &key_pair.private_key(), b"payload")?;

        assert_eq!(
            verify_message(b"UNIT_TESTS", &signature, b"payload")?,
            key_pair.address()
        );

        // Another network either fails recovery or yields a different address.
        match verify_message(b"OWN_PUBLIC_BLOCKCHAIN_MAINNET", &signature, b"payload") {
            Ok(address) => assert_ne!(address, key_pair.address()),
            Err(e) => assert!(matches!(e, ChainiumError::SignatureRecoveryError { .. })),
        }
        Ok(())
    }

    #[test]
    fn tampered_text_does_not_recover_signer() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let signature = sign_plain_text(&key_pair.private_key(), b"original")?;
        if let Ok(address) = verify_plain_text(&signature, b"tampered") {
            assert_ne!(address, key_pair.address());
        }
        Ok(())
    }

    #[test]
    fn malformed_signatures_rejected() {
        assert!(matches!(
            verify_plain_text("", b"x"),
            Err(ChainiumError::SignatureRecoveryError { .. })
        ));
        assert!(matches!(
            verify_plain_text(&encode58(&[1u8; 64]), b"x"),
            Err(ChainiumError::SignatureRecoveryError { .. })
        ));

        // Zero r/s scalars.
        assert!(matches!(
            verify_plain_text(&encode58(&[0u8; 65]), b"x"),
            Err(ChainiumError::SignatureRecoveryError { .. })
        ));

        // Recovery id out of range.
        let mut bytes = [1u8; 65];
        bytes[64] = 7;
        assert!(matches!(
            RecoverableSignature::from_bytes(bytes).recover_address(&[0u8; 32]),
            Err(ChainiumError::SignatureRecoveryError { .. })
        ));
    }

    #[test]
    fn recovery_id_is_in_range() -> std::result::Result<(), ChainiumError> {
        let key_pair = KeyPair::generate();
        let signature = key_pair.sign_digest(&sha256(b"recid"))?;
        assert!(signature.as_bytes()[64] <= 3);
        Ok(())
    }
}
