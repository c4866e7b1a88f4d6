//! Hash functions used by the ledger protocol.
//!
//! - [`sha256`] / [`sha512`]: plain digests.
//! - [`sha160`]: the first 20 bytes of SHA-512. This is *not*
//!   RIPEMD-160 or SHA-1; it feeds every address and must stay a
//!   SHA-512 truncation.
//! - [`hash`]: `Base58(SHA-256(data))`, the generic content hash.
//! - [`derive_hash`]: predicts the identifier of an entity created by
//!   a transaction action before the transaction is submitted.

use chainium_types::Result;
use sha2::{Digest, Sha256, Sha512};

use crate::encoding::{decode58, encode58};

/// Computes the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Computes the SHA-512 digest of `data`.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(data));
    out
}

/// Computes the 160-bit protocol hash: `SHA-512(data)[0..20]`.
pub fn sha160(data: &[u8]) -> [u8; 20] {
    let digest = sha512(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[..20]);
    out
}

/// Computes the generic content hash: `Base58(SHA-256(data))`.
pub fn hash(data: &[u8]) -> String {
    encode58(&sha256(data))
}

/// Derives the identifier of the entity created by an action.
///
/// Formula:
/// `Hash(decode58(address) || nonce_be_u64 || action_number_be_u16)`
///
/// - `address`: sender address text, decoded to its 26 raw bytes
/// - `nonce`: transaction nonce, 8 bytes big-endian (two's complement)
/// - `action_number`: 1-based position of the action in the
///   transaction, 2 bytes big-endian
///
/// The layout is a binary format: any change in width or byte order
/// changes every derived identifier.
///
/// # Errors
///
/// Returns [`chainium_types::ChainiumError::DecodeError`] if `address`
/// is not Base58.
pub fn derive_hash(address: &str, nonce: i64, action_number: u16) -> Result<String> {
    let address_bytes = decode58(address)?;

    let mut preimage = Vec::with_capacity(address_bytes.len() + 8 + 2);
    preimage.extend_from_slice(&address_bytes);
    preimage.extend_from_slice(&nonce.to_be_bytes());
    preimage.extend_from_slice(&action_number.to_be_bytes());

    Ok(hash(&preimage))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
