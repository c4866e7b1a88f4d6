//! Ledger address derivation and validation.
//!
//! An address is 26 raw bytes, Base58-encoded:
//!
//! ```text
//! prefix (2) || SHA-160(SHA-256(public_key)) (20) || checksum (4)
//! checksum = SHA-256(SHA-256(prefix || key_hash))[0..4]
//! ```
//!
//! The prefix bytes `[6, 90]` make every encoded address start with
//! `CH`.

use chainium_types::{ChainiumError, Result, ADDRESS_LEN, ADDRESS_PREFIX, ADDRESS_TEXT_PREFIX};

use crate::encoding::{decode58, encode58};
use crate::hash::{sha160, sha256};

/// Number of checksum bytes appended to the prefixed key hash.
const CHECKSUM_LEN: usize = 4;

/// Length of the prefixed key hash covered by the checksum.
const BODY_LEN: usize = ADDRESS_LEN - CHECKSUM_LEN;

/// Computes the 4-byte checksum of a prefixed key hash.
fn checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256(&sha256(body));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Derives the ledger address of a public key.
///
/// `public_key` is the 65-byte uncompressed SEC1 encoding
/// (`0x04 || X || Y`). The derivation is deterministic and total over
/// any byte string; only the uncompressed form matches the addresses
/// the ledger computes.
pub fn derive_address(public_key: &[u8]) -> String {
    let key_hash = sha160(&sha256(public_key));

    let mut raw = Vec::with_capacity(ADDRESS_LEN);
    raw.extend_from_slice(&ADDRESS_PREFIX);
    raw.extend_from_slice(&key_hash);
    let sum = checksum(&raw);
    raw.extend_from_slice(&sum);

    encode58(&raw)
}

/// Validates an address string.
///
/// Checks, in order: non-empty, `CH` text prefix, Base58 alphabet,
/// 26 decoded bytes, `[6, 90]` prefix bytes, checksum.
///
/// # Errors
///
/// Returns [`ChainiumError::InvalidAddress`] naming the first rule that
/// failed.
pub fn validate_address(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(ChainiumError::InvalidAddress {
            reason: "address is empty".into(),
        });
    }

    if !address.starts_with(ADDRESS_TEXT_PREFIX) {
        return Err(ChainiumError::InvalidAddress {
            reason: format!("address must start with '{ADDRESS_TEXT_PREFIX}'"),
        });
    }

    let raw = decode58(address).map_err(|e| ChainiumError::InvalidAddress {
        reason: e.to_string(),
    })?;

    if raw.len() != ADDRESS_LEN {
        return Err(ChainiumError::InvalidAddress {
            reason: format!("expected {ADDRESS_LEN} decoded bytes, got {}", raw.len()),
        });
    }

    if raw[..2] != ADDRESS_PREFIX {
        return Err(ChainiumError::InvalidAddress {
            reason: "wrong network prefix bytes".into(),
        });
    }

    let (body, provided) = raw.split_at(BODY_LEN);
    if provided != checksum(body) {
        return Err(ChainiumError::InvalidAddress {
            reason: "checksum mismatch".into(),
        });
    }

    Ok(())
}

/// Returns `true` if `address` passes every rule of [`validate_address`].
pub fn is_valid_address(address: &str) -> bool {
    validate_address(address).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
