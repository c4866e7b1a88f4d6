//! Core shared types for the Chainium client SDK.
//!
//! This crate defines the error taxonomy, the [`Wallet`] value type,
//! the fixed protocol constants and the SDK configuration. Every other
//! crate in the workspace reports failures through [`ChainiumError`].

pub mod config;
pub mod decimal;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Raw two-byte network prefix of every ledger address.
///
/// Base58-encodes to the textual prefix [`ADDRESS_TEXT_PREFIX`].
pub const ADDRESS_PREFIX: [u8; 2] = [6, 90];

/// Textual prefix every valid address string starts with.
pub const ADDRESS_TEXT_PREFIX: &str = "CH";

/// Decoded length of an address: prefix (2) + key hash (20) + checksum (4).
pub const ADDRESS_LEN: usize = 26;

/// BIP-44 coin type registered for the ledger.
pub const COIN_TYPE: u32 = 25718;

/// Network code of the public main network.
pub const MAINNET_NETWORK_CODE: &str = "OWN_PUBLIC_BLOCKCHAIN_MAINNET";

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// A private key and the address derived from it.
///
/// Both fields are text: the private key is the Base58 encoding of the
/// 32-byte secp256k1 scalar, the address is the checksummed Base58
/// address. The private key string is zeroized on drop.
#[derive(Clone, Eq, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    private_key: String,
    address: String,
}

impl Wallet {
    /// Creates a wallet from an already derived key/address pair.
    pub fn new(private_key: String, address: String) -> Self {
        Self {
            private_key,
            address,
        }
    }

    /// Returns the Base58-encoded private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Returns the ledger address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

// The private key never appears in debug output.
impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("private_key", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// ChainiumError
// ---------------------------------------------------------------------------

/// Central error type for the Chainium SDK.
///
/// Each variant is one failure kind so callers can tell a malformed
/// user input apart from a misuse of the API. Nothing in the SDK
/// retries on error.
#[derive(Debug, Error)]
pub enum ChainiumError {
    /// Base58 or Base64 text could not be decoded.
    #[error("decode error: {reason}")]
    DecodeError {
        /// Human-readable description of the decoding failure.
        reason: String,
    },

    /// Text decodes, but fails the address prefix, length or checksum rules.
    #[error("invalid address: {reason}")]
    InvalidAddress {
        /// Which address rule failed.
        reason: String,
    },

    /// A private key is malformed or is not a valid secp256k1 scalar.
    #[error("invalid key: {reason}")]
    InvalidKey {
        /// Human-readable description of the key problem.
        reason: String,
    },

    /// A mnemonic failed word-list or checksum validation.
    ///
    /// This is a caller precondition violation; see [`ChainiumError::is_fatal`].
    #[error("invalid mnemonic: {reason}")]
    InvalidMnemonic {
        /// Human-readable description of the mnemonic problem.
        reason: String,
    },

    /// A signature is malformed or no public key can be recovered from it.
    #[error("signature recovery failed: {reason}")]
    SignatureRecoveryError {
        /// Human-readable description of the recovery failure.
        reason: String,
    },

    /// Authenticated encryption could not be performed.
    #[error("encryption failed: {reason}")]
    EncryptionError {
        /// Human-readable description of the encryption failure.
        reason: String,
    },

    /// Authenticated decryption failed (tag mismatch or truncated input).
    #[error("decryption failed: {reason}")]
    DecryptionError {
        /// Human-readable description of the decryption failure.
        reason: String,
    },

    /// Hierarchical key derivation failed.
    #[error("derivation error: {reason}")]
    DerivationError {
        /// Human-readable description of the derivation failure.
        reason: String,
    },

    /// JSON encoding or decoding of a protocol object failed.
    #[error("serialization error: {reason}")]
    SerializationError {
        /// Human-readable description of the serialization failure.
        reason: String,
    },

    /// A transaction cannot be built as requested.
    #[error("invalid transaction: {reason}")]
    InvalidTransaction {
        /// Human-readable description of the transaction problem.
        reason: String,
    },

    /// A configuration value is invalid or missing.
    #[error("config error: {reason}")]
    ConfigError {
        /// Human-readable description of the configuration problem.
        reason: String,
    },
}

impl ChainiumError {
    /// Returns `true` for errors that indicate caller misuse rather than
    /// a bad runtime input.
    ///
    /// Only [`ChainiumError::InvalidMnemonic`] is fatal: a mnemonic that
    /// fails its checksum means the caller's configuration is wrong,
    /// and no amount of retrying will fix it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidMnemonic { .. })
    }
}

// ---------------------------------------------------------------------------
// Result alias
// ---------------------------------------------------------------------------

/// Convenience result type using [`ChainiumError`].
pub type Result<T> = std::result::Result<T, ChainiumError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_debug_redacts_private_key() {
        let wallet = Wallet::new("secret-key".into(), "CHaddress".into());
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("CHaddress"));
    }

    #[test]
    fn wallet_serde_uses_camel_case() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let wallet = Wallet::new("key".into(), "CHaddr".into());
        let json = serde_json::to_string(&wallet)?;
        assert_eq!(json, r#"{"privateKey":"key","address":"CHaddr"}"#);

        let parsed: Wallet = serde_json::from_str(&json)?;
        assert_eq!(parsed, wallet);
        Ok(())
    }

    #[test]
    fn only_invalid_mnemonic_is_fatal() {
        let mnemonic = ChainiumError::InvalidMnemonic {
            reason: "checksum mismatch".into(),
        };
        let derivation = ChainiumError::DerivationError {
            reason: "invalid child".into(),
        };
        let decode = ChainiumError::DecodeError {
            reason: "bad char".into(),
        };
        assert!(mnemonic.is_fatal());
        assert!(!derivation.is_fatal());
        assert!(!decode.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = ChainiumError::InvalidAddress {
            reason: "checksum mismatch".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid address"));
        assert!(msg.contains("checksum mismatch"));
    }
}
