//! Cryptographic primitives for the Chainium ledger client.
//!
//! This crate is the only place in the workspace that touches raw
//! cryptography. Every algorithm is fixed by the ledger protocol.
//!
//! # Modules
//!
//! - [`encoding`]: Base58 and Base64 codecs
//! - [`hash`]: SHA-256/512, truncated 160-bit hash, content and action hashes
//! - [`address`]: public key to checksummed address, address validation
//! - [`signing`]: secp256k1 key pairs, recoverable signatures, signer recovery
//! - [`mnemonic`]: BIP39 mnemonic generation, validation and seed derivation
//! - [`hd_derive`]: BIP32/BIP44 secp256k1 key derivation
//! - [`aead`]: AES-256-GCM encryption of keystore blobs

pub mod address;
pub mod aead;
pub mod encoding;
pub mod hash;
pub mod hd_derive;
pub mod mnemonic;
pub mod signing;
