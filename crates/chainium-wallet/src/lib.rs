//! Wallets for the Chainium ledger.
//!
//! - **Generate** a random key pair wallet or rebuild one from a private key
//! - **Derive** HD wallets from a BIP39 seed on `m/44'/25718'/0'/0/{index}`
//! - **Restore** the first `count` HD wallets of a seed
//! - **Keystore**: persist a seed encrypted under a caller-supplied
//!   32-byte password hash and derive wallets straight from the blob
//!
//! Every wallet is a [`chainium_types::Wallet`]: a Base58 private key and
//! its address.

pub mod keystore;
pub mod wallet;

pub use chainium_types::Wallet;
