//! Encrypted keystores: a BIP39 seed sealed with AES-256-GCM.
//!
//! A keystore lets a caller persist HD wallets without keeping the
//! mnemonic around. The blob is `nonce || ciphertext || tag`, keyed by a
//! caller-supplied 32-byte password hash; turning a human password into
//! that hash is the caller's job. The seed inside is always derived
//! with an empty BIP39 passphrase.

use chainium_crypto::aead::{decrypt, encrypt};
use chainium_crypto::mnemonic::{mnemonic_to_seed, Seed};
use chainium_types::config::SdkConfig;
use chainium_types::{ChainiumError, Result, Wallet};
use zeroize::Zeroize;

use crate::wallet::{check_restore_count, restore_wallets, wallet_from_seed};

/// Seals the seed of `mnemonic` into a keystore blob.
///
/// # Errors
///
/// - [`ChainiumError::InvalidMnemonic`] if the mnemonic fails validation.
/// - [`ChainiumError::EncryptionError`] if sealing fails.
pub fn generate_keystore(mnemonic: &str, password_hash: &[u8; 32]) -> Result<Vec<u8>> {
    let seed = mnemonic_to_seed(mnemonic, "")?;
    let blob = encrypt(seed.as_bytes(), password_hash)?;
    tracing::debug!(len = blob.len(), "keystore generated");
    Ok(blob)
}

/// Opens a keystore blob and returns its seed.
///
/// # Errors
///
/// Returns [`ChainiumError::DecryptionError`] on a wrong password hash,
/// a tampered or truncated blob, or a payload that is not a 64-byte
/// seed. No partial seed is ever returned.
pub fn seed_from_keystore(blob: &[u8], password_hash: &[u8; 32]) -> Result<Seed> {
    let mut plaintext = decrypt(blob, password_hash).map_err(|e| {
        tracing::warn!(len = blob.len(), "keystore decryption failed");
        e
    })?;

    let seed = Seed::from_slice(&plaintext).map_err(|_| {
        tracing::warn!(payload_len = plaintext.len(), "keystore payload is not a seed");
        ChainiumError::DecryptionError {
            reason: format!(
                "keystore payload is {} bytes, expected a {}-byte seed",
                plaintext.len(),
                Seed::LEN
            ),
        }
    });
    plaintext.zeroize();
    seed
}

/// Derives the wallet at `index` from a keystore blob.
pub fn wallet_from_keystore(blob: &[u8], password_hash: &[u8; 32], index: u32) -> Result<Wallet> {
    let seed = seed_from_keystore(blob, password_hash)?;
    wallet_from_seed(&seed, index)
}

/// Restores wallets `0..count` from a keystore blob.
pub fn restore_wallets_from_keystore(
    blob: &[u8],
    password_hash: &[u8; 32],
    count: u32,
) -> Result<Vec<Wallet>> {
    let seed = seed_from_keystore(blob, password_hash)?;
    restore_wallets(&seed, count)
}

/// Restores wallets `0..count` from a keystore blob, refusing counts
/// above [`SdkConfig::max_restore_count`].
pub fn restore_wallets_from_keystore_with_config(
    config: &SdkConfig,
    blob: &[u8],
    password_hash: &[u8; 32],
    count: u32,
) -> Result<Vec<Wallet>> {
    check_restore_count(config, count)?;
    restore_wallets_from_keystore(blob, password_hash, count)
}
