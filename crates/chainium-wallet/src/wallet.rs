//! Wallet construction and HD wallet restoration.

use chainium_crypto::hd_derive::{check_address_index, derive_bip44_chain, ExtendedPrivateKey};
use chainium_crypto::mnemonic::Seed;
use chainium_crypto::signing::KeyPair;
use chainium_types::config::SdkConfig;
use chainium_types::{ChainiumError, Result, Wallet, COIN_TYPE};

// ---------------------------------------------------------------------------
// Key pair wallets
// ---------------------------------------------------------------------------

/// Generates a wallet around a fresh random key pair.
pub fn generate_wallet() -> Wallet {
    let key_pair = KeyPair::generate();
    let wallet = Wallet::new(key_pair.private_key(), key_pair.address());
    tracing::debug!(address = %wallet.address(), "wallet generated");
    wallet
}

/// Rebuilds the wallet of a Base58 private key.
///
/// The returned wallet carries the key exactly as given.
///
/// # Errors
///
/// Returns [`ChainiumError::InvalidKey`] if the key does not decode to a
/// valid 32-byte scalar.
pub fn wallet_from_private_key(private_key: &str) -> Result<Wallet> {
    let key_pair = KeyPair::from_private_key(private_key)?;
    Ok(Wallet::new(private_key.to_string(), key_pair.address()))
}

// ---------------------------------------------------------------------------
// HD wallets
// ---------------------------------------------------------------------------

fn wallet_from_node(node: &ExtendedPrivateKey) -> Result<Wallet> {
    let key_pair = node.to_key_pair()?;
    Ok(Wallet::new(key_pair.private_key(), key_pair.address()))
}

/// Derives the wallet at `m/44'/{coin}'/0'/0/{index}`.
///
/// # Errors
///
/// Returns [`ChainiumError::DerivationError`] if `coin` or `index` is
/// out of the non-hardened range, or the path hits an invalid node.
pub fn wallet_from_seed_with_coin(seed: &Seed, coin: u32, index: u32) -> Result<Wallet> {
    check_address_index(index)?;
    let master = ExtendedPrivateKey::master_from_seed(seed.as_bytes())?;
    let node = derive_bip44_chain(&master, coin)?.derive_child(index)?;
    let wallet = wallet_from_node(&node)?;
    tracing::debug!(coin, index, address = %wallet.address(), "HD wallet derived");
    Ok(wallet)
}

/// Derives the ledger wallet at address index `index`.
pub fn wallet_from_seed(seed: &Seed, index: u32) -> Result<Wallet> {
    wallet_from_seed_with_coin(seed, COIN_TYPE, index)
}

/// Restores wallets `0..count` of a seed, in index order.
///
/// The result for `count = n` is always a prefix of the result for any
/// larger count. `count = 0` yields an empty list.
///
/// # Errors
///
/// Returns [`ChainiumError::DerivationError`] if `count` reaches into
/// the hardened index range or a node along the path is invalid.
pub fn restore_wallets(seed: &Seed, count: u32) -> Result<Vec<Wallet>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    check_address_index(count - 1)?;

    let master = ExtendedPrivateKey::master_from_seed(seed.as_bytes())?;
    let chain = derive_bip44_chain(&master, COIN_TYPE)?;

    let wallets = (0..count)
        .map(|index| wallet_from_node(&chain.derive_child(index)?))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(count, "HD wallets restored");
    Ok(wallets)
}

/// Restores wallets `0..count`, refusing counts above
/// [`SdkConfig::max_restore_count`].
///
/// # Errors
///
/// Returns [`ChainiumError::ConfigError`] if `count` exceeds the
/// configured bound, otherwise as [`restore_wallets`].
pub fn restore_wallets_with_config(config: &SdkConfig, seed: &Seed, count: u32) -> Result<Vec<Wallet>> {
    check_restore_count(config, count)?;
    restore_wallets(seed, count)
}

pub(crate) fn check_restore_count(config: &SdkConfig, count: u32) -> Result<()> {
    if count > config.max_restore_count {
        return Err(ChainiumError::ConfigError {
            reason: format!(
                "restore count {count} exceeds max_restore_count ({})",
                config.max_restore_count
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
