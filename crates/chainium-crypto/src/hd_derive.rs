//! BIP-32 secp256k1 hierarchical deterministic key derivation.
//!
//! Wallet keys live on the BIP-44 path
//!
//! ```text
//! m/44'/{coin}'/0'/0/{index}
//! ```
//!
//! hardened purpose, coin type and account, then the non-hardened
//! external chain and address index. Paths mark hardened components with
//! `'`, `h` or `H`.
//!
//! # Process (BIP-32)
//!
//! 1. Master key: `I = HMAC-SHA512(key="Bitcoin seed", data=seed)`;
//!    `IL` is the master scalar, `IR` the chain code.
//! 2. Child `i`:
//!    - hardened: `data = 0x00 || k_par || ser32(i)`
//!    - normal: `data = serP(K_par) || ser32(i)` (compressed point)
//!
//!    `I = HMAC-SHA512(key=c_par, data)`, `k_i = IL + k_par mod n`,
//!    `c_i = IR`.
//! 3. `IL >= n` or `k_i == 0` makes the child invalid; this reports a
//!    [`ChainiumError::DerivationError`] rather than skipping the index.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use chainium_types::{ChainiumError, Result};
use hmac::{Hmac, Mac};
use k256::ecdsa::SigningKey;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar};
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::signing::KeyPair;

/// HMAC-SHA512 type alias used throughout BIP-32.
type HmacSha512 = Hmac<Sha512>;

/// The hardened index offset (0x80000000).
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for master key generation.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// BIP-44 purpose component.
const BIP44_PURPOSE: u32 = 44;

// ---------------------------------------------------------------------------
// ExtendedPrivateKey
// ---------------------------------------------------------------------------

/// A private key plus its chain code. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ExtendedPrivateKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedPrivateKey {
    /// Generates the master key of a seed.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::DerivationError`] if the seed is not
    /// 16 to 64 bytes, or if it yields an invalid master scalar.
    pub fn master_from_seed(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(ChainiumError::DerivationError {
                reason: format!("seed must be 16 to 64 bytes, got {}", seed.len()),
            });
        }

        let mut i = hmac_sha512(MASTER_HMAC_KEY, seed)?;
        let result = split_checked(&i);
        i.zeroize();
        result
    }

    /// Returns the 32-byte private scalar.
    pub fn key(&self) -> &[u8; 32] {
        &self.key
    }

    /// Returns the 32-byte chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Builds the signing key pair of this node.
    pub fn to_key_pair(&self) -> Result<KeyPair> {
        KeyPair::from_bytes(&self.key).map_err(|e| ChainiumError::DerivationError {
            reason: e.to_string(),
        })
    }

    /// Derives child `index`. Indices at or above [`HARDENED_OFFSET`]
    /// are hardened.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::DerivationError`] if the child is
    /// invalid for this parent.
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        let mut data = Vec::with_capacity(37);
        if index >= HARDENED_OFFSET {
            data.push(0x00);
            data.extend_from_slice(&self.key);
        } else {
            data.extend_from_slice(&self.compressed_public_key()?);
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut i = hmac_sha512(&self.chain_code, &data)?;
        data.zeroize();

        let result = child_from_hmac(&i, &self.key, index);
        i.zeroize();
        result
    }

    /// Walks a `m/...` path starting at this node.
    pub fn derive_path(&self, path: &str) -> Result<Self> {
        let indices = parse_derivation_path(path)?;
        self.derive_indices(&indices)
    }

    fn derive_indices(&self, indices: &[u32]) -> Result<Self> {
        let mut node = Self {
            key: self.key,
            chain_code: self.chain_code,
        };
        for &index in indices {
            node = node.derive_child(index)?;
        }
        Ok(node)
    }

    fn compressed_public_key(&self) -> Result<[u8; 33]> {
        let signing_key = SigningKey::from_bytes(FieldBytes::from_slice(&self.key)).map_err(|_| {
            ChainiumError::DerivationError {
                reason: "parent key is not a valid scalar".into(),
            }
        })?;
        let point = signing_key.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        Ok(out)
    }
}

// ExtendedPrivateKey does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derives the node at `path` from a seed.
///
/// # Errors
///
/// Returns [`ChainiumError::DerivationError`] on a malformed path or an
/// invalid node along it.
pub fn derive_path(seed: &[u8], path: &str) -> Result<ExtendedPrivateKey> {
    let indices = parse_derivation_path(path)?;
    ExtendedPrivateKey::master_from_seed(seed)?.derive_indices(&indices)
}

/// Formats the BIP-44 wallet path of `coin` and `index`.
pub fn bip44_path(coin: u32, index: u32) -> String {
    format!("m/{BIP44_PURPOSE}'/{coin}'/0'/0/{index}")
}

/// Derives the external chain node `m/44'/{coin}'/0'/0`.
///
/// Wallet keys are its non-hardened children; deriving this node once
/// and calling [`ExtendedPrivateKey::derive_child`] per index yields the
/// same keys as [`derive_bip44`].
pub fn derive_bip44_chain(master: &ExtendedPrivateKey, coin: u32) -> Result<ExtendedPrivateKey> {
    if coin >= HARDENED_OFFSET {
        return Err(ChainiumError::DerivationError {
            reason: format!("coin type {coin} exceeds maximum ({})", HARDENED_OFFSET - 1),
        });
    }
    master.derive_indices(&[
        BIP44_PURPOSE | HARDENED_OFFSET,
        coin | HARDENED_OFFSET,
        HARDENED_OFFSET,
        0,
    ])
}

/// Derives the wallet node `m/44'/{coin}'/0'/0/{index}`.
///
/// # Errors
///
/// Returns [`ChainiumError::DerivationError`] if `coin` or `index` does
/// not fit below [`HARDENED_OFFSET`], or on an invalid node.
pub fn derive_bip44(master: &ExtendedPrivateKey, coin: u32, index: u32) -> Result<ExtendedPrivateKey> {
    check_address_index(index)?;
    derive_bip44_chain(master, coin)?.derive_child(index)
}

/// Rejects address indices that would turn into hardened children.
pub fn check_address_index(index: u32) -> Result<()> {
    if index >= HARDENED_OFFSET {
        return Err(ChainiumError::DerivationError {
            reason: format!("address index {index} exceeds maximum ({})", HARDENED_OFFSET - 1),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Computes HMAC-SHA512 and returns the 64-byte output.
fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64]> {
    let mut mac = HmacSha512::new_from_slice(key).map_err(|e| ChainiumError::DerivationError {
        reason: format!("HMAC-SHA512 key init failed: {e}"),
    })?;
    mac.update(data);
    let result = mac.finalize().into_bytes();

    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    Ok(output)
}

fn parse_scalar(bytes: &[u8; 32]) -> Result<Scalar> {
    Option::<Scalar>::from(Scalar::from_repr(*FieldBytes::from_slice(bytes))).ok_or_else(|| {
        ChainiumError::DerivationError {
            reason: "key is not below the curve order".into(),
        }
    })
}

/// Splits `IL || IR` into a node, rejecting an invalid `IL`.
fn split_checked(i: &[u8; 64]) -> Result<ExtendedPrivateKey> {
    let scalar = parse_scalar(i[..32].try_into().map_err(|_| invalid_il())?)?;
    if bool::from(scalar.is_zero()) {
        return Err(ChainiumError::DerivationError {
            reason: "master key is zero".into(),
        });
    }
    Ok(node_from_parts(&scalar, i))
}

/// Applies `k_i = IL + k_par mod n` and takes `IR` as the chain code.
fn child_from_hmac(i: &[u8; 64], parent_key: &[u8; 32], index: u32) -> Result<ExtendedPrivateKey> {
    let tweak = parse_scalar(i[..32].try_into().map_err(|_| invalid_il())?).map_err(|_| {
        ChainiumError::DerivationError {
            reason: format!("child {index}: IL is not below the curve order"),
        }
    })?;
    let child = tweak + parse_scalar(parent_key)?;

    if bool::from(child.is_zero()) {
        return Err(ChainiumError::DerivationError {
            reason: format!("child {index}: derived key is zero"),
        });
    }
    Ok(node_from_parts(&child, i))
}

fn node_from_parts(scalar: &Scalar, i: &[u8; 64]) -> ExtendedPrivateKey {
    let mut key = [0u8; 32];
    key.copy_from_slice(&scalar.to_repr());
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    ExtendedPrivateKey { key, chain_code }
}

fn invalid_il() -> ChainiumError {
    ChainiumError::DerivationError {
        reason: "HMAC output is not 64 bytes".into(),
    }
}

/// Parses a derivation path into child numbers.
///
/// Accepts `m` alone or `m/` followed by `/`-separated indices; a `'`,
/// `h` or `H` suffix sets the hardened bit. Returned indices carry the
/// hardened offset already applied.
///
/// # Errors
///
/// Returns [`ChainiumError::DerivationError`] if the path does not start
/// with `m`, has an empty component, or an index that is not a number
/// below [`HARDENED_OFFSET`].
pub fn parse_derivation_path(path: &str) -> Result<Vec<u32>> {
    let trimmed = path.trim();

    if trimmed == "m" {
        return Ok(Vec::new());
    }

    let components = trimmed
        .strip_prefix("m/")
        .ok_or_else(|| ChainiumError::DerivationError {
            reason: format!("derivation path must start with 'm/', got '{trimmed}'"),
        })?;

    let mut indices = Vec::new();

    for part in components.split('/') {
        let part = part.trim();

        if part.is_empty() {
            return Err(ChainiumError::DerivationError {
                reason: "empty component in derivation path".into(),
            });
        }

        let (num_str, hardened) = match part.strip_suffix(|c| matches!(c, '\'' | 'h' | 'H')) {
            Some(num) => (num, true),
            None => (part, false),
        };

        let index: u32 = num_str.parse().map_err(|e| ChainiumError::DerivationError {
            reason: format!("invalid index '{num_str}' in path: {e}"),
        })?;

        if index >= HARDENED_OFFSET {
            return Err(ChainiumError::DerivationError {
                reason: format!("index {index} exceeds maximum ({})", HARDENED_OFFSET - 1),
            });
        }

        indices.push(if hardened { index | HARDENED_OFFSET } else { index });
    }

    Ok(indices)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-32 test vector 1.
    const VECTOR1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn vector1_master() -> std::result::Result<ExtendedPrivateKey, ChainiumError> {
        let seed = hex::decode(VECTOR1_SEED).unwrap_or_default();
        ExtendedPrivateKey::master_from_seed(&seed)
    }

    // --- Path parsing ---

    #[test]
    fn parse_mixed_path() -> std::result::Result<(), ChainiumError> {
        let indices = parse_derivation_path("m/44'/25718'/0'/0/7")?;
        assert_eq!(
            indices,
            vec![
                44 | HARDENED_OFFSET,
                25718 | HARDENED_OFFSET,
                HARDENED_OFFSET,
                0,
                7
            ]
        );
        Ok(())
    }

    #[test]
    fn parse_path_with_h_suffix() -> std::result::Result<(), ChainiumError> {
        let indices = parse_derivation_path("m/44h/0h/1")?;
        assert_eq!(indices, vec![44 | HARDENED_OFFSET, HARDENED_OFFSET, 1]);
        Ok(())
    }

    #[test]
    fn parse_master_only() -> std::result::Result<(), ChainiumError> {
        assert!(parse_derivation_path("m")?.is_empty());
        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_paths() {
        for bad in ["44'/0'", "m/", "m//0", "m/x", "m/2147483648", "m/-1"] {
            assert!(
                matches!(
                    parse_derivation_path(bad),
                    Err(ChainiumError::DerivationError { .. })
                ),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn bip44_path_format() {
        assert_eq!(bip44_path(25718, 3), "m/44'/25718'/0'/0/3");
    }

    // --- BIP-32 vector 1 ---

    #[test]
    fn bip32_master_vector1() -> std::result::Result<(), ChainiumError> {
        let master = vector1_master()?;
        assert_eq!(
            hex::encode(master.key()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        Ok(())
    }

    #[test]
    fn bip32_hardened_child_vector1() -> std::result::Result<(), ChainiumError> {
        let child = vector1_master()?.derive_child(HARDENED_OFFSET)?;
        assert_eq!(
            hex::encode(child.key()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
        Ok(())
    }

    #[test]
    fn bip32_normal_child_vector1() -> std::result::Result<(), ChainiumError> {
        let seed = hex::decode(VECTOR1_SEED).unwrap_or_default();
        let node = derive_path(&seed, "m/0H/1")?;
        assert_eq!(
            hex::encode(node.key()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(node.chain_code()),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
        Ok(())
    }

    // --- Consistency ---

    #[test]
    fn bip44_matches_generic_path() -> std::result::Result<(), ChainiumError> {
        let seed = [0x42u8; 64];
        let master = ExtendedPrivateKey::master_from_seed(&seed)?;
        let fixed = derive_bip44(&master, 25718, 5)?;
        let generic = derive_path(&seed, &bip44_path(25718, 5))?;
        assert_eq!(fixed.key(), generic.key());
        assert_eq!(fixed.chain_code(), generic.chain_code());
        Ok(())
    }

    #[test]
    fn chain_node_children_match_bip44() -> std::result::Result<(), ChainiumError> {
        let master = ExtendedPrivateKey::master_from_seed(&[0x07u8; 64])?;
        let chain = derive_bip44_chain(&master, 25718)?;
        for index in 0..3 {
            assert_eq!(
                chain.derive_child(index)?.key(),
                derive_bip44(&master, 25718, index)?.key()
            );
        }
        Ok(())
    }

    #[test]
    fn hardened_address_index_rejected() -> std::result::Result<(), ChainiumError> {
        let master = ExtendedPrivateKey::master_from_seed(&[0x42u8; 64])?;
        assert!(matches!(
            derive_bip44(&master, 25718, HARDENED_OFFSET),
            Err(ChainiumError::DerivationError { .. })
        ));
        Ok(())
    }

    #[test]
    fn seed_length_enforced() {
        assert!(ExtendedPrivateKey::master_from_seed(&[0u8; 15]).is_err());
        assert!(ExtendedPrivateKey::master_from_seed(&[0u8; 65]).is_err());
    }

    #[test]
    fn derived_node_builds_key_pair() -> std::result::Result<(), ChainiumError> {
        let node = derive_path(&[0x42u8; 64], "m/44'/25718'/0'/0/0")?;
        let key_pair = node.to_key_pair()?;
        assert!(key_pair.address().starts_with("CH"));
        Ok(())
    }
}
