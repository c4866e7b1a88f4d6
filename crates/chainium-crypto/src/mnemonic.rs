//! BIP39 mnemonic generation, validation, and seed derivation.
//!
//! Word-list handling and checksum validation use the `bip39` crate
//! (English list). Generated mnemonics carry 256 bits of entropy
//! (24 words); parsing accepts every standard length.
//!
//! Seed derivation: PBKDF2-HMAC-SHA512, 2048 rounds,
//! salt = `"mnemonic" || passphrase`, 64-byte output. The password is the
//! normalized phrase (words joined by single spaces).
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use bip39::Language;
use chainium_types::{ChainiumError, Result};
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Entropy size of generated mnemonics, in bytes.
pub const ENTROPY_LEN: usize = 32;

/// PBKDF2 iteration count fixed by BIP39.
const PBKDF2_ROUNDS: u32 = 2048;

// ---------------------------------------------------------------------------
// Mnemonic
// ---------------------------------------------------------------------------

/// A validated BIP39 mnemonic phrase.
///
/// The inner string is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// Parses and validates a phrase.
    ///
    /// Surrounding and repeated whitespace is normalized away.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::InvalidMnemonic`] on an unknown word, a
    /// non-standard word count or a checksum mismatch.
    pub fn parse(phrase: &str) -> Result<Self> {
        let parsed = bip39::Mnemonic::parse_in_normalized(Language::English, phrase)
            .map_err(|e| ChainiumError::InvalidMnemonic {
                reason: e.to_string(),
            })?;
        Ok(Self(parsed.to_string()))
    }

    /// Returns the normalized phrase.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the individual words.
    pub fn words(&self) -> Vec<&str> {
        self.0.split(' ').collect()
    }

    /// Returns the number of words.
    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// A 64-byte seed derived from a mnemonic. Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Fixed byte length of a BIP39 seed.
    pub const LEN: usize = 64;

    /// Creates a [`Seed`] from a raw 64-byte array.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Creates a [`Seed`] from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`ChainiumError::DerivationError`] unless `bytes` is
    /// exactly 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::LEN {
            return Err(ChainiumError::DerivationError {
                reason: format!("expected {} seed bytes, got {}", Self::LEN, bytes.len()),
            });
        }
        let mut out = [0u8; 64];
        out.copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Returns the raw 64-byte seed.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// Seed does not implement Clone/Debug to prevent leakage.

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generates a new random 24-word mnemonic from OS entropy.
pub fn generate_mnemonic() -> Result<Mnemonic> {
    let mut entropy = [0u8; ENTROPY_LEN];
    OsRng.fill_bytes(&mut entropy);

    let result = entropy_to_mnemonic(&entropy);

    entropy.zeroize();
    result
}

/// Converts raw entropy into its mnemonic.
///
/// Deterministic core of [`generate_mnemonic`]; accepts the standard
/// entropy sizes (16 to 32 bytes, multiples of 4).
///
/// # Errors
///
/// Returns [`ChainiumError::InvalidMnemonic`] for a non-standard entropy
/// size.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    let mnemonic = bip39::Mnemonic::from_entropy_in(Language::English, entropy).map_err(|e| {
        ChainiumError::InvalidMnemonic {
            reason: e.to_string(),
        }
    })?;
    Ok(Mnemonic(mnemonic.to_string()))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validates a mnemonic phrase: word list, word count, checksum.
///
/// # Errors
///
/// Returns [`ChainiumError::InvalidMnemonic`] if any check fails.
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    Mnemonic::parse(phrase).map(|_| ())
}

/// Returns `true` if [`validate_mnemonic`] accepts `phrase`.
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    validate_mnemonic(phrase).is_ok()
}

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derives the 64-byte seed of a mnemonic and passphrase.
///
/// The mnemonic is validated first; use `""` for no passphrase.
///
/// # Errors
///
/// Returns [`ChainiumError::InvalidMnemonic`] if the phrase fails
/// validation. This error is distinct from every derivation failure
/// and reports [`ChainiumError::is_fatal`].
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic = Mnemonic::parse(phrase)?;

    let mut salt = Vec::with_capacity(8 + passphrase.len());
    salt.extend_from_slice(b"mnemonic");
    salt.extend_from_slice(passphrase.as_bytes());

    let mut output = [0u8; 64];
    pbkdf2::pbkdf2::<Hmac<Sha512>>(mnemonic.as_str().as_bytes(), &salt, PBKDF2_ROUNDS, &mut output)
        .map_err(|e| ChainiumError::DerivationError {
            reason: format!("PBKDF2-HMAC-SHA512 failed: {e}"),
        })?;

    salt.zeroize();

    Ok(Seed(output))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
