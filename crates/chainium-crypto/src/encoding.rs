//! Base58 and Base64 text codecs.
//!
//! Base58 uses the Bitcoin alphabet and carries keys, signatures,
//! addresses and hashes. Base64 (standard alphabet, padded) carries the
//! transaction payload inside a signed envelope.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chainium_types::{ChainiumError, Result};

/// Encodes bytes as Base58 text.
pub fn encode58(data: &[u8]) -> String {
    bs58::encode(data).into_string()
}

/// Decodes Base58 text.
///
/// Leading `1` characters decode to leading zero bytes, so every
/// encoded buffer decodes back to its original length.
///
/// # Errors
///
/// Returns [`ChainiumError::DecodeError`] on characters outside the
/// Base58 alphabet.
pub fn decode58(text: &str) -> Result<Vec<u8>> {
    bs58::decode(text)
        .into_vec()
        .map_err(|e| ChainiumError::DecodeError {
            reason: format!("invalid base58: {e}"),
        })
}

/// Encodes bytes as standard padded Base64 text.
pub fn encode64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes standard padded Base64 text.
///
/// # Errors
///
/// Returns [`ChainiumError::DecodeError`] on invalid characters or
/// padding.
pub fn decode64(text: &str) -> Result<Vec<u8>> {
    STANDARD.decode(text).map_err(|e| ChainiumError::DecodeError {
        reason: format!("invalid base64: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode58_known_vector() {
        assert_eq!(encode58(b"Chainium"), "CGwVR5Wyya4");
    }

    #[test]
    fn decode58_known_vector() -> std::result::Result<(), ChainiumError> {
        assert_eq!(decode58("CGwVR5Wyya4")?, b"Chainium");
        Ok(())
    }

    #[test]
    fn encode64_known_vector() {
        assert_eq!(encode64(b"Chainium"), "Q2hhaW5pdW0=");
    }

    #[test]
    fn decode64_known_vector() -> std::result::Result<(), ChainiumError> {
        assert_eq!(decode64("Q2hhaW5pdW0=")?, b"Chainium");
        Ok(())
    }

    #[test]
    fn decode58_rejects_invalid_alphabet() {
        // '0', 'O', 'I' and 'l' are not in the Base58 alphabet.
        for bad in ["0abc", "CGwVR5Wyya4O", "Il", "abc def"] {
            assert!(matches!(
                decode58(bad),
                Err(ChainiumError::DecodeError { .. })
            ));
        }
    }

    #[test]
    fn decode64_rejects_invalid_input() {
        assert!(decode64("Q2hhaW5pdW0").is_err());
        assert!(decode64("!!!!").is_err());
    }

    #[test]
    fn leading_zero_bytes_survive() -> std::result::Result<(), ChainiumError> {
        let data = [0u8, 0, 0, 1, 2, 3];
        let encoded = encode58(&data);
        assert!(encoded.starts_with("111"));
        assert_eq!(decode58(&encoded)?, data);
        Ok(())
    }

    #[test]
    fn empty_input_roundtrips() -> std::result::Result<(), ChainiumError> {
        assert_eq!(encode58(&[]), "");
        assert!(decode58("")?.is_empty());
        Ok(())
    }

    proptest! {
        #[test]
        fn base58_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..400)) {
            let decoded = decode58(&encode58(&data));
            prop_assert!(decoded.is_ok());
            prop_assert_eq!(decoded.unwrap_or_default(), data);
        }
    }
}
