//! Transaction signing envelope.
//!
//! Signing serializes the transaction to canonical JSON, signs those
//! bytes with the network-bound message digest and wraps both as
//! `{ "tx": Base64(json), "signature": Base58(sig) }`.

use chainium_crypto::encoding::{decode64, encode64};
use chainium_crypto::signing::{sign_message, verify_message};
use chainium_types::config::SdkConfig;
use chainium_types::{ChainiumError, Result};
use serde::{Deserialize, Serialize};

use crate::canonical::to_json;
use crate::tx::Tx;

/// A signed transaction as handed to the submission layer.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignedTx {
    /// Base64 of the canonical transaction JSON.
    pub tx: String,
    /// Base58 recoverable signature over the canonical JSON.
    pub signature: String,
}

impl Tx {
    /// Signs the transaction for the network identified by `network_code`.
    ///
    /// # Errors
    ///
    /// [`ChainiumError::InvalidKey`] for a malformed private key and
    /// [`ChainiumError::SerializationError`] if the transaction cannot
    /// be encoded.
    pub fn sign(&self, network_code: &[u8], private_key: &str) -> Result<SignedTx> {
        let json = self.to_canonical_json()?;
        let signature = sign_message(network_code, private_key, json.as_bytes())?;
        tracing::debug!(
            sender = %self.sender_address(),
            nonce = self.nonce(),
            actions = self.actions().len(),
            "transaction signed"
        );
        Ok(SignedTx {
            tx: encode64(json.as_bytes()),
            signature,
        })
    }

    /// Signs the transaction for the network configured in `config`.
    pub fn sign_with_config(&self, config: &SdkConfig, private_key: &str) -> Result<SignedTx> {
        self.sign(config.network_code_bytes(), private_key)
    }
}

impl SignedTx {
    /// Returns the envelope as JSON, compact or indented.
    pub fn to_json(&self, indent: bool) -> Result<String> {
        to_json(self, indent)
    }

    /// Returns the canonical JSON bytes carried in the envelope.
    fn tx_bytes(&self) -> Result<Vec<u8>> {
        decode64(&self.tx)
    }

    /// Decodes the transaction carried in the envelope.
    pub fn decode_tx(&self) -> Result<Tx> {
        let bytes = self.tx_bytes()?;
        let json = std::str::from_utf8(&bytes).map_err(|e| ChainiumError::SerializationError {
            reason: format!("transaction payload is not UTF-8: {e}"),
        })?;
        Tx::from_json(json)
    }

    /// Recovers the address that signed the envelope for `network_code`.
    ///
    /// The caller compares the result with the transaction's sender.
    /// Recovery under another network code yields a different address
    /// or an error, never the signer.
    pub fn recover_signer(&self, network_code: &[u8]) -> Result<String> {
        let bytes = self.tx_bytes()?;
        verify_message(network_code, &self.signature, &bytes).map_err(|e| {
            tracing::warn!(error = %e, "signer recovery failed");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use chainium_crypto::signing::KeyPair;
    use rust_decimal::Decimal;

    use super::*;

    const NETWORK: &[u8] = b"UNIT_TESTS";

    #[test]
    fn envelope_carries_canonical_json() -> std::result::Result<(), ChainiumError> {
        let key = KeyPair::generate();
        let mut tx = Tx::new(key.address(), 3, Decimal::new(1, 2), 0);
        tx.add_delegate_stake_action("CHvalidator", Decimal::new(5000, 0));

        let signed = tx.sign(NETWORK, &key.private_key())?;
        assert_eq!(decode64(&signed.tx)?, tx.to_canonical_json()?.into_bytes());
        assert_eq!(signed.decode_tx()?, tx);
        assert_eq!(signed.recover_signer(NETWORK)?, key.address());
        Ok(())
    }

    #[test]
    fn signing_is_deterministic() -> std::result::Result<(), ChainiumError> {
        let key = KeyPair::generate();
        let tx = Tx::new(key.address(), 1, Decimal::ONE, 0);
        assert_eq!(
            tx.sign(NETWORK, &key.private_key())?,
            tx.sign(NETWORK, &key.private_key())?
        );
        Ok(())
    }

    #[test]
    fn envelope_json_shape() -> std::result::Result<(), ChainiumError> {
        let signed = SignedTx {
            tx: "dHg=".into(),
            signature: "sig".into(),
        };
        assert_eq!(signed.to_json(false)?, r#"{"tx":"dHg=","signature":"sig"}"#);
        assert_eq!(
            signed.to_json(true)?,
            "{\n    \"tx\": \"dHg=\",\n    \"signature\": \"sig\"\n}"
        );
        Ok(())
    }

    #[test]
    fn malformed_envelope_rejected() {
        let signed = SignedTx {
            tx: "not base64!".into(),
            signature: "sig".into(),
        };
        assert!(matches!(signed.decode_tx(), Err(ChainiumError::DecodeError { .. })));
        assert!(signed.recover_signer(NETWORK).is_err());
    }

    #[test]
    fn bad_private_key_rejected() {
        let tx = Tx::new("CHsender", 1, Decimal::ONE, 0);
        assert!(matches!(
            tx.sign(NETWORK, "0OIl"),
            Err(ChainiumError::InvalidKey { .. })
        ));
    }
}
