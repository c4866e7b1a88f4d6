//! SDK configuration with sensible defaults.
//!
//! Only the operational knobs live here. The cryptographic scheme
//! (curve, hashes, address prefix, derivation path) is fixed by the
//! ledger protocol and is not configurable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ChainiumError, Result, MAINNET_NETWORK_CODE};

/// Global SDK configuration.
///
/// Can be built in code or parsed from a JSON document with
/// [`SdkConfig::from_json_str`]. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Network code bound into every transaction signature.
    ///
    /// A signature made for one network never verifies on another.
    pub network_code: String,

    /// Action fee used by transactions built from this configuration.
    #[serde(with = "crate::decimal")]
    pub default_action_fee: Decimal,

    /// Expiration time used by transactions built from this
    /// configuration. `0` means the transaction never expires.
    pub default_expiration_time: i64,

    /// Largest wallet count accepted by batch wallet restoration.
    pub max_restore_count: u32,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            network_code: MAINNET_NETWORK_CODE.to_string(),
            default_action_fee: Decimal::new(1, 2), // 0.01
            default_expiration_time: 0,
            max_restore_count: 1000,
        }
    }
}

impl SdkConfig {
    /// Parses a JSON configuration document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ChainiumError::ConfigError {
                reason: format!("failed to parse config: {e}"),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the network code as the bytes fed into message signing.
    pub fn network_code_bytes(&self) -> &[u8] {
        self.network_code.as_bytes()
    }

    /// Validates all configuration values.
    ///
    /// Returns an error if any value is outside its acceptable range.
    pub fn validate(&self) -> Result<()> {
        if self.network_code.trim().is_empty() {
            return Err(ChainiumError::ConfigError {
                reason: "network_code must not be empty".into(),
            });
        }

        if self.default_action_fee < Decimal::ZERO {
            return Err(ChainiumError::ConfigError {
                reason: "default_action_fee must not be negative".into(),
            });
        }

        if self.default_expiration_time < 0 {
            return Err(ChainiumError::ConfigError {
                reason: "default_expiration_time must not be negative".into(),
            });
        }

        if self.max_restore_count == 0 {
            return Err(ChainiumError::ConfigError {
                reason: "max_restore_count must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SdkConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_values() {
        let config = SdkConfig::default();
        assert_eq!(config.network_code, "OWN_PUBLIC_BLOCKCHAIN_MAINNET");
        assert_eq!(config.default_action_fee, Decimal::new(1, 2));
        assert_eq!(config.default_expiration_time, 0);
        assert_eq!(config.max_restore_count, 1000);
    }

    #[test]
    fn empty_network_code_rejected() {
        let config = SdkConfig {
            network_code: "  ".into(),
            ..SdkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_fee_rejected() {
        let config = SdkConfig {
            default_action_fee: Decimal::new(-1, 2),
            ..SdkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_fee_is_valid() {
        let config = SdkConfig {
            default_action_fee: Decimal::ZERO,
            ..SdkConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_expiration_rejected() {
        let config = SdkConfig {
            default_expiration_time: -1,
            ..SdkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_restore_count_rejected() {
        let config = SdkConfig {
            max_restore_count: 0,
            ..SdkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_takes_defaults() -> std::result::Result<(), ChainiumError> {
        let config = SdkConfig::from_json_str(
            r#"{"network_code":"UNIT_TESTS","default_action_fee":0.5}"#,
        )?;
        assert_eq!(config.network_code, "UNIT_TESTS");
        assert_eq!(config.default_action_fee, Decimal::new(5, 1));
        assert_eq!(config.max_restore_count, 1000);
        Ok(())
    }

    #[test]
    fn invalid_json_values_rejected() {
        assert!(SdkConfig::from_json_str(r#"{"max_restore_count":0}"#).is_err());
        assert!(SdkConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn config_serde_roundtrip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let config = SdkConfig::default();
        let json = serde_json::to_string(&config)?;
        let parsed = SdkConfig::from_json_str(&json)?;
        assert_eq!(config, parsed);
        Ok(())
    }
}
