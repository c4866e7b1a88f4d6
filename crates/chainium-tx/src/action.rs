//! Transaction action payloads.
//!
//! Every action serializes as
//!
//! ```json
//! {"actionType": "<Variant>", "actionData": { ... }}
//! ```
//!
//! with `actionData` fields in declaration order. Payloads without
//! fields serialize as `{}`. Quantities are exact decimals written as
//! bare JSON numbers.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

// ---------------------------------------------------------------------------
// Network management
// ---------------------------------------------------------------------------

/// Transfers CHX to another address.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferChxAction {
    pub recipient_address: String,
    #[serde(with = "chainium_types::decimal")]
    pub amount: Decimal,
}

/// Delegates stake to a validator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateStakeAction {
    pub validator_address: String,
    #[serde(with = "chainium_types::decimal")]
    pub amount: Decimal,
}

/// Registers or updates the sender as a validator.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureValidatorAction {
    pub network_address: String,
    #[serde(with = "chainium_types::decimal")]
    pub shared_reward_percent: Decimal,
    pub is_enabled: bool,
}

/// Removes the sender from the validator set.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RemoveValidatorAction {}

// ---------------------------------------------------------------------------
// Asset management
// ---------------------------------------------------------------------------

/// Moves an asset amount between two accounts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferAssetAction {
    pub from_account_hash: String,
    pub to_account_hash: String,
    pub asset_hash: String,
    #[serde(with = "chainium_types::decimal")]
    pub amount: Decimal,
}

/// Emits new units of an asset into an account.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssetEmissionAction {
    pub emission_account_hash: String,
    pub asset_hash: String,
    #[serde(with = "chainium_types::decimal")]
    pub amount: Decimal,
}

/// Creates a new asset controlled by the sender.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateAssetAction {}

/// Assigns a human-readable code to an asset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssetCodeAction {
    pub asset_hash: String,
    pub asset_code: String,
}

/// Hands control of an asset to another address.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssetControllerAction {
    pub asset_hash: String,
    pub controller_address: String,
}

// ---------------------------------------------------------------------------
// Account management
// ---------------------------------------------------------------------------

/// Creates a new account controlled by the sender.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountAction {}

/// Hands control of an account to another address.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAccountControllerAction {
    pub account_hash: String,
    pub controller_address: String,
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

/// Casts a vote on a resolution for an asset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteAction {
    pub account_hash: String,
    pub asset_hash: String,
    pub resolution_hash: String,
    pub vote_hash: String,
}

/// Sets the weight of a vote already cast.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteWeightAction {
    pub account_hash: String,
    pub asset_hash: String,
    pub resolution_hash: String,
    #[serde(with = "chainium_types::decimal")]
    pub vote_weight: Decimal,
}

// ---------------------------------------------------------------------------
// Eligibility and KYC
// ---------------------------------------------------------------------------

/// Sets whether an account may hold an asset on the primary and secondary markets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAccountEligibilityAction {
    pub account_hash: String,
    pub asset_hash: String,
    pub is_primary_eligible: bool,
    pub is_secondary_eligible: bool,
}

/// Sets whether holding an asset requires eligibility.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAssetEligibilityAction {
    pub asset_hash: String,
    pub is_eligibility_required: bool,
}

/// Changes the KYC controller of an account for an asset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeKycControllerAddressAction {
    pub account_hash: String,
    pub asset_hash: String,
    pub kyc_controller_address: String,
}

/// Authorizes a KYC provider for an asset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddKycProviderAction {
    pub asset_hash: String,
    pub provider_address: String,
}

/// Revokes a KYC provider of an asset.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveKycProviderAction {
    pub asset_hash: String,
    pub provider_address: String,
}

// ---------------------------------------------------------------------------
// TxAction
// ---------------------------------------------------------------------------

/// One transaction action: a type tag plus its payload.
///
/// Variant names are the `actionType` strings on the wire. Decoding
/// accepts `actionType` and `actionData` in either order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "actionType", content = "actionData")]
pub enum TxAction {
    TransferChx(TransferChxAction),
    DelegateStake(DelegateStakeAction),
    ConfigureValidator(ConfigureValidatorAction),
    RemoveValidator(RemoveValidatorAction),
    TransferAsset(TransferAssetAction),
    CreateAssetEmission(CreateAssetEmissionAction),
    CreateAsset(CreateAssetAction),
    SetAssetCode(SetAssetCodeAction),
    SetAssetController(SetAssetControllerAction),
    CreateAccount(CreateAccountAction),
    SetAccountController(SetAccountControllerAction),
    SubmitVote(SubmitVoteAction),
    SubmitVoteWeight(SubmitVoteWeightAction),
    SetAccountEligibility(SetAccountEligibilityAction),
    SetAssetEligibility(SetAssetEligibilityAction),
    ChangeKycControllerAddress(ChangeKycControllerAddressAction),
    AddKycProvider(AddKycProviderAction),
    RemoveKycProvider(RemoveKycProviderAction),
}

impl TxAction {
    /// Returns the `actionType` tag of this action.
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::TransferChx(_) => "TransferChx",
            Self::DelegateStake(_) => "DelegateStake",
            Self::ConfigureValidator(_) => "ConfigureValidator",
            Self::RemoveValidator(_) => "RemoveValidator",
            Self::TransferAsset(_) => "TransferAsset",
            Self::CreateAssetEmission(_) => "CreateAssetEmission",
            Self::CreateAsset(_) => "CreateAsset",
            Self::SetAssetCode(_) => "SetAssetCode",
            Self::SetAssetController(_) => "SetAssetController",
            Self::CreateAccount(_) => "CreateAccount",
            Self::SetAccountController(_) => "SetAccountController",
            Self::SubmitVote(_) => "SubmitVote",
            Self::SubmitVoteWeight(_) => "SubmitVoteWeight",
            Self::SetAccountEligibility(_) => "SetAccountEligibility",
            Self::SetAssetEligibility(_) => "SetAssetEligibility",
            Self::ChangeKycControllerAddress(_) => "ChangeKycControllerAddress",
            Self::AddKycProvider(_) => "AddKycProvider",
            Self::RemoveKycProvider(_) => "RemoveKycProvider",
        }
    }

    /// Returns `true` for actions that create an addressable entity
    /// whose hash is derived from the action's position.
    pub fn creates_entity(&self) -> bool {
        matches!(self, Self::CreateAsset(_) | Self::CreateAccount(_))
    }
}

/// An action as read off the wire, payload still undecoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    action_type: String,
    action_data: Box<RawValue>,
}

impl RawAction {
    fn decode(self) -> Result<TxAction, serde_json::Error> {
        let data = self.action_data.get();
        let action = match self.action_type.as_str() {
            "TransferChx" => TxAction::TransferChx(serde_json::from_str(data)?),
            "DelegateStake" => TxAction::DelegateStake(serde_json::from_str(data)?),
            "ConfigureValidator" => TxAction::ConfigureValidator(serde_json::from_str(data)?),
            "RemoveValidator" => TxAction::RemoveValidator(serde_json::from_str(data)?),
            "TransferAsset" => TxAction::TransferAsset(serde_json::from_str(data)?),
            "CreateAssetEmission" => TxAction::CreateAssetEmission(serde_json::from_str(data)?),
            "CreateAsset" => TxAction::CreateAsset(serde_json::from_str(data)?),
            "SetAssetCode" => TxAction::SetAssetCode(serde_json::from_str(data)?),
            "SetAssetController" => TxAction::SetAssetController(serde_json::from_str(data)?),
            "CreateAccount" => TxAction::CreateAccount(serde_json::from_str(data)?),
            "SetAccountController" => TxAction::SetAccountController(serde_json::from_str(data)?),
            "SubmitVote" => TxAction::SubmitVote(serde_json::from_str(data)?),
            "SubmitVoteWeight" => TxAction::SubmitVoteWeight(serde_json::from_str(data)?),
            "SetAccountEligibility" => {
                TxAction::SetAccountEligibility(serde_json::from_str(data)?)
            }
            "SetAssetEligibility" => TxAction::SetAssetEligibility(serde_json::from_str(data)?),
            "ChangeKycControllerAddress" => {
                TxAction::ChangeKycControllerAddress(serde_json::from_str(data)?)
            }
            "AddKycProvider" => TxAction::AddKycProvider(serde_json::from_str(data)?),
            "RemoveKycProvider" => TxAction::RemoveKycProvider(serde_json::from_str(data)?),
            other => {
                return Err(serde_json::Error::custom(format!(
                    "unknown actionType `{other}`"
                )))
            }
        };
        Ok(action)
    }
}

impl<'de> Deserialize<'de> for TxAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAction::deserialize(deserializer)?;
        let action_type = raw.action_type.clone();
        raw.decode()
            .map_err(|e| D::Error::custom(format!("invalid {action_type} actionData: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_matches_serialized_tag() -> std::result::Result<(), serde_json::Error> {
        let actions = [
            TxAction::RemoveValidator(RemoveValidatorAction {}),
            TxAction::CreateAsset(CreateAssetAction {}),
            TxAction::SetAssetCode(SetAssetCodeAction {
                asset_hash: "AssetH1".into(),
                asset_code: "AST1".into(),
            }),
        ];
        for action in actions {
            let value = serde_json::to_value(&action)?;
            assert_eq!(value["actionType"], action.action_type());
        }
        Ok(())
    }

    #[test]
    fn empty_payload_is_empty_object() -> std::result::Result<(), serde_json::Error> {
        let json = serde_json::to_string(&TxAction::CreateAccount(CreateAccountAction {}))?;
        assert_eq!(json, r#"{"actionType":"CreateAccount","actionData":{}}"#);
        Ok(())
    }

    #[test]
    fn payload_fields_keep_order() -> std::result::Result<(), serde_json::Error> {
        let action = TxAction::SetAccountEligibility(SetAccountEligibilityAction {
            account_hash: "AccH1".into(),
            asset_hash: "AssetH1".into(),
            is_primary_eligible: true,
            is_secondary_eligible: false,
        });
        assert_eq!(
            serde_json::to_string(&action)?,
            r#"{"actionType":"SetAccountEligibility","actionData":{"accountHash":"AccH1","assetHash":"AssetH1","isPrimaryEligible":true,"isSecondaryEligible":false}}"#
        );
        Ok(())
    }

    #[test]
    fn decimal_payload_roundtrips_exactly() -> std::result::Result<(), serde_json::Error> {
        let action = TxAction::SubmitVoteWeight(SubmitVoteWeightAction {
            account_hash: "AccH1".into(),
            asset_hash: "AssetH1".into(),
            resolution_hash: "RsH1".into(),
            vote_weight: Decimal::new(12345, 3),
        });
        let json = serde_json::to_string(&action)?;
        assert!(json.ends_with(r#""voteWeight":12.345}}"#));
        let parsed: TxAction = serde_json::from_str(&json)?;
        assert_eq!(parsed, action);
        Ok(())
    }

    #[test]
    fn only_create_actions_create_entities() {
        assert!(TxAction::CreateAsset(CreateAssetAction {}).creates_entity());
        assert!(TxAction::CreateAccount(CreateAccountAction {}).creates_entity());
        assert!(!TxAction::RemoveValidator(RemoveValidatorAction {}).creates_entity());
    }

    #[test]
    fn decodes_payload_before_tag() -> std::result::Result<(), serde_json::Error> {
        let json = r#"{"actionData":{"recipientAddress":"CHrecipient","amount":5},"actionType":"TransferChx"}"#;
        let action: TxAction = serde_json::from_str(json)?;
        assert_eq!(
            action,
            TxAction::TransferChx(TransferChxAction {
                recipient_address: "CHrecipient".into(),
                amount: Decimal::new(5, 0),
            })
        );
        Ok(())
    }

    #[test]
    fn unknown_action_type_rejected() {
        let result: std::result::Result<TxAction, _> =
            serde_json::from_str(r#"{"actionType":"MintChx","actionData":{}}"#);
        let err = result.map(|_| ()).unwrap_err().to_string();
        assert!(err.contains("unknown actionType `MintChx`"));
    }

    #[test]
    fn mismatched_payload_names_action_type() {
        let result: std::result::Result<TxAction, _> =
            serde_json::from_str(r#"{"actionType":"SetAssetCode","actionData":{"assetHash":"AssetH1"}}"#);
        let err = result.map(|_| ()).unwrap_err().to_string();
        assert!(err.contains("invalid SetAssetCode actionData"));
    }
}
