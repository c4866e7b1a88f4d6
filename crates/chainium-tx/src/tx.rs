//! The transaction value and its action builders.
//!
//! A [`Tx`] is built locally and never checked against ledger state.
//! Actions keep their append order; the N-th appended action has action
//! number N, which is what create-asset and create-account hashes are
//! derived from.

use chainium_crypto::hash::derive_hash;
use chainium_types::config::SdkConfig;
use chainium_types::{ChainiumError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::action::*;

/// A ledger transaction.
///
/// Field order is the canonical JSON order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tx {
    sender_address: String,
    nonce: i64,
    expiration_time: i64,
    #[serde(with = "chainium_types::decimal")]
    action_fee: Decimal,
    actions: Vec<TxAction>,
}

impl Tx {
    /// Creates a transaction with no actions.
    ///
    /// An `expiration_time` of `0` means the transaction never expires.
    pub fn new(
        sender_address: impl Into<String>,
        nonce: i64,
        action_fee: Decimal,
        expiration_time: i64,
    ) -> Self {
        Self {
            sender_address: sender_address.into(),
            nonce,
            expiration_time,
            action_fee,
            actions: Vec::new(),
        }
    }

    /// Creates a transaction using the fee and expiration defaults of
    /// `config`.
    pub fn with_config(sender_address: impl Into<String>, nonce: i64, config: &SdkConfig) -> Self {
        Self::new(
            sender_address,
            nonce,
            config.default_action_fee,
            config.default_expiration_time,
        )
    }

    /// Returns the sender's address.
    pub fn sender_address(&self) -> &str {
        &self.sender_address
    }

    /// Returns the sender-assigned nonce.
    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    /// Returns the expiration time, `0` for none.
    pub fn expiration_time(&self) -> i64 {
        self.expiration_time
    }

    /// Returns the fee paid per action.
    pub fn action_fee(&self) -> Decimal {
        self.action_fee
    }

    /// Returns the actions in append order.
    pub fn actions(&self) -> &[TxAction] {
        &self.actions
    }

    /// Appends an already built action.
    ///
    /// Create-asset and create-account actions appended this way return
    /// no hash; use [`Tx::add_create_asset_action`] or
    /// [`Tx::add_create_account_action`] to get one.
    pub fn push_action(&mut self, action: TxAction) {
        tracing::debug!(
            action_type = action.action_type(),
            action_number = self.actions.len() + 1,
            "action appended"
        );
        self.actions.push(action);
    }

    // -----------------------------------------------------------------------
    // Entity-creating actions
    // -----------------------------------------------------------------------

    /// Derives the hash of the entity created by the next action.
    ///
    /// Fails without side effects when the sender address does not
    /// decode or the action number would not fit in 16 bits.
    fn next_entity_hash(&self) -> Result<String> {
        let action_number = u16::try_from(self.actions.len() + 1).map_err(|_| {
            ChainiumError::InvalidTransaction {
                reason: format!(
                    "transaction already holds {} actions, the maximum is {}",
                    self.actions.len(),
                    u16::MAX
                ),
            }
        })?;
        derive_hash(&self.sender_address, self.nonce, action_number).map_err(|e| {
            ChainiumError::InvalidTransaction {
                reason: format!("cannot derive entity hash: {e}"),
            }
        })
    }

    fn push_entity_action(&mut self, action: TxAction) -> Result<String> {
        let hash = self.next_entity_hash()?;
        self.push_action(action);
        Ok(hash)
    }

    /// Appends a `CreateAsset` action and returns the hash the new asset
    /// will have on the ledger.
    ///
    /// # Errors
    ///
    /// [`ChainiumError::InvalidTransaction`] if the hash cannot be
    /// derived. The action list is left unchanged in that case.
    pub fn add_create_asset_action(&mut self) -> Result<String> {
        self.push_entity_action(TxAction::CreateAsset(CreateAssetAction {}))
    }

    /// Appends a `CreateAccount` action and returns the hash the new
    /// account will have on the ledger.
    ///
    /// # Errors
    ///
    /// Same as [`Tx::add_create_asset_action`].
    pub fn add_create_account_action(&mut self) -> Result<String> {
        self.push_entity_action(TxAction::CreateAccount(CreateAccountAction {}))
    }

    // -----------------------------------------------------------------------
    // Network management
    // -----------------------------------------------------------------------

    /// Appends a `TransferChx` action sending `amount` CHX to `recipient_address`.
    pub fn add_transfer_chx_action(&mut self, recipient_address: &str, amount: Decimal) {
        self.push_action(TxAction::TransferChx(TransferChxAction {
            recipient_address: recipient_address.to_string(),
            amount,
        }));
    }

    /// Appends a `DelegateStake` action staking `amount` on a validator.
    pub fn add_delegate_stake_action(&mut self, validator_address: &str, amount: Decimal) {
        self.push_action(TxAction::DelegateStake(DelegateStakeAction {
            validator_address: validator_address.to_string(),
            amount,
        }));
    }

    /// Appends a `ConfigureValidator` action registering the sender as a validator.
    pub fn add_configure_validator_action(
        &mut self,
        network_address: &str,
        shared_reward_percent: Decimal,
        is_enabled: bool,
    ) {
        self.push_action(TxAction::ConfigureValidator(ConfigureValidatorAction {
            network_address: network_address.to_string(),
            shared_reward_percent,
            is_enabled,
        }));
    }

    /// Appends a `RemoveValidator` action.
    pub fn add_remove_validator_action(&mut self) {
        self.push_action(TxAction::RemoveValidator(RemoveValidatorAction {}));
    }

    // -----------------------------------------------------------------------
    // Assets and accounts
    // -----------------------------------------------------------------------

    /// Appends a `TransferAsset` action moving `amount` between two accounts.
    pub fn add_transfer_asset_action(
        &mut self,
        from_account_hash: &str,
        to_account_hash: &str,
        asset_hash: &str,
        amount: Decimal,
    ) {
        self.push_action(TxAction::TransferAsset(TransferAssetAction {
            from_account_hash: from_account_hash.to_string(),
            to_account_hash: to_account_hash.to_string(),
            asset_hash: asset_hash.to_string(),
            amount,
        }));
    }

    /// Appends a `CreateAssetEmission` action issuing `amount` into an account.
    pub fn add_create_asset_emission_action(
        &mut self,
        emission_account_hash: &str,
        asset_hash: &str,
        amount: Decimal,
    ) {
        self.push_action(TxAction::CreateAssetEmission(CreateAssetEmissionAction {
            emission_account_hash: emission_account_hash.to_string(),
            asset_hash: asset_hash.to_string(),
            amount,
        }));
    }

    /// Appends a `SetAssetCode` action.
    pub fn add_set_asset_code_action(&mut self, asset_hash: &str, asset_code: &str) {
        self.push_action(TxAction::SetAssetCode(SetAssetCodeAction {
            asset_hash: asset_hash.to_string(),
            asset_code: asset_code.to_string(),
        }));
    }

    /// Appends a `SetAssetController` action handing an asset to a new controller.
    pub fn add_set_asset_controller_action(&mut self, asset_hash: &str, controller_address: &str) {
        self.push_action(TxAction::SetAssetController(SetAssetControllerAction {
            asset_hash: asset_hash.to_string(),
            controller_address: controller_address.to_string(),
        }));
    }

    /// Appends a `SetAccountController` action handing an account to a new controller.
    pub fn add_set_account_controller_action(
        &mut self,
        account_hash: &str,
        controller_address: &str,
    ) {
        self.push_action(TxAction::SetAccountController(SetAccountControllerAction {
            account_hash: account_hash.to_string(),
            controller_address: controller_address.to_string(),
        }));
    }

    // -----------------------------------------------------------------------
    // Voting
    // -----------------------------------------------------------------------

    /// Appends a `SubmitVote` action casting `vote_hash` on a resolution.
    pub fn add_submit_vote_action(
        &mut self,
        account_hash: &str,
        asset_hash: &str,
        resolution_hash: &str,
        vote_hash: &str,
    ) {
        self.push_action(TxAction::SubmitVote(SubmitVoteAction {
            account_hash: account_hash.to_string(),
            asset_hash: asset_hash.to_string(),
            resolution_hash: resolution_hash.to_string(),
            vote_hash: vote_hash.to_string(),
        }));
    }

    /// Appends a `SubmitVoteWeight` action setting the weight of a cast vote.
    pub fn add_submit_vote_weight_action(
        &mut self,
        account_hash: &str,
        asset_hash: &str,
        resolution_hash: &str,
        vote_weight: Decimal,
    ) {
        self.push_action(TxAction::SubmitVoteWeight(SubmitVoteWeightAction {
            account_hash: account_hash.to_string(),
            asset_hash: asset_hash.to_string(),
            resolution_hash: resolution_hash.to_string(),
            vote_weight,
        }));
    }

    // -----------------------------------------------------------------------
    // Eligibility and KYC
    // -----------------------------------------------------------------------

    /// Appends a `SetAccountEligibility` action.
    pub fn add_set_account_eligibility_action(
        &mut self,
        account_hash: &str,
        asset_hash: &str,
        is_primary_eligible: bool,
        is_secondary_eligible: bool,
    ) {
        self.push_action(TxAction::SetAccountEligibility(SetAccountEligibilityAction {
            account_hash: account_hash.to_string(),
            asset_hash: asset_hash.to_string(),
            is_primary_eligible,
            is_secondary_eligible,
        }));
    }

    /// Appends a `SetAssetEligibility` action.
    pub fn add_set_asset_eligibility_action(&mut self, asset_hash: &str, is_eligibility_required: bool) {
        self.push_action(TxAction::SetAssetEligibility(SetAssetEligibilityAction {
            asset_hash: asset_hash.to_string(),
            is_eligibility_required,
        }));
    }

    /// Appends a `ChangeKycControllerAddress` action.
    pub fn add_change_kyc_controller_address_action(
        &mut self,
        account_hash: &str,
        asset_hash: &str,
        kyc_controller_address: &str,
    ) {
        self.push_action(TxAction::ChangeKycControllerAddress(
            ChangeKycControllerAddressAction {
                account_hash: account_hash.to_string(),
                asset_hash: asset_hash.to_string(),
                kyc_controller_address: kyc_controller_address.to_string(),
            },
        ));
    }

    /// Appends an `AddKycProvider` action authorizing a KYC provider for an asset.
    pub fn add_add_kyc_provider_action(&mut self, asset_hash: &str, provider_address: &str) {
        self.push_action(TxAction::AddKycProvider(AddKycProviderAction {
            asset_hash: asset_hash.to_string(),
            provider_address: provider_address.to_string(),
        }));
    }

    /// Appends a `RemoveKycProvider` action revoking a KYC provider.
    pub fn add_remove_kyc_provider_action(&mut self, asset_hash: &str, provider_address: &str) {
        self.push_action(TxAction::RemoveKycProvider(RemoveKycProviderAction {
            asset_hash: asset_hash.to_string(),
            provider_address: provider_address.to_string(),
        }));
    }
}
