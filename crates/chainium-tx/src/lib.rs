//! Transactions for the Chainium ledger.
//!
//! A [`Tx`] carries a sender, a nonce, an expiration time, a per-action
//! fee and an ordered list of [`TxAction`]s. Its canonical JSON text is
//! what gets signed; [`SignedTx`] is the envelope handed to the
//! submission layer.
//!
//! # Modules
//!
//! - [`action`]: the closed set of action payloads
//! - [`tx`]: the transaction and its action builders
//! - [`canonical`]: canonical and human-readable JSON
//! - [`signing`]: signing envelope, decoding and signer recovery

pub mod action;
pub mod canonical;
pub mod signing;
pub mod tx;

pub use action::TxAction;
pub use signing::SignedTx;
pub use tx::Tx;
