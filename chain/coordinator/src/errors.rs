//! Coordinator-specific error types
//!
//! Taxonomy split by origin: configuration errors (caller-fixable setup),
//! precondition errors (surfaced verbatim, never retried), state errors
//! (caller logic errors), and propagated ledger errors. Every error aborts
//! the triggering operation with zero side effects.

use thiserror::Error;

/// Errors raised by the external asset ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: String,
        available: String,
    },

    #[error("Spender not authorized by {owner} for {asset}")]
    NotAuthorized { asset: String, owner: String },

    #[error("Invalid amount: {amount} (must be positive)")]
    InvalidAmount { amount: String },

    #[error("Unknown asset: {asset}")]
    UnknownAsset { asset: String },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Errors raised by coordinator operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    // --- Configuration errors ---
    #[error("Asset not registered: no approval criteria configured for {asset}")]
    AssetNotRegistered { asset: String },

    #[error("Not authorized to configure: {caller} does not hold the asset agent role")]
    NotAuthorizedToConfigure { caller: String },

    #[error("Coordinator is not an eligible participant for asset {asset}")]
    CoordinatorNotEligibleForAsset { asset: String },

    // --- Precondition errors ---
    #[error("Invalid transfer amount: {amount} (must be positive)")]
    InvalidAmount { amount: String },

    #[error("Recipient not verified for the asset: {recipient}")]
    RecipientNotVerified { recipient: String },

    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: String,
        required: String,
        available: String,
    },

    // --- State errors ---
    #[error("Invalid transfer identifier: {id}")]
    InvalidTransferId { id: String },

    #[error("Transfer is not in pending status: {id}")]
    TransferNotPending { id: String },

    #[error("Approver not found: {caller} does not match any unapproved slot")]
    ApproverNotFound { caller: String },

    #[error("Approvals must be sequential: {caller} is not the next approver")]
    ApprovalsOutOfOrder { caller: String },

    #[error("Only the transfer sender can call: {caller}")]
    NotSender { caller: String },

    // --- Propagated collaborator errors ---
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
