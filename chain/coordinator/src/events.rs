//! Coordinator events
//!
//! Immutable notifications appended by state-changing operations, one or
//! more per successful operation and none on failure. Initiation emits two
//! distinct events: `TransferInitiated` carries the core transfer facts,
//! `ApproversAssigned` carries the full resolved slot list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{AssetId, TransferId, WalletAddress};

use crate::approvers::Approver;
use crate::criteria::ApprovalCriteria;

/// Approval criteria configured (or re-configured) for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaConfigured {
    pub asset: AssetId,
    pub criteria: ApprovalCriteria,
}

/// A transfer entered escrow and awaits approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInitiated {
    pub id: TransferId,
    pub asset: AssetId,
    pub sender: WalletAddress,
    pub recipient: WalletAddress,
    pub amount: Decimal,
}

/// The resolved approver slot list for a freshly initiated transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproversAssigned {
    pub id: TransferId,
    pub approvers: Vec<Approver>,
}

/// One approver slot was marked approved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferApproved {
    pub id: TransferId,
    pub approver: WalletAddress,
}

/// All slots approved; escrow released to the recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompleted {
    pub id: TransferId,
    pub asset: AssetId,
    pub sender: WalletAddress,
    pub recipient: WalletAddress,
    pub amount: Decimal,
}

/// Sender withdrew the transfer; escrow returned to the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCancelled {
    pub id: TransferId,
}

/// A qualifying approver rejected the transfer; escrow returned to the
/// sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRejected {
    pub id: TransferId,
    pub approver: WalletAddress,
}

/// Enum wrapper for all coordinator events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinatorEvent {
    CriteriaConfigured(CriteriaConfigured),
    TransferInitiated(TransferInitiated),
    ApproversAssigned(ApproversAssigned),
    TransferApproved(TransferApproved),
    TransferCompleted(TransferCompleted),
    TransferCancelled(TransferCancelled),
    TransferRejected(TransferRejected),
}
