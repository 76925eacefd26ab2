//! Transfer state machine
//!
//! Orchestrates the coordinator: creates records, applies approvals,
//! rejections and cancellations, and drives escrow release. All
//! state-changing methods take `&mut self`, so operations on one
//! coordinator serialize by construction, and every method validates all
//! preconditions (including the external ledger movement) before the
//! first record mutation: a failing call leaves no observable effect and
//! emits no event.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use types::ids::{AssetId, TransferId, WalletAddress};

use crate::approvers::{
    matching_unapproved, next_unapproved, resolve_approvers, Approver, ApproverIdentity,
};
use crate::criteria::{ApprovalCriteria, CriteriaRegistry};
use crate::errors::CoordinatorError;
use crate::escrow::EscrowBook;
use crate::events::{
    ApproversAssigned, CoordinatorEvent, CriteriaConfigured, TransferApproved, TransferCancelled,
    TransferCompleted, TransferInitiated, TransferRejected,
};
use crate::identifier::derive_transfer_id;
use crate::ledger::{AgentRoles, AssetLedger, EligibilityRegistry};

/// Status of a coordinated transfer.
///
/// `Pending` is the only non-terminal state; the other three are
/// absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferStatus {
    /// Escrowed, awaiting approvals
    Pending,
    /// All slots approved; escrow released to recipient
    Completed,
    /// Withdrawn by the sender; escrow returned
    Cancelled,
    /// Rejected by a qualifying approver; escrow returned
    Rejected,
}

/// A single coordinated transfer.
///
/// The approver list is fixed at creation and never grows or shrinks;
/// records are retained after terminal transitions for audit lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: TransferId,
    pub asset: AssetId,
    pub sender: WalletAddress,
    pub recipient: WalletAddress,
    pub amount: Decimal,
    pub status: TransferStatus,
    pub approvers: Vec<Approver>,
}

/// The transfer coordinator: a single shared store combining the criteria
/// registry, the transfer records, the escrow book and the global
/// transfer nonce.
///
/// External collaborators (ledger, eligibility, roles) are injected per
/// call; the coordinator only holds its own custody wallet address.
#[derive(Debug)]
pub struct TransferCoordinator {
    /// The coordinator's custody wallet on the external ledger
    address: WalletAddress,
    /// Per-asset approval criteria
    criteria: CriteriaRegistry,
    /// All transfer records, keyed by identifier (never deleted)
    transfers: HashMap<TransferId, TransferRecord>,
    /// Per-record escrow custody
    escrow: EscrowBook,
    /// Global monotonic nonce, shared by all assets
    next_nonce: u64,
    /// Emitted events log (append-only)
    events: Vec<CoordinatorEvent>,
}

impl TransferCoordinator {
    /// Create a coordinator whose custody wallet is `address`.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: WalletAddress::new(address),
            criteria: CriteriaRegistry::new(),
            transfers: HashMap::new(),
            escrow: EscrowBook::new(),
            next_nonce: 0,
            events: Vec::new(),
        }
    }

    /// The coordinator's custody wallet address.
    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    // ───────────────────────── Criteria Registry ─────────────────────────

    /// Configure approval criteria for an asset, overwriting any previous
    /// entry.
    ///
    /// The caller must hold the asset's agent role, and the coordinator
    /// itself must be a verified participant for the asset. Emits
    /// `CriteriaConfigured` with the full new criteria.
    pub fn set_approval_criteria<R, E>(
        &mut self,
        caller: &WalletAddress,
        asset: &AssetId,
        criteria: ApprovalCriteria,
        roles: &R,
        eligibility: &E,
    ) -> Result<(), CoordinatorError>
    where
        R: AgentRoles,
        E: EligibilityRegistry,
    {
        if !roles.has_agent_role(asset, caller) {
            return Err(CoordinatorError::NotAuthorizedToConfigure {
                caller: caller.to_string(),
            });
        }
        if !eligibility.is_eligible(asset, &self.address) {
            return Err(CoordinatorError::CoordinatorNotEligibleForAsset {
                asset: asset.to_string(),
            });
        }

        self.criteria.set(asset, criteria.clone());
        self.events
            .push(CoordinatorEvent::CriteriaConfigured(CriteriaConfigured {
                asset: asset.clone(),
                criteria,
            }));
        info!(asset = %asset, caller = %caller, "approval criteria configured");
        Ok(())
    }

    /// Approval criteria for an asset, or `AssetNotRegistered` if none
    /// were ever set.
    pub fn approval_criteria(
        &self,
        asset: &AssetId,
    ) -> Result<&ApprovalCriteria, CoordinatorError> {
        self.criteria.get(asset)
    }

    // ───────────────────────── Initiation ─────────────────────────

    /// Initiate a transfer from `sender` to `recipient`.
    ///
    /// Preconditions, checked in order: `amount` is strictly positive,
    /// the asset is registered, the recipient passes the eligibility
    /// check, and the sender's spendable balance covers `amount`. On success the amount is pulled into
    /// coordinator custody (the sender must have pre-authorized the
    /// coordinator), a new identifier is derived from the global nonce,
    /// the approver list is resolved, and a `Pending` record is
    /// persisted. Emits `TransferInitiated` then `ApproversAssigned`.
    pub fn initiate_transfer<L, E>(
        &mut self,
        sender: &WalletAddress,
        asset: &AssetId,
        recipient: &WalletAddress,
        amount: Decimal,
        ledger: &mut L,
        eligibility: &E,
    ) -> Result<TransferId, CoordinatorError>
    where
        L: AssetLedger,
        E: EligibilityRegistry,
    {
        if amount <= Decimal::ZERO {
            return Err(CoordinatorError::InvalidAmount {
                amount: amount.to_string(),
            });
        }

        let criteria = self.criteria.get(asset)?.clone();

        if !eligibility.is_eligible(asset, recipient) {
            return Err(CoordinatorError::RecipientNotVerified {
                recipient: recipient.to_string(),
            });
        }

        let available = ledger.balance_of(asset, sender);
        if available < amount {
            return Err(CoordinatorError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount.to_string(),
                available: available.to_string(),
            });
        }

        let id = derive_transfer_id(self.next_nonce, sender, recipient, amount);

        // Record the hold first (internal only), then pull funds. If the
        // ledger refuses, drop the hold again so nothing is left behind.
        self.escrow.hold(id, amount)?;
        if let Err(e) = ledger.transfer_from(asset, sender, &self.address, amount) {
            self.escrow.release(&id);
            return Err(e.into());
        }

        self.next_nonce += 1;

        let approvers = resolve_approvers(&criteria, recipient);
        self.transfers.insert(
            id,
            TransferRecord {
                id,
                asset: asset.clone(),
                sender: sender.clone(),
                recipient: recipient.clone(),
                amount,
                status: TransferStatus::Pending,
                approvers: approvers.clone(),
            },
        );

        self.events
            .push(CoordinatorEvent::TransferInitiated(TransferInitiated {
                id,
                asset: asset.clone(),
                sender: sender.clone(),
                recipient: recipient.clone(),
                amount,
            }));
        self.events
            .push(CoordinatorEvent::ApproversAssigned(ApproversAssigned {
                id,
                approvers,
            }));

        info!(
            id = %id,
            asset = %asset,
            sender = %sender,
            recipient = %recipient,
            %amount,
            "transfer initiated"
        );
        Ok(id)
    }

    // ───────────────────────── Approval / Rejection ─────────────────────────

    /// Approve a pending transfer on behalf of `caller`.
    ///
    /// In non-sequential mode the caller must match some unapproved slot;
    /// in sequential mode the caller must match the next unapproved slot.
    /// If this approval fills the last open slot, the transfer completes
    /// and escrow is released to the recipient in the same operation.
    pub fn approve_transfer<L, R>(
        &mut self,
        caller: &WalletAddress,
        id: &TransferId,
        ledger: &mut L,
        roles: &R,
    ) -> Result<(), CoordinatorError>
    where
        L: AssetLedger,
        R: AgentRoles,
    {
        let record = self.pending(id)?;
        let sequential = self.criteria.get(&record.asset)?.sequential_approval;
        let slot = eligible_slot(record, sequential, caller, roles)?;

        let completes = record
            .approvers
            .iter()
            .enumerate()
            .all(|(i, a)| a.approved || i == slot);

        // External movement before any record mutation, so a refusing
        // ledger aborts the whole operation.
        if completes {
            ledger.transfer(&record.asset, &self.address, &record.recipient, record.amount)?;
        }

        let record = self.pending_mut(id)?;
        record.approvers[slot].approved = true;

        let approved = TransferApproved {
            id: *id,
            approver: caller.clone(),
        };
        if completes {
            record.status = TransferStatus::Completed;
            let completed = TransferCompleted {
                id: *id,
                asset: record.asset.clone(),
                sender: record.sender.clone(),
                recipient: record.recipient.clone(),
                amount: record.amount,
            };
            self.escrow.release(id);
            self.events.push(CoordinatorEvent::TransferApproved(approved));
            self.events
                .push(CoordinatorEvent::TransferCompleted(completed));
            info!(id = %id, approver = %caller, "transfer approved and completed");
        } else {
            self.events.push(CoordinatorEvent::TransferApproved(approved));
            debug!(id = %id, approver = %caller, "transfer approved");
        }
        Ok(())
    }

    /// Reject a pending transfer on behalf of `caller`.
    ///
    /// Gated exactly like approval, but a single qualifying rejection is
    /// final: the record transitions to `Rejected` and escrow returns to
    /// the sender.
    pub fn reject_transfer<L, R>(
        &mut self,
        caller: &WalletAddress,
        id: &TransferId,
        ledger: &mut L,
        roles: &R,
    ) -> Result<(), CoordinatorError>
    where
        L: AssetLedger,
        R: AgentRoles,
    {
        let record = self.pending(id)?;
        let sequential = self.criteria.get(&record.asset)?.sequential_approval;
        eligible_slot(record, sequential, caller, roles)?;

        ledger.transfer(&record.asset, &self.address, &record.sender, record.amount)?;

        let record = self.pending_mut(id)?;
        record.status = TransferStatus::Rejected;
        self.escrow.release(id);
        self.events
            .push(CoordinatorEvent::TransferRejected(TransferRejected {
                id: *id,
                approver: caller.clone(),
            }));
        info!(id = %id, approver = %caller, "transfer rejected");
        Ok(())
    }

    // ───────────────────────── Cancellation ─────────────────────────

    /// Cancel a pending transfer. Only the original sender may call;
    /// escrow returns to the sender.
    pub fn cancel_transfer<L>(
        &mut self,
        caller: &WalletAddress,
        id: &TransferId,
        ledger: &mut L,
    ) -> Result<(), CoordinatorError>
    where
        L: AssetLedger,
    {
        let record = self
            .transfers
            .get(id)
            .ok_or_else(|| CoordinatorError::InvalidTransferId { id: id.to_string() })?;
        if &record.sender != caller {
            return Err(CoordinatorError::NotSender {
                caller: caller.to_string(),
            });
        }
        if record.status != TransferStatus::Pending {
            return Err(CoordinatorError::TransferNotPending { id: id.to_string() });
        }

        ledger.transfer(&record.asset, &self.address, &record.sender, record.amount)?;

        let record = self.pending_mut(id)?;
        record.status = TransferStatus::Cancelled;
        self.escrow.release(id);
        self.events
            .push(CoordinatorEvent::TransferCancelled(TransferCancelled {
                id: *id,
            }));
        info!(id = %id, "transfer cancelled");
        Ok(())
    }

    // ───────────────────────── Read Accessors ─────────────────────────

    /// Look up a transfer record by identifier.
    pub fn transfer_record(&self, id: &TransferId) -> Result<&TransferRecord, CoordinatorError> {
        self.transfers
            .get(id)
            .ok_or_else(|| CoordinatorError::InvalidTransferId { id: id.to_string() })
    }

    /// Nonce that the next successful initiation will consume.
    pub fn next_tx_nonce(&self) -> u64 {
        self.next_nonce
    }

    /// The next approver for a pending sequential transfer: the first
    /// slot not yet approved. `None` only for a record with an empty
    /// approver list (a flagged but permitted configuration).
    pub fn next_approver(
        &self,
        id: &TransferId,
    ) -> Result<Option<&ApproverIdentity>, CoordinatorError> {
        let record = self.pending(id)?;
        Ok(next_unapproved(&record.approvers).map(|i| &record.approvers[i].identity))
    }

    /// Amount currently escrowed for a record (zero once terminal).
    pub fn escrowed(&self, id: &TransferId) -> Decimal {
        self.escrow.held(id)
    }

    /// Total escrow custody across all pending records.
    pub fn total_escrowed(&self) -> Decimal {
        self.escrow.total_held()
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[CoordinatorEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<CoordinatorEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn pending(&self, id: &TransferId) -> Result<&TransferRecord, CoordinatorError> {
        let record = self
            .transfers
            .get(id)
            .ok_or_else(|| CoordinatorError::InvalidTransferId { id: id.to_string() })?;
        if record.status != TransferStatus::Pending {
            return Err(CoordinatorError::TransferNotPending { id: id.to_string() });
        }
        Ok(record)
    }

    fn pending_mut(&mut self, id: &TransferId) -> Result<&mut TransferRecord, CoordinatorError> {
        let record = self
            .transfers
            .get_mut(id)
            .ok_or_else(|| CoordinatorError::InvalidTransferId { id: id.to_string() })?;
        if record.status != TransferStatus::Pending {
            return Err(CoordinatorError::TransferNotPending { id: id.to_string() });
        }
        Ok(record)
    }
}

/// Slot the caller is entitled to act on, per the transfer's ordering
/// mode. Shared by approve and reject.
fn eligible_slot<R: AgentRoles>(
    record: &TransferRecord,
    sequential: bool,
    caller: &WalletAddress,
    roles: &R,
) -> Result<usize, CoordinatorError> {
    if sequential {
        let next = next_unapproved(&record.approvers).ok_or_else(|| {
            CoordinatorError::ApproverNotFound {
                caller: caller.to_string(),
            }
        })?;
        if !record.approvers[next]
            .identity
            .matches(&record.asset, caller, roles)
        {
            return Err(CoordinatorError::ApprovalsOutOfOrder {
                caller: caller.to_string(),
            });
        }
        Ok(next)
    } else {
        matching_unapproved(&record.approvers, &record.asset, caller, roles).ok_or_else(|| {
            CoordinatorError::ApproverNotFound {
                caller: caller.to_string(),
            }
        })
    }
}
