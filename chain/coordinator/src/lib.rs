//! Approval-Gated Transfer Coordination
//!
//! This crate implements the coordination layer for asset transfers that
//! require explicit approval from a configurable, ordered set of parties
//! before funds move from sender to recipient. Funds are held in escrow
//! by the coordinator between initiation and terminal resolution.
//!
//! # Modules
//! - `errors`: Coordinator and ledger error taxonomies
//! - `events`: Notifications emitted by state-changing operations
//! - `ledger`: External collaborator interfaces + in-memory reference impl
//! - `identifier`: Nonce-based transfer identifier derivation
//! - `criteria`: Per-asset approval criteria registry
//! - `approvers`: Approver resolution engine and matching rules
//! - `escrow`: Per-record escrow custody book
//! - `transfer`: The transfer state machine

pub mod approvers;
pub mod criteria;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod identifier;
pub mod ledger;
pub mod transfer;

pub use approvers::{Approver, ApproverIdentity};
pub use criteria::ApprovalCriteria;
pub use errors::{CoordinatorError, LedgerError};
pub use events::CoordinatorEvent;
pub use identifier::derive_transfer_id;
pub use ledger::{AgentRoles, AssetLedger, EligibilityRegistry, InMemoryLedger};
pub use transfer::{TransferCoordinator, TransferRecord, TransferStatus};

/// Coordinator API version — frozen after release
pub const COORDINATOR_API_VERSION: &str = "1.0.0";
