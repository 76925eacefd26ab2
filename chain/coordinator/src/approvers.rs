//! Approver resolution engine
//!
//! Builds the fixed-order approver slot list for a transfer from its
//! asset's approval criteria, and implements the matching rules used by
//! approve/reject/next-approver lookups. Pure functions over criteria and
//! transfer facts; the only external dependency is the role check for
//! wildcard slots, evaluated at call time.

use serde::{Deserialize, Serialize};
use std::fmt;
use types::ids::{AssetId, WalletAddress};

use crate::criteria::ApprovalCriteria;
use crate::ledger::AgentRoles;

/// The identity an approver slot is bound to.
///
/// A wildcard slot is not a fixed principal but a capability check: any
/// wallet holding the asset-agent role at approval time matches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApproverIdentity {
    /// Bound to a specific wallet address.
    Bound(WalletAddress),
    /// Any current holder of the asset-agent role.
    AnyAgent,
}

impl ApproverIdentity {
    /// Matching rule: a caller matches a bound slot iff addresses are
    /// equal, and matches a wildcard slot iff the caller currently holds
    /// the asset's agent role.
    pub fn matches<R: AgentRoles>(
        &self,
        asset: &AssetId,
        caller: &WalletAddress,
        roles: &R,
    ) -> bool {
        match self {
            ApproverIdentity::Bound(wallet) => wallet == caller,
            ApproverIdentity::AnyAgent => roles.has_agent_role(asset, caller),
        }
    }
}

impl fmt::Display for ApproverIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproverIdentity::Bound(wallet) => write!(f, "{}", wallet),
            ApproverIdentity::AnyAgent => write!(f, "<any-agent>"),
        }
    }
}

/// One position in a transfer's approval requirement list.
///
/// The `approved` flag only ever transitions false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approver {
    pub identity: ApproverIdentity,
    pub approved: bool,
}

impl Approver {
    fn unapproved(identity: ApproverIdentity) -> Self {
        Self {
            identity,
            approved: false,
        }
    }
}

/// Resolve the approver slot list for a transfer, in fixed slot order:
/// recipient slot (if included), wildcard agent slot (if included), then
/// one bound slot per additional approver in configured order.
pub fn resolve_approvers(criteria: &ApprovalCriteria, recipient: &WalletAddress) -> Vec<Approver> {
    let mut approvers = Vec::new();

    if criteria.include_recipient_approver {
        approvers.push(Approver::unapproved(ApproverIdentity::Bound(
            recipient.clone(),
        )));
    }
    if criteria.include_agent_approver {
        approvers.push(Approver::unapproved(ApproverIdentity::AnyAgent));
    }
    for wallet in &criteria.additional_approvers {
        approvers.push(Approver::unapproved(ApproverIdentity::Bound(wallet.clone())));
    }

    approvers
}

/// Index of the next unapproved slot, scanning in slot order.
pub fn next_unapproved(approvers: &[Approver]) -> Option<usize> {
    approvers.iter().position(|a| !a.approved)
}

/// Index of the first unapproved slot matching `caller` (any-order mode).
pub fn matching_unapproved<R: AgentRoles>(
    approvers: &[Approver],
    asset: &AssetId,
    caller: &WalletAddress,
    roles: &R,
) -> Option<usize> {
    approvers
        .iter()
        .position(|a| !a.approved && a.identity.matches(asset, caller, roles))
}
