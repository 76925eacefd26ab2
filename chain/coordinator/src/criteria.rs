//! Approval criteria registry
//!
//! Per-asset configuration consumed by the approver resolution engine.
//! An asset with no criteria ever registered is "unregistered" and rejects
//! all transfer requests. Re-configuration overwrites the previous entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use types::ids::{AssetId, WalletAddress};

use crate::errors::CoordinatorError;

/// Approval requirements configured for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalCriteria {
    /// Require the recipient's approval.
    pub include_recipient_approver: bool,
    /// Require approval from any current asset-agent (wildcard slot).
    pub include_agent_approver: bool,
    /// Require approvals strictly in slot order.
    pub sequential_approval: bool,
    /// Extra approvers, each bound to a fixed wallet, in this order.
    pub additional_approvers: Vec<WalletAddress>,
}

impl ApprovalCriteria {
    /// Whether any approver category is enabled.
    ///
    /// A criteria with no category is accepted by the registry but makes
    /// initiation meaningless: the resulting transfers can never complete.
    pub fn has_approver_category(&self) -> bool {
        self.include_recipient_approver
            || self.include_agent_approver
            || !self.additional_approvers.is_empty()
    }
}

/// Per-asset criteria store.
#[derive(Debug, Default)]
pub struct CriteriaRegistry {
    criteria: HashMap<AssetId, ApprovalCriteria>,
}

impl CriteriaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether criteria were ever configured for the asset.
    pub fn is_registered(&self, asset: &AssetId) -> bool {
        self.criteria.contains_key(asset)
    }

    /// Store criteria for an asset, overwriting any previous entry.
    pub fn set(&mut self, asset: &AssetId, criteria: ApprovalCriteria) {
        if !criteria.has_approver_category() {
            warn!(
                asset = %asset,
                "approval criteria configured with no approver category; \
                 transfers for this asset can never complete"
            );
        }
        self.criteria.insert(asset.clone(), criteria);
    }

    /// Criteria for an asset, or `AssetNotRegistered` if never configured.
    pub fn get(&self, asset: &AssetId) -> Result<&ApprovalCriteria, CoordinatorError> {
        self.criteria
            .get(asset)
            .ok_or_else(|| CoordinatorError::AssetNotRegistered {
                asset: asset.to_string(),
            })
    }
}
