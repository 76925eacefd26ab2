//! External collaborator interfaces — asset ledger, eligibility, roles
//!
//! The coordinator never owns balances or identity state. It pulls and
//! pushes funds through [`AssetLedger`], gates recipients through
//! [`EligibilityRegistry`], and resolves the asset-agent role through
//! [`AgentRoles`]. All three are injected per call so the coordinator's
//! correctness can be tested without a live ledger.
//!
//! [`InMemoryLedger`] is a complete reference implementation of all three
//! interfaces, used throughout the test suites.

use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use types::ids::{AssetId, WalletAddress};

use crate::errors::LedgerError;

/// Asset ledger collaborator.
///
/// `transfer_from` is the authorized-transfer primitive: the coordinator
/// calls it to pull funds out of a sender's wallet, which requires the
/// sender to have pre-authorized the coordinator for at least that amount.
/// `transfer` moves funds the coordinator already holds in custody.
/// Both movements require a strictly positive amount.
pub trait AssetLedger {
    /// Balance of `wallet` for `asset`.
    fn balance_of(&self, asset: &AssetId, wallet: &WalletAddress) -> Decimal;

    /// Move `amount` from `owner` to `to`, spending the owner's
    /// authorization granted to the coordinator.
    fn transfer_from(
        &mut self,
        asset: &AssetId,
        owner: &WalletAddress,
        to: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError>;

    /// Move `amount` from `from` (coordinator custody) to `to`.
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError>;
}

/// Identity/eligibility verification collaborator.
///
/// Decides whether a wallet may hold or receive an asset. Used to gate
/// recipients at initiation and the coordinator's own registration at
/// configuration time.
pub trait EligibilityRegistry {
    fn is_eligible(&self, asset: &AssetId, wallet: &WalletAddress) -> bool;
}

/// Role-management collaborator.
///
/// The asset-agent role authorizes criteria configuration and fills
/// wildcard approver slots. Membership is evaluated at call time, never
/// bound at transfer creation.
pub trait AgentRoles {
    fn has_agent_role(&self, asset: &AssetId, wallet: &WalletAddress) -> bool;
}

/// In-memory implementation of all three collaborator interfaces.
///
/// Balances are stored as `asset -> (wallet -> amount)` with checked
/// arithmetic. Authorizations model the single-spender case: an owner
/// grants the coordinator a spending allowance that `transfer_from`
/// consumes.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    /// Balances: asset -> (wallet -> amount)
    balances: HashMap<AssetId, HashMap<WalletAddress, Decimal>>,
    /// Spending allowances granted to the coordinator: (asset, owner) -> amount
    authorizations: HashMap<(AssetId, WalletAddress), Decimal>,
    /// Wallets eligible to hold each asset
    eligible: HashSet<(AssetId, WalletAddress)>,
    /// Wallets holding the asset-agent role
    agents: HashSet<(AssetId, WalletAddress)>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to a wallet (test/setup primitive, akin to a mint).
    pub fn credit(
        &mut self,
        asset: &AssetId,
        wallet: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balances
            .entry(asset.clone())
            .or_default()
            .entry(wallet.clone())
            .or_insert(Decimal::ZERO);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Grant the coordinator a spending allowance on behalf of `owner`.
    pub fn authorize(&mut self, asset: &AssetId, owner: &WalletAddress, amount: Decimal) {
        self.authorizations
            .insert((asset.clone(), owner.clone()), amount);
    }

    /// Remaining allowance the coordinator may spend for `owner`.
    pub fn authorization(&self, asset: &AssetId, owner: &WalletAddress) -> Decimal {
        self.authorizations
            .get(&(asset.clone(), owner.clone()))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Mark a wallet as eligible to hold the asset.
    pub fn set_eligible(&mut self, asset: &AssetId, wallet: &WalletAddress) {
        self.eligible.insert((asset.clone(), wallet.clone()));
    }

    /// Remove a wallet's eligibility.
    pub fn revoke_eligibility(&mut self, asset: &AssetId, wallet: &WalletAddress) {
        self.eligible.remove(&(asset.clone(), wallet.clone()));
    }

    /// Grant the asset-agent role to a wallet.
    pub fn grant_agent_role(&mut self, asset: &AssetId, wallet: &WalletAddress) {
        self.agents.insert((asset.clone(), wallet.clone()));
    }

    /// Revoke the asset-agent role from a wallet.
    pub fn revoke_agent_role(&mut self, asset: &AssetId, wallet: &WalletAddress) {
        self.agents.remove(&(asset.clone(), wallet.clone()));
    }

    fn debit(
        &mut self,
        asset: &AssetId,
        wallet: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let wallets = self
            .balances
            .get_mut(asset)
            .ok_or_else(|| LedgerError::UnknownAsset {
                asset: asset.to_string(),
            })?;
        let balance = wallets.get_mut(wallet).ok_or_else(|| {
            LedgerError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount.to_string(),
                available: "0".to_string(),
            }
        })?;

        if *balance < amount {
            return Err(LedgerError::InsufficientBalance {
                asset: asset.to_string(),
                required: amount.to_string(),
                available: balance.to_string(),
            });
        }

        *balance = balance.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: &AssetId, wallet: &WalletAddress) -> Decimal {
        self.balances
            .get(asset)
            .and_then(|wallets| wallets.get(wallet))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn transfer_from(
        &mut self,
        asset: &AssetId,
        owner: &WalletAddress,
        to: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                amount: amount.to_string(),
            });
        }
        let key = (asset.clone(), owner.clone());
        let allowance = self
            .authorizations
            .get(&key)
            .copied()
            .unwrap_or(Decimal::ZERO);
        if allowance < amount {
            return Err(LedgerError::NotAuthorized {
                asset: asset.to_string(),
                owner: owner.to_string(),
            });
        }

        self.debit(asset, owner, amount)?;
        self.authorizations.insert(key, allowance - amount);
        // Credit cannot overflow here in practice, but stay checked.
        self.credit(asset, to, amount)
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &WalletAddress,
        to: &WalletAddress,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                amount: amount.to_string(),
            });
        }
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount)
    }
}

impl EligibilityRegistry for InMemoryLedger {
    fn is_eligible(&self, asset: &AssetId, wallet: &WalletAddress) -> bool {
        self.eligible.contains(&(asset.clone(), wallet.clone()))
    }
}

impl AgentRoles for InMemoryLedger {
    fn has_agent_role(&self, asset: &AssetId, wallet: &WalletAddress) -> bool {
        self.agents.contains(&(asset.clone(), wallet.clone()))
    }
}
