//! Escrow custody book
//!
//! Tracks the amount held in coordinator custody for each pending
//! transfer, plus a running total. The state machine guarantees a hold is
//! released exactly once, from the single transition into a terminal
//! state. At all times the total equals the sum of pending amounts.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::TransferId;

use crate::errors::LedgerError;

/// Per-record custody tracking.
#[derive(Debug, Default)]
pub struct EscrowBook {
    held: HashMap<TransferId, Decimal>,
    total: Decimal,
}

impl EscrowBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record custody of `amount` for a new pending transfer.
    pub fn hold(&mut self, id: TransferId, amount: Decimal) -> Result<(), LedgerError> {
        let new_total = self.total.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.held.insert(id, amount);
        self.total = new_total;
        Ok(())
    }

    /// Release the full held amount for a record, removing it from the
    /// book. Returns the released amount, or zero if nothing was held.
    pub fn release(&mut self, id: &TransferId) -> Decimal {
        match self.held.remove(id) {
            Some(amount) => {
                self.total -= amount;
                amount
            }
            None => Decimal::ZERO,
        }
    }

    /// Amount currently held for a record.
    pub fn held(&self, id: &TransferId) -> Decimal {
        self.held.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Total custody across all pending records.
    pub fn total_held(&self) -> Decimal {
        self.total
    }
}
