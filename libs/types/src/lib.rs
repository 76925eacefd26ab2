//! Types library for the transfer coordination system
//!
//! Provides the core identifier types shared between the coordinator and
//! its external collaborators (ledger, eligibility, role management).
//!
//! # Modules
//! - `ids`: Unique identifiers (WalletAddress, AssetId, TransferId)

pub mod ids;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
}
