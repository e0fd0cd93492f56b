//! Types library for the collateralized-debt ledger
//!
//! This library provides the shared type definitions used by the decoder,
//! the entity store and the ledger state machine.
//!
//! # Modules
//! - `numeric`: Fixed-point decimal type covering wad, ray and rad scales
//! - `ids`: Addresses, transaction hashes and entity id builders
//! - `entity`: Entity kinds, the `Entity` contract and write provenance
//! - `vault`: Collateral types, vaults, unlocked balances, prices
//! - `account`: Users and system debt
//! - `system`: System-wide state singleton and chain address registry
//! - `audit`: Append-only audit records and their id scheme
//! - `auction`: Sale and debt auctions
//! - `errors`: Error taxonomy

pub mod numeric;
pub mod ids;
pub mod entity;
pub mod vault;
pub mod account;
pub mod system;
pub mod audit;
pub mod auction;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::account::*;
    pub use crate::auction::*;
    pub use crate::audit::*;
    pub use crate::entity::*;
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::system::*;
    pub use crate::vault::*;
}
