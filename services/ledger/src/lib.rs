//! Ledger Service
//!
//! Applies decoded protocol events to the entity store:
//! - Collateral types, vaults, unlocked collateral and stablecoin balances
//! - System debt, savings and global totals
//! - Sale and debt auction lifecycle
//! - Append-only audit records for every balance change
//!
//! Events arrive strictly ordered and are applied one at a time. A handler
//! either applies its event, skips it because a referenced entity is
//! missing, or the engine rejects it because the payload is malformed.

pub mod audit;
pub mod chain;
pub mod config;
pub mod context;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod params;
pub mod safety;

pub use config::LedgerConfig;
pub use context::{Outcome, SkipReason};
pub use engine::{EngineStats, LedgerEngine};
pub use errors::LedgerError;
