//! Protocol log decoding and routing
//!
//! This crate turns raw log envelopes emitted by the protocol's contracts
//! into typed ledger events.
//!
//! # Modules
//! - `envelope`: Ingress envelope, source contract kinds and signatures
//! - `selectors`: 4-byte function selectors of anonymous note logs
//! - `layouts`: Named field-layout tables, one per event shape
//! - `abi`: Byte parameter decoder
//! - `events`: Typed `LedgerEvent` union
//! - `router`: Maps an envelope to its `LedgerEvent`
//! - `errors`: Decoding error types
//!
//! # Version
//! v0.1.0

pub mod abi;
pub mod envelope;
pub mod errors;
pub mod events;
pub mod layouts;
pub mod router;
pub mod selectors;

/// Log ABI version understood by the router
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
