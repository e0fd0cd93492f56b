//! Entity Store & Deterministic Snapshots
//!
//! Provides the load/save contract the ledger writes through, an in-memory
//! implementation with sorted iteration, and state snapshots with integrity
//! hashes for replay comparison.
//!
//! Rows are addressed only by `(kind, id)`. There are no scans or queries.

pub mod store;
pub mod snapshot;

pub use store::{EntityStore, MemoryStore, StoreError};
