//! Per-event handler context and outcomes

use contracts::envelope::LogEnvelope;
use persistence::EntityStore;
use std::fmt;
use types::audit::{AuditId, AuditSuffix};
use types::entity::Provenance;
use types::ids::Address;
use types::system::SystemState;

use crate::chain::ChainReader;
use crate::config::LedgerConfig;

/// Why an event was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No route for this (contract, signature) pair
    UnknownSignature,
    UnknownCollateralType(String),
    /// Collateral type already registered
    AlreadyRegistered(String),
    MissingUser(Address),
    MissingAuction(String),
    /// `file` key not handled for this contract
    UnrecognizedParameter { contract: &'static str, what: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownSignature => write!(f, "unknown signature"),
            SkipReason::UnknownCollateralType(ilk) => write!(f, "unknown collateral type {}", ilk),
            SkipReason::AlreadyRegistered(ilk) => write!(f, "collateral type {} already registered", ilk),
            SkipReason::MissingUser(addr) => write!(f, "missing user {}", addr),
            SkipReason::MissingAuction(id) => write!(f, "missing auction {}", id),
            SkipReason::UnrecognizedParameter { contract, what } => {
                write!(f, "unrecognized parameter {}.{}", contract, what)
            }
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Envelope fields handlers need, detached from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMeta {
    pub provenance: Provenance,
    pub log_index: u64,
    /// Emitting contract
    pub address: Address,
    /// Sender of the enclosing transaction
    pub transaction_from: Address,
}

impl EventMeta {
    pub fn from_envelope(envelope: &LogEnvelope) -> Self {
        Self {
            provenance: envelope.provenance(),
            log_index: envelope.log_index,
            address: envelope.address,
            transaction_from: envelope.transaction_from,
        }
    }

    pub fn audit_id(&self, suffix: AuditSuffix) -> String {
        AuditId::new(&self.provenance.transaction, self.log_index, suffix).into_string()
    }

    pub fn timestamp(&self) -> u64 {
        self.provenance.timestamp
    }

    pub fn block_number(&self) -> u64 {
        self.provenance.block_number
    }
}

/// Everything a handler may read or write while applying one event.
///
/// The system-state singleton is borrowed from the engine. Handlers reach it
/// through [`Ctx::system_mut`], which marks it for saving.
pub struct Ctx<'a, S: EntityStore> {
    pub store: &'a mut S,
    pub meta: EventMeta,
    pub config: &'a LedgerConfig,
    pub chain: &'a dyn ChainReader,
    system: &'a mut SystemState,
    system_touched: bool,
}

impl<'a, S: EntityStore> Ctx<'a, S> {
    pub fn new(
        store: &'a mut S,
        system: &'a mut SystemState,
        meta: EventMeta,
        config: &'a LedgerConfig,
        chain: &'a dyn ChainReader,
    ) -> Self {
        Self {
            store,
            meta,
            config,
            chain,
            system,
            system_touched: false,
        }
    }

    pub fn system(&self) -> &SystemState {
        &*self.system
    }

    pub fn system_mut(&mut self) -> &mut SystemState {
        self.system_touched = true;
        &mut *self.system
    }

    pub fn system_touched(&self) -> bool {
        self.system_touched
    }

    pub fn provenance(&self) -> Provenance {
        self.meta.provenance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NoChain;
    use persistence::MemoryStore;
    use types::ids::TxHash;

    #[test]
    fn test_system_mut_marks_touched() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let config = LedgerConfig::default();
        let meta = EventMeta {
            provenance: Provenance::new(1, 2, TxHash::default()),
            log_index: 0,
            address: Address::ZERO,
            transaction_from: Address::ZERO,
        };
        let mut ctx = Ctx::new(&mut store, &mut system, meta, &config, &NoChain);
        assert!(!ctx.system_touched());
        let _ = ctx.system().collateral_count;
        assert!(!ctx.system_touched());
        ctx.system_mut().collateral_count += 1;
        assert!(ctx.system_touched());
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::UnrecognizedParameter {
            contract: "VAT",
            what: "foo".into(),
        };
        assert_eq!(reason.to_string(), "unrecognized parameter VAT.foo");
    }
}
