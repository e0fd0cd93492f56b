//! Entity kinds and the common entity contract
//!
//! Every persisted record has a kind (its table) and a string id. The store
//! addresses rows only by `(kind, id)`; there are no scans.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TxHash;

/// Table an entity row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    CollateralType,
    Vault,
    CollateralBalance,
    CollateralPrice,
    User,
    SystemDebt,
    SystemState,
    ChainLog,
    SaleAuction,
    DebtAuction,
    CollateralChangeLog,
    VaultCollateralChangeLog,
    VaultDebtChangeLog,
    VaultSplitChangeLog,
    CollateralTransferLog,
    DaiMoveLog,
    LiveChangeLog,
    ProtocolParameterChangeLog,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::CollateralType => "CollateralType",
            EntityKind::Vault => "Vault",
            EntityKind::CollateralBalance => "CollateralBalance",
            EntityKind::CollateralPrice => "CollateralPrice",
            EntityKind::User => "User",
            EntityKind::SystemDebt => "SystemDebt",
            EntityKind::SystemState => "SystemState",
            EntityKind::ChainLog => "ChainLog",
            EntityKind::SaleAuction => "SaleAuction",
            EntityKind::DebtAuction => "DebtAuction",
            EntityKind::CollateralChangeLog => "CollateralChangeLog",
            EntityKind::VaultCollateralChangeLog => "VaultCollateralChangeLog",
            EntityKind::VaultDebtChangeLog => "VaultDebtChangeLog",
            EntityKind::VaultSplitChangeLog => "VaultSplitChangeLog",
            EntityKind::CollateralTransferLog => "CollateralTransferLog",
            EntityKind::DaiMoveLog => "DaiMoveLog",
            EntityKind::LiveChangeLog => "LiveChangeLog",
            EntityKind::ProtocolParameterChangeLog => "ProtocolParameterChangeLog",
        }
    }

    /// Write-once audit tables.
    pub fn is_audit_log(&self) -> bool {
        matches!(
            self,
            EntityKind::CollateralChangeLog
                | EntityKind::VaultCollateralChangeLog
                | EntityKind::VaultDebtChangeLog
                | EntityKind::VaultSplitChangeLog
                | EntityKind::CollateralTransferLog
                | EntityKind::DaiMoveLog
                | EntityKind::LiveChangeLog
                | EntityKind::ProtocolParameterChangeLog
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted record addressable by `(KIND, id)`.
pub trait Entity: Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl $crate::entity::Entity for $ty {
            const KIND: $crate::entity::EntityKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

pub(crate) use impl_entity;

/// Where in the chain a write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub block_number: u64,
    pub timestamp: u64,
    pub transaction: TxHash,
}

impl Provenance {
    pub fn new(block_number: u64, timestamp: u64, transaction: TxHash) -> Self {
        Self {
            block_number,
            timestamp,
            transaction,
        }
    }
}
