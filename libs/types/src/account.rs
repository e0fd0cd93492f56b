//! User and system-debt records

use serde::{Deserialize, Serialize};

use crate::entity::{impl_entity, EntityKind};
use crate::ids::Address;
use crate::numeric::Decimal;

/// A chain address seen by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub address: Address,
    /// Net stablecoin balance attributable to vault operations (rad)
    pub total_vault_dai: Decimal,
    /// Balance deposited in the savings contract (wad)
    pub savings: Decimal,
}

impl User {
    pub fn new(address: Address) -> Self {
        Self {
            id: address.to_hex(),
            address,
            total_vault_dai: Decimal::zero(),
            savings: Decimal::zero(),
        }
    }
}

impl_entity!(User, EntityKind::User);

/// Unbacked debt held by an address, typically the settlement contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemDebt {
    pub id: String,
    /// User id of the holder, once known
    pub owner: Option<String>,
    /// rad
    pub amount: Decimal,
}

impl SystemDebt {
    pub fn new(holder: &Address) -> Self {
        Self {
            id: holder.to_hex(),
            owner: None,
            amount: Decimal::zero(),
        }
    }
}

impl_entity!(SystemDebt, EntityKind::SystemDebt);
