//! Collateral types, vaults, unlocked collateral balances and prices
//!
//! Invariant kept by every mutation that touches `debt_normalized` or `rate`:
//! `total_debt == debt_normalized × rate`.

use serde::{Deserialize, Serialize};

use crate::entity::{impl_entity, EntityKind, Provenance};
use crate::ids::{self, Address};
use crate::numeric::Decimal;

/// A registered collateral type ("ilk"), keyed by its symbolic name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralType {
    pub id: String,
    /// Debt ceiling (rad)
    pub debt_ceiling: Decimal,
    /// Minimum debt per vault (rad)
    pub vault_debt_floor: Decimal,
    /// Collateral locked in vaults (wad)
    pub total_collateral: Decimal,
    /// `debt_normalized × rate`
    pub total_debt: Decimal,
    /// Sum of per-vault normalized debt (wad)
    pub debt_normalized: Decimal,
    /// Debt multiplier (ray), never decreases under normal operation
    pub rate: Decimal,
    pub stability_fee: Decimal,
    pub stability_fee_updated_at: Option<u64>,
    pub liquidation_lot_size: Decimal,
    pub liquidation_penalty: Decimal,
    pub liquidation_ratio: Decimal,
    pub vault_count: u64,
    pub unmanaged_vault_count: u64,
    /// Id of the latest `CollateralPrice`
    pub price: Option<String>,
    pub added: Provenance,
    pub updated: Option<Provenance>,
}

impl CollateralType {
    /// Fresh collateral type: all accumulators zero, rate and stability fee one.
    pub fn new(id: impl Into<String>, added: Provenance) -> Self {
        Self {
            id: id.into(),
            debt_ceiling: Decimal::zero(),
            vault_debt_floor: Decimal::zero(),
            total_collateral: Decimal::zero(),
            total_debt: Decimal::zero(),
            debt_normalized: Decimal::zero(),
            rate: Decimal::one(),
            stability_fee: Decimal::one(),
            stability_fee_updated_at: None,
            liquidation_lot_size: Decimal::zero(),
            liquidation_penalty: Decimal::zero(),
            liquidation_ratio: Decimal::zero(),
            vault_count: 0,
            unmanaged_vault_count: 0,
            price: None,
            added,
            updated: None,
        }
    }

    /// Overwrite `total_debt` from its operands.
    pub fn recompute_total_debt(&mut self) {
        self.total_debt = &self.debt_normalized * &self.rate;
    }

    pub fn debt_invariant_holds(&self) -> bool {
        self.total_debt == &self.debt_normalized * &self.rate
    }

    pub fn touch(&mut self, at: Provenance) {
        self.updated = Some(at);
    }
}

impl_entity!(CollateralType, EntityKind::CollateralType);

/// A position of one owner in one collateral type.
///
/// Created lazily on first reference and never deleted; zero balances mean
/// the vault is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vault {
    pub id: String,
    pub collateral_type: String,
    pub owner: Address,
    /// Locked collateral (wad)
    pub collateral: Decimal,
    /// Normalized debt (wad)
    pub debt: Decimal,
    /// Accumulated safety heuristic, may go negative
    pub safety_level: Decimal,
    /// `false` when the vault was opened directly against the core contract
    pub managed: bool,
    pub opened: Provenance,
    pub updated: Option<Provenance>,
}

impl Vault {
    pub fn new(owner: Address, collateral_type: &str, managed: bool, opened: Provenance) -> Self {
        Self {
            id: ids::vault_id(&owner, collateral_type),
            collateral_type: collateral_type.to_string(),
            owner,
            collateral: Decimal::zero(),
            debt: Decimal::zero(),
            safety_level: Decimal::zero(),
            managed,
            opened,
            updated: None,
        }
    }

    pub fn touch(&mut self, at: Provenance) {
        self.updated = Some(at);
    }
}

impl_entity!(Vault, EntityKind::Vault);

/// Unlocked collateral held by a user, distinct from collateral locked in a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralBalance {
    pub id: String,
    pub collateral_type: String,
    pub owner: Address,
    /// wad
    pub amount: Decimal,
    pub created: Provenance,
    pub updated: Option<Provenance>,
}

impl CollateralBalance {
    pub fn new(owner: Address, collateral_type: &str, created: Provenance) -> Self {
        Self {
            id: ids::collateral_balance_id(&owner, collateral_type),
            collateral_type: collateral_type.to_string(),
            owner,
            amount: Decimal::zero(),
            created,
            updated: None,
        }
    }

    pub fn touch(&mut self, at: Provenance) {
        self.updated = Some(at);
    }
}

impl_entity!(CollateralBalance, EntityKind::CollateralBalance);

/// Point-in-time price snapshot. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralPrice {
    pub id: String,
    pub collateral_type: String,
    pub block_number: u64,
    pub timestamp: u64,
    /// Oracle price (wad)
    pub value: Decimal,
    /// Price with safety margin applied (ray)
    pub spot_price: Decimal,
}

impl CollateralPrice {
    pub fn new(collateral_type: &str, at: Provenance, value: Decimal, spot_price: Decimal) -> Self {
        Self {
            id: ids::collateral_price_id(at.block_number, collateral_type),
            collateral_type: collateral_type.to_string(),
            block_number: at.block_number,
            timestamp: at.timestamp,
            value,
            spot_price,
        }
    }
}

impl_entity!(CollateralPrice, EntityKind::CollateralPrice);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::ids::TxHash;
    use std::str::FromStr;

    fn at() -> Provenance {
        Provenance::new(1, 100, TxHash::default())
    }

    #[test]
    fn test_new_collateral_type_defaults() {
        let ilk = CollateralType::new("ETH-A", at());
        assert_eq!(ilk.rate, Decimal::one());
        assert_eq!(ilk.stability_fee, Decimal::one());
        assert!(ilk.total_debt.is_zero());
        assert!(ilk.debt_invariant_holds());
        assert_eq!(ilk.id(), "ETH-A");
    }

    #[test]
    fn test_recompute_total_debt() {
        let mut ilk = CollateralType::new("ETH-A", at());
        ilk.debt_normalized = Decimal::from(5i64);
        ilk.rate = Decimal::from_str("1.1").unwrap();
        assert!(!ilk.debt_invariant_holds());
        ilk.recompute_total_debt();
        assert_eq!(ilk.total_debt, Decimal::from_str("5.5").unwrap());
        assert!(ilk.debt_invariant_holds());
    }

    #[test]
    fn test_vault_id_derived_from_owner_and_ilk() {
        let owner = Address::new([7u8; 20]);
        let vault = Vault::new(owner, "ETH-A", false, at());
        assert_eq!(vault.id, ids::vault_id(&owner, "ETH-A"));
        assert!(vault.collateral.is_zero());
        assert!(!vault.managed);
    }

    #[test]
    fn test_vault_row_serializes_decimals_as_strings() {
        let mut vault = Vault::new(Address::ZERO, "ETH-A", false, at());
        vault.collateral = Decimal::from_str("10.5").unwrap();
        let row = serde_json::to_value(&vault).unwrap();
        assert_eq!(row["collateral"], "10.5");
        assert_eq!(row["safety_level"], "0");
    }

    #[test]
    fn test_price_id() {
        let price = CollateralPrice::new("ETH-A", at(), Decimal::from(2000i64), Decimal::one());
        assert_eq!(price.id, "1-ETH-A");
    }
}
