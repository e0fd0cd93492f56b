//! Append-only audit records
//!
//! Every record id has the form `<transaction hash>-<log index>-<suffix>`,
//! where the suffix is fixed per record type. Replaying a log therefore
//! overwrites the same row instead of adding a second one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{impl_entity, EntityKind, Provenance};
use crate::ids::Address;
use crate::numeric::Decimal;

/// Per-record-type id suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditSuffix {
    CollateralChange,
    VaultCollateralChange,
    VaultDebtChange,
    VaultSplitChange,
    DaiMove,
    TransferOut,
    TransferIn,
    ParameterChange,
    LiveChange,
}

impl AuditSuffix {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSuffix::CollateralChange => "0",
            AuditSuffix::LiveChange => "0",
            AuditSuffix::VaultCollateralChange => "1",
            AuditSuffix::VaultDebtChange => "2",
            AuditSuffix::VaultSplitChange => "3",
            AuditSuffix::DaiMove => "4",
            AuditSuffix::TransferOut => "5.0",
            AuditSuffix::TransferIn => "5.1",
            AuditSuffix::ParameterChange => "6",
        }
    }
}

/// Deterministic audit record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuditId(String);

impl AuditId {
    pub fn new(transaction: &crate::ids::TxHash, log_index: u64, suffix: AuditSuffix) -> Self {
        Self(format!("{}-{}-{}", transaction.to_hex(), log_index, suffix.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AuditId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unlocked collateral balance changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralChangeLog {
    pub id: String,
    /// `CollateralBalance` id
    pub collateral: String,
    pub collateral_before: Decimal,
    pub collateral_after: Decimal,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(CollateralChangeLog, EntityKind::CollateralChangeLog);

/// Collateral locked in a vault changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultCollateralChangeLog {
    pub id: String,
    pub vault: String,
    pub collateral_before: Decimal,
    pub collateral_after: Decimal,
    pub collateral_diff: Decimal,
    pub rate: Decimal,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(VaultCollateralChangeLog, EntityKind::VaultCollateralChangeLog);

/// Normalized debt of a vault changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultDebtChangeLog {
    pub id: String,
    pub vault: String,
    pub debt_before: Decimal,
    pub debt_after: Decimal,
    pub debt_diff: Decimal,
    pub rate: Decimal,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(VaultDebtChangeLog, EntityKind::VaultDebtChangeLog);

/// Collateral and debt moved between two vaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultSplitChangeLog {
    pub id: String,
    pub src: Address,
    pub dst: Address,
    /// Source vault id when it exists, destination otherwise
    pub vault: String,
    pub collateral_to_move: Decimal,
    pub debt_to_move: Decimal,
    pub rate: Decimal,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(VaultSplitChangeLog, EntityKind::VaultSplitChangeLog);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferDirection {
    In,
    Out,
}

/// One leg of a collateral transfer between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollateralTransferLog {
    pub id: String,
    pub src: Address,
    pub dst: Address,
    /// `CollateralBalance` id of the leg's subject
    pub collateral: String,
    pub amount: Decimal,
    pub direction: TransferDirection,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(CollateralTransferLog, EntityKind::CollateralTransferLog);

/// Stablecoin moved between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaiMoveLog {
    pub id: String,
    pub src: Address,
    pub dst: Address,
    /// rad
    pub amount: Decimal,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(DaiMoveLog, EntityKind::DaiMoveLog);

/// A contract was caged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveChangeLog {
    pub id: String,
    pub contract: Address,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(LiveChangeLog, EntityKind::LiveChangeLog);

/// Value written by a parameter update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ParameterValue {
    Decimal(Decimal),
    Integer(Decimal),
    Address(Address),
}

/// A protocol parameter was set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolParameterChangeLog {
    pub id: String,
    /// Contract family, e.g. `VAT`, `JUG`
    pub contract_type: String,
    pub parameter_key1: String,
    /// Collateral type for per-collateral parameters, empty otherwise
    pub parameter_key2: String,
    pub parameter_value: ParameterValue,
    #[serde(flatten)]
    pub provenance: Provenance,
}

impl_entity!(ProtocolParameterChangeLog, EntityKind::ProtocolParameterChangeLog);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TxHash;

    #[test]
    fn test_audit_id_format() {
        let tx = TxHash::new([0x11; 32]);
        let id = AuditId::new(&tx, 7, AuditSuffix::TransferOut);
        assert_eq!(id.as_str(), format!("0x{}-7-5.0", "11".repeat(32)));
    }

    #[test]
    fn test_audit_id_deterministic() {
        let tx = TxHash::new([0x22; 32]);
        assert_eq!(
            AuditId::new(&tx, 3, AuditSuffix::DaiMove),
            AuditId::new(&tx, 3, AuditSuffix::DaiMove)
        );
        assert_ne!(
            AuditId::new(&tx, 3, AuditSuffix::VaultCollateralChange),
            AuditId::new(&tx, 3, AuditSuffix::VaultDebtChange)
        );
    }

    #[test]
    fn test_provenance_flattened_into_row() {
        let log = DaiMoveLog {
            id: "x".into(),
            src: Address::ZERO,
            dst: Address::ZERO,
            amount: Decimal::from(5i64),
            provenance: Provenance::new(9, 99, TxHash::default()),
        };
        let row = serde_json::to_value(&log).unwrap();
        assert_eq!(row["block_number"], 9);
        assert_eq!(row["amount"], "5");
        let back: DaiMoveLog = serde_json::from_value(row).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn test_direction_uppercase() {
        assert_eq!(serde_json::to_string(&TransferDirection::Out).unwrap(), "\"OUT\"");
    }
}
