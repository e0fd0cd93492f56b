//! Audit log emitter
//!
//! Builds the write-once change records. Every id is
//! `<tx hash>-<log index>-<suffix>`, so re-delivering an event overwrites its
//! records instead of duplicating them.

use persistence::{EntityStore, StoreError};
use types::audit::{
    AuditSuffix, CollateralChangeLog, CollateralTransferLog, DaiMoveLog, LiveChangeLog,
    ParameterValue, ProtocolParameterChangeLog, TransferDirection, VaultCollateralChangeLog,
    VaultDebtChangeLog, VaultSplitChangeLog,
};
use types::ids::Address;
use types::numeric::Decimal;

use crate::context::EventMeta;

/// Unlocked collateral balance moved from `before` to `after`.
pub fn collateral_change<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    collateral: &str,
    before: &Decimal,
    after: &Decimal,
) -> Result<(), StoreError> {
    store.save(&CollateralChangeLog {
        id: meta.audit_id(AuditSuffix::CollateralChange),
        collateral: collateral.to_string(),
        collateral_before: before.clone(),
        collateral_after: after.clone(),
        provenance: meta.provenance,
    })
}

pub fn vault_collateral_change<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    vault: &str,
    before: &Decimal,
    after: &Decimal,
    rate: &Decimal,
) -> Result<(), StoreError> {
    store.save(&VaultCollateralChangeLog {
        id: meta.audit_id(AuditSuffix::VaultCollateralChange),
        vault: vault.to_string(),
        collateral_before: before.clone(),
        collateral_after: after.clone(),
        collateral_diff: after - before,
        rate: rate.clone(),
        provenance: meta.provenance,
    })
}

pub fn vault_debt_change<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    vault: &str,
    before: &Decimal,
    after: &Decimal,
    rate: &Decimal,
) -> Result<(), StoreError> {
    store.save(&VaultDebtChangeLog {
        id: meta.audit_id(AuditSuffix::VaultDebtChange),
        vault: vault.to_string(),
        debt_before: before.clone(),
        debt_after: after.clone(),
        debt_diff: after - before,
        rate: rate.clone(),
        provenance: meta.provenance,
    })
}

/// Amounts moved between two vaults of the same collateral type.
pub struct Split<'a> {
    pub src: Address,
    pub dst: Address,
    /// The leg that existed when the split was applied
    pub vault: &'a str,
    pub collateral: &'a Decimal,
    pub debt: &'a Decimal,
    pub rate: &'a Decimal,
}

pub fn vault_split<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    split: &Split<'_>,
) -> Result<(), StoreError> {
    store.save(&VaultSplitChangeLog {
        id: meta.audit_id(AuditSuffix::VaultSplitChange),
        src: split.src,
        dst: split.dst,
        vault: split.vault.to_string(),
        collateral_to_move: split.collateral.clone(),
        debt_to_move: split.debt.clone(),
        rate: split.rate.clone(),
        provenance: meta.provenance,
    })
}

/// One leg of a collateral transfer. `collateral` is the balance row of the
/// side named by `direction`.
pub fn collateral_transfer<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    (src, dst): (Address, Address),
    collateral: &str,
    amount: &Decimal,
    direction: TransferDirection,
) -> Result<(), StoreError> {
    let suffix = match direction {
        TransferDirection::Out => AuditSuffix::TransferOut,
        TransferDirection::In => AuditSuffix::TransferIn,
    };
    store.save(&CollateralTransferLog {
        id: meta.audit_id(suffix),
        src,
        dst,
        collateral: collateral.to_string(),
        amount: amount.clone(),
        direction,
        provenance: meta.provenance,
    })
}

pub fn dai_move<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    src: Address,
    dst: Address,
    amount: &Decimal,
) -> Result<(), StoreError> {
    store.save(&DaiMoveLog {
        id: meta.audit_id(AuditSuffix::DaiMove),
        src,
        dst,
        amount: amount.clone(),
        provenance: meta.provenance,
    })
}

/// The emitting contract was caged.
pub fn live_change<S: EntityStore>(store: &mut S, meta: &EventMeta) -> Result<(), StoreError> {
    store.save(&LiveChangeLog {
        id: meta.audit_id(AuditSuffix::LiveChange),
        contract: meta.address,
        provenance: meta.provenance,
    })
}

/// `key2` is the collateral type for per-collateral parameters, empty otherwise.
pub fn parameter_change<S: EntityStore>(
    store: &mut S,
    meta: &EventMeta,
    contract_type: &str,
    key1: &str,
    key2: &str,
    value: ParameterValue,
) -> Result<(), StoreError> {
    store.save(&ProtocolParameterChangeLog {
        id: meta.audit_id(AuditSuffix::ParameterChange),
        contract_type: contract_type.to_string(),
        parameter_key1: key1.to_string(),
        parameter_key2: key2.to_string(),
        parameter_value: value,
        provenance: meta.provenance,
    })
}
