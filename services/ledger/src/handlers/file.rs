//! Generic `file` parameter updates
//!
//! One handler for every contract: the parameter table decides the unit and
//! the field, this module performs the write and logs the change.

use contracts::events::FileParam;
use persistence::EntityStore;
use tracing::debug;
use types::audit::ParameterValue;
use types::numeric::Decimal;
use types::system::SystemState;
use types::vault::CollateralType;

use super::{collateral_type, unknown_ilk, HandlerResult};
use crate::audit;
use crate::context::{Ctx, Outcome, SkipReason};
use crate::params::{self, ParamTarget};

pub fn file<S: EntityStore>(ctx: &mut Ctx<'_, S>, param: &FileParam) -> HandlerResult {
    let unrecognized = || {
        Outcome::Skipped(SkipReason::UnrecognizedParameter {
            contract: param.contract.label(),
            what: param.what.clone(),
        })
    };

    let Some(spec) = params::lookup(param.contract, &param.what, param.ilk.is_some()) else {
        return Ok(unrecognized());
    };
    let Some(value) = params::scale_value(spec.unit, &param.value) else {
        return Ok(unrecognized());
    };

    match &param.ilk {
        Some(ilk) => {
            let Some(mut collateral) = collateral_type(ctx, ilk)? else {
                return Ok(unknown_ilk(ilk));
            };
            if let Some(amount) = numeric(&value) {
                apply_to_collateral_type(&mut collateral, spec.target, amount);
            }
            collateral.touch(ctx.provenance());
            ctx.store.save(&collateral)?;
        }
        None => {
            let at = ctx.provenance();
            let system = ctx.system_mut();
            apply_to_system(system, spec.target, &value);
            system.touch(at);
        }
    }

    debug!(
        contract = param.contract.label(),
        what = %param.what,
        ilk = param.ilk.as_deref().unwrap_or(""),
        "Parameter updated"
    );

    audit::parameter_change(
        ctx.store,
        &ctx.meta,
        param.contract.label(),
        &param.what,
        param.ilk.as_deref().unwrap_or(""),
        value,
    )?;
    Ok(Outcome::Applied)
}

fn numeric(value: &ParameterValue) -> Option<&Decimal> {
    match value {
        ParameterValue::Decimal(amount) | ParameterValue::Integer(amount) => Some(amount),
        ParameterValue::Address(_) => None,
    }
}

fn apply_to_collateral_type(collateral: &mut CollateralType, target: ParamTarget, amount: &Decimal) {
    let field = match target {
        ParamTarget::DebtCeiling => &mut collateral.debt_ceiling,
        ParamTarget::VaultDebtFloor => &mut collateral.vault_debt_floor,
        ParamTarget::StabilityFee => &mut collateral.stability_fee,
        ParamTarget::LiquidationRatio => &mut collateral.liquidation_ratio,
        ParamTarget::LiquidationPenalty => &mut collateral.liquidation_penalty,
        ParamTarget::LiquidationLotSize => &mut collateral.liquidation_lot_size,
        // Spot prices live on `CollateralPrice`; the file call is only logged.
        _ => return,
    };
    *field = amount.clone();
}

fn apply_to_system(system: &mut SystemState, target: ParamTarget, value: &ParameterValue) {
    if let ParameterValue::Address(address) = value {
        let field = match target {
            ParamTarget::JugVow => &mut system.jug_vow_contract,
            ParamTarget::PotVow => &mut system.pot_vow_contract,
            ParamTarget::SaleSpotter => &mut system.sale_auction_spotter_contract,
            ParamTarget::SaleDog => &mut system.sale_auction_dog_contract,
            ParamTarget::SaleVow => &mut system.sale_auction_vow_contract,
            ParamTarget::SaleCalc => &mut system.sale_auction_calc_contract,
            _ => return,
        };
        *field = Some(*address);
        return;
    }

    let Some(amount) = numeric(value) else {
        return;
    };
    let field = match target {
        ParamTarget::TotalDebtCeiling => &mut system.total_debt_ceiling,
        ParamTarget::BaseStabilityFee => &mut system.base_stability_fee,
        ParamTarget::SavingsRate => &mut system.savings_rate,
        ParamTarget::Par => &mut system.par,
        ParamTarget::SaleStartingPriceFactor => &mut system.sale_auction_starting_price_factor,
        ParamTarget::SaleResetTime => &mut system.sale_auction_reset_time,
        ParamTarget::SaleDropPercentage => &mut system.sale_auction_drop_percentage,
        ParamTarget::SaleDaiToRaisePercentage => &mut system.sale_auction_dai_to_raise_percentage,
        ParamTarget::SaleFlatFee => &mut system.sale_auction_flat_fee,
        ParamTarget::DebtMinimumBidIncrease => &mut system.debt_auction_minimum_bid_increase,
        ParamTarget::DebtLotSizeIncrease => &mut system.debt_auction_lot_size_increase,
        ParamTarget::DebtBidDuration => &mut system.debt_auction_bid_duration,
        ParamTarget::DebtDuration => &mut system.debt_auction_duration,
        _ => return,
    };
    *field = amount.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NoChain;
    use crate::config::LedgerConfig;
    use crate::context::EventMeta;
    use contracts::envelope::ContractKind;
    use contracts::events::FileValue;
    use num_bigint::BigUint;
    use persistence::MemoryStore;
    use std::str::FromStr;
    use types::audit::{AuditSuffix, ProtocolParameterChangeLog};
    use types::entity::{EntityKind, Provenance};
    use types::ids::{Address, TxHash};

    fn meta() -> EventMeta {
        EventMeta {
            provenance: Provenance::new(7, 70, TxHash::new([0x42; 32])),
            log_index: 1,
            address: Address::ZERO,
            transaction_from: Address::ZERO,
        }
    }

    fn ray(text: &str) -> FileValue {
        FileValue::Uint(BigUint::from_str(text).unwrap())
    }

    fn run(store: &mut MemoryStore, system: &mut SystemState, param: FileParam) -> Outcome {
        let config = LedgerConfig::default();
        let mut ctx = Ctx::new(store, system, meta(), &config, &NoChain);
        file(&mut ctx, &param).unwrap()
    }

    #[test]
    fn test_liquidation_ratio_written_and_logged() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        store.save(&CollateralType::new("ETH-A", meta().provenance)).unwrap();

        // 1.5 as ray
        let outcome = run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Spot,
                ilk: Some("ETH-A".into()),
                what: "mat".into(),
                value: ray(&format!("15{}", "0".repeat(26))),
            },
        );
        assert!(outcome.is_applied());

        let collateral: CollateralType = store.load("ETH-A").unwrap().unwrap();
        assert_eq!(collateral.liquidation_ratio, Decimal::from_str("1.5").unwrap());

        let log: ProtocolParameterChangeLog = store
            .load(&meta().audit_id(AuditSuffix::ParameterChange))
            .unwrap()
            .unwrap();
        assert_eq!(log.contract_type, "SPOT");
        assert_eq!(log.parameter_key1, "mat");
        assert_eq!(log.parameter_key2, "ETH-A");
    }

    #[test]
    fn test_unknown_ilk_skips_without_log() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let outcome = run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Vat,
                ilk: Some("NOPE-A".into()),
                what: "line".into(),
                value: ray("1"),
            },
        );
        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::UnknownCollateralType("NOPE-A".into()))
        );
        assert_eq!(store.count(EntityKind::ProtocolParameterChangeLog), 0);
    }

    #[test]
    fn test_unrecognized_key_is_silent() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let before = system.clone();
        let outcome = run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Pot,
                ilk: None,
                what: "wut".into(),
                value: ray("1"),
            },
        );
        assert!(matches!(
            outcome,
            Outcome::Skipped(SkipReason::UnrecognizedParameter { contract: "POT", .. })
        ));
        assert_eq!(system, before);
        assert_eq!(store.total_rows(), 0);
    }

    #[test]
    fn test_address_parameter() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let vow = Address::new([0x77; 20]);
        run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Clipper,
                ilk: None,
                what: "vow".into(),
                value: FileValue::Address(vow),
            },
        );
        assert_eq!(system.sale_auction_vow_contract, Some(vow));
        assert!(system.jug_vow_contract.is_none());
    }

    #[test]
    fn test_par_logged_as_raw_integer() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        let raw = format!("1{}", "0".repeat(27));
        run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Spot,
                ilk: None,
                what: "par".into(),
                value: ray(&raw),
            },
        );
        let expected = Decimal::from_str(&raw).unwrap();
        assert_eq!(system.par, expected);
        let log: ProtocolParameterChangeLog = store
            .load(&meta().audit_id(AuditSuffix::ParameterChange))
            .unwrap()
            .unwrap();
        assert_eq!(log.contract_type, "SPOT");
        assert_eq!(log.parameter_key2, "");
        assert_eq!(log.parameter_value, ParameterValue::Integer(expected));
    }

    #[test]
    fn test_integer_parameter_keeps_raw_seconds() {
        let mut store = MemoryStore::new();
        let mut system = SystemState::new();
        run(
            &mut store,
            &mut system,
            FileParam {
                contract: ContractKind::Flop,
                ilk: None,
                what: "ttl".into(),
                value: FileValue::Uint(BigUint::from(10_800u32)),
            },
        );
        assert_eq!(system.debt_auction_bid_duration, Decimal::from(10_800i64));
        let log: ProtocolParameterChangeLog = store
            .load(&meta().audit_id(AuditSuffix::ParameterChange))
            .unwrap()
            .unwrap();
        assert_eq!(log.parameter_value, ParameterValue::Integer(Decimal::from(10_800i64)));
    }
}
