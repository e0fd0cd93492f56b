//! Protocol parameter table
//!
//! Every `file` key the ledger understands, with its unit and the field it
//! writes. Keys not listed here are ignored without a change log.

use contracts::envelope::ContractKind;
use contracts::events::FileValue;
use types::audit::ParameterValue;
use types::numeric::{Decimal, Scale};

/// How the raw value of a parameter is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUnit {
    Wad,
    Ray,
    Rad,
    /// Plain integer, e.g. seconds
    Integer,
    Address,
}

/// Field a parameter update writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamTarget {
    // ── Per collateral type ──
    /// Recorded in the change log only
    SpotPrice,
    DebtCeiling,
    VaultDebtFloor,
    StabilityFee,
    LiquidationRatio,
    LiquidationPenalty,
    LiquidationLotSize,

    // ── System state ──
    TotalDebtCeiling,
    BaseStabilityFee,
    JugVow,
    SavingsRate,
    PotVow,
    Par,
    SaleStartingPriceFactor,
    SaleResetTime,
    SaleDropPercentage,
    SaleDaiToRaisePercentage,
    SaleFlatFee,
    SaleSpotter,
    SaleDog,
    SaleVow,
    SaleCalc,
    DebtMinimumBidIncrease,
    DebtLotSizeIncrease,
    DebtBidDuration,
    DebtDuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub contract: ContractKind,
    pub what: &'static str,
    /// Keyed by collateral type
    pub per_ilk: bool,
    pub unit: ParamUnit,
    pub target: ParamTarget,
}

const fn global(contract: ContractKind, what: &'static str, unit: ParamUnit, target: ParamTarget) -> ParamSpec {
    ParamSpec {
        contract,
        what,
        per_ilk: false,
        unit,
        target,
    }
}

const fn ilk(contract: ContractKind, what: &'static str, unit: ParamUnit, target: ParamTarget) -> ParamSpec {
    ParamSpec {
        contract,
        what,
        per_ilk: true,
        unit,
        target,
    }
}

use ContractKind::{Clipper, Dog, Flop, Jug, Pot, Spot, Vat};
use ParamTarget as T;
use ParamUnit as U;

pub const PARAMETERS: &[ParamSpec] = &[
    global(Vat, "Line", U::Rad, T::TotalDebtCeiling),
    ilk(Vat, "spot", U::Ray, T::SpotPrice),
    ilk(Vat, "line", U::Rad, T::DebtCeiling),
    ilk(Vat, "dust", U::Rad, T::VaultDebtFloor),
    ilk(Jug, "duty", U::Ray, T::StabilityFee),
    global(Jug, "base", U::Ray, T::BaseStabilityFee),
    global(Jug, "vow", U::Address, T::JugVow),
    global(Pot, "dsr", U::Ray, T::SavingsRate),
    global(Pot, "vow", U::Address, T::PotVow),
    ilk(Spot, "mat", U::Ray, T::LiquidationRatio),
    global(Spot, "par", U::Integer, T::Par),
    ilk(Dog, "chop", U::Wad, T::LiquidationPenalty),
    ilk(Dog, "hole", U::Rad, T::LiquidationLotSize),
    global(Clipper, "buf", U::Ray, T::SaleStartingPriceFactor),
    global(Clipper, "tail", U::Integer, T::SaleResetTime),
    global(Clipper, "cusp", U::Ray, T::SaleDropPercentage),
    global(Clipper, "chip", U::Wad, T::SaleDaiToRaisePercentage),
    global(Clipper, "tip", U::Rad, T::SaleFlatFee),
    global(Clipper, "spotter", U::Address, T::SaleSpotter),
    global(Clipper, "dog", U::Address, T::SaleDog),
    global(Clipper, "vow", U::Address, T::SaleVow),
    global(Clipper, "calc", U::Address, T::SaleCalc),
    global(Flop, "beg", U::Wad, T::DebtMinimumBidIncrease),
    global(Flop, "pad", U::Wad, T::DebtLotSizeIncrease),
    global(Flop, "ttl", U::Integer, T::DebtBidDuration),
    global(Flop, "tau", U::Integer, T::DebtDuration),
];

/// Find the spec for a `file` call.
pub fn lookup(contract: ContractKind, what: &str, per_ilk: bool) -> Option<&'static ParamSpec> {
    PARAMETERS
        .iter()
        .find(|p| p.contract == contract && p.what == what && p.per_ilk == per_ilk)
}

/// Scale a raw `file` value according to its unit. `None` when the value
/// shape does not match the unit.
pub fn scale_value(unit: ParamUnit, value: &FileValue) -> Option<ParameterValue> {
    match (unit, value) {
        (ParamUnit::Wad, FileValue::Uint(raw)) => {
            Some(ParameterValue::Decimal(Decimal::from_raw_unsigned(raw, Scale::Wad)))
        }
        (ParamUnit::Ray, FileValue::Uint(raw)) => {
            Some(ParameterValue::Decimal(Decimal::from_raw_unsigned(raw, Scale::Ray)))
        }
        (ParamUnit::Rad, FileValue::Uint(raw)) => {
            Some(ParameterValue::Decimal(Decimal::from_raw_unsigned(raw, Scale::Rad)))
        }
        (ParamUnit::Integer, FileValue::Uint(raw)) => {
            Some(ParameterValue::Integer(Decimal::from_biguint(raw)))
        }
        (ParamUnit::Address, FileValue::Address(addr)) => Some(ParameterValue::Address(*addr)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use std::str::FromStr;
    use types::ids::Address;

    #[test]
    fn test_lookup_respects_contract_and_arity() {
        assert_eq!(lookup(Vat, "line", true).unwrap().target, T::DebtCeiling);
        assert!(lookup(Vat, "line", false).is_none());
        assert_eq!(lookup(Vat, "Line", false).unwrap().target, T::TotalDebtCeiling);
        assert!(lookup(Jug, "line", true).is_none());
        assert!(lookup(Vat, "pip", true).is_none());
    }

    #[test]
    fn test_vow_is_distinct_per_contract() {
        assert_eq!(lookup(Jug, "vow", false).unwrap().target, T::JugVow);
        assert_eq!(lookup(Pot, "vow", false).unwrap().target, T::PotVow);
        assert_eq!(lookup(Clipper, "vow", false).unwrap().target, T::SaleVow);
    }

    #[test]
    fn test_scale_wad() {
        let raw = BigUint::from_str("100000000000000000000").unwrap();
        assert_eq!(
            scale_value(U::Wad, &FileValue::Uint(raw)),
            Some(ParameterValue::Decimal(Decimal::from(100i64)))
        );
    }

    #[test]
    fn test_scale_integer_keeps_raw() {
        assert_eq!(
            scale_value(U::Integer, &FileValue::Uint(BigUint::from(60u8))),
            Some(ParameterValue::Integer(Decimal::from(60i64)))
        );
    }

    #[test]
    fn test_shape_mismatch() {
        assert_eq!(scale_value(U::Ray, &FileValue::Address(Address::ZERO)), None);
        assert_eq!(scale_value(U::Address, &FileValue::Uint(BigUint::from(1u8))), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, a) in PARAMETERS.iter().enumerate() {
            for b in &PARAMETERS[i + 1..] {
                assert!(!(a.contract == b.contract && a.what == b.what && a.per_ilk == b.per_ilk));
            }
        }
    }
}
