//! Price feed updates

use contracts::envelope::ContractKind;
use contracts::events::{FilePip, Poke};
use persistence::EntityStore;
use tracing::debug;
use types::audit::ParameterValue;
use types::entity::EntityKind;
use types::numeric::{Decimal, Scale};
use types::vault::{CollateralPrice, CollateralType};

use super::{collateral_type, unknown_ilk, HandlerResult};
use crate::audit;
use crate::context::{Ctx, Outcome};
use crate::errors::LedgerError;

/// `Poke(ilk, val, spot)`: record a price snapshot and point the collateral
/// type at it.
pub fn poke<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Poke) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    record_price(
        ctx,
        &mut collateral,
        Decimal::from_raw_unsigned(&event.val, Scale::Wad),
        Decimal::from_raw_unsigned(&event.spot, Scale::Ray),
    )?;
    Ok(Outcome::Applied)
}

/// `file(ilk, "pip", data)`: a new price source. Its reading is recorded
/// like a poke without a spot price, then logged as a parameter change.
pub fn file_pip<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &FilePip) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let value = Decimal::from_raw_unsigned(&event.val, Scale::Wad);
    record_price(ctx, &mut collateral, value.clone(), Decimal::zero())?;

    audit::parameter_change(
        ctx.store,
        &ctx.meta,
        ContractKind::Spot.label(),
        "pip",
        &event.ilk,
        ParameterValue::Decimal(value),
    )?;
    Ok(Outcome::Applied)
}

fn record_price<S: EntityStore>(
    ctx: &mut Ctx<'_, S>,
    collateral: &mut CollateralType,
    value: Decimal,
    spot_price: Decimal,
) -> Result<(), LedgerError> {
    let at = ctx.provenance();
    let price = CollateralPrice::new(&collateral.id, at, value, spot_price);

    // Snapshots are immutable; a second write in the same block keeps the first.
    if !ctx.store.exists(EntityKind::CollateralPrice, &price.id)? {
        debug!(ilk = %collateral.id, value = %price.value, "Price recorded");
        ctx.store.save(&price)?;
    }

    collateral.price = Some(price.id);
    collateral.touch(at);
    ctx.store.save(&*collateral)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{meta, ray, wad, Harness, BLOCK};
    use num_bigint::BigUint;
    use std::str::FromStr;
    use types::audit::{AuditSuffix, ProtocolParameterChangeLog};

    fn poke_event(value: i64) -> Poke {
        Poke {
            ilk: "ETH-A".into(),
            val: wad(value).to_biguint().unwrap(),
            spot: ray(value).to_biguint().unwrap(),
        }
    }

    #[test]
    fn test_poke_links_price() {
        let mut h = Harness::new();
        h.register("ETH-A");
        assert!(h.apply(1, |ctx| poke(ctx, &poke_event(2000))).is_applied());

        let ilk: CollateralType = h.store.load("ETH-A").unwrap().unwrap();
        let id = format!("{}-ETH-A", BLOCK);
        assert_eq!(ilk.price.as_deref(), Some(id.as_str()));
        let price: CollateralPrice = h.store.load(&id).unwrap().unwrap();
        assert_eq!(price.value, Decimal::from(2000i64));
        assert_eq!(price.spot_price, Decimal::from(2000i64));
    }

    #[test]
    fn test_price_snapshot_is_immutable() {
        let mut h = Harness::new();
        h.register("ETH-A");
        h.apply(1, |ctx| poke(ctx, &poke_event(2000)));
        h.apply(2, |ctx| poke(ctx, &poke_event(1)));
        let price: CollateralPrice = h.store.load(&format!("{}-ETH-A", BLOCK)).unwrap().unwrap();
        assert_eq!(price.value, Decimal::from(2000i64));
    }

    #[test]
    fn test_pip_records_reading_and_logs() {
        let mut h = Harness::new();
        h.register("c1");
        // 25165824 × 10^27 read as a wad
        let val = BigUint::from_str(&format!("25165824{}", "0".repeat(27))).unwrap();
        let event = FilePip { ilk: "c1".into(), val };
        assert!(h.apply(4, |ctx| file_pip(ctx, &event)).is_applied());

        let id = format!("{}-c1", BLOCK);
        let price: CollateralPrice = h.store.load(&id).unwrap().unwrap();
        let expected = Decimal::from_str("25165824000000000").unwrap();
        assert_eq!(price.value, expected);
        let ilk: CollateralType = h.store.load("c1").unwrap().unwrap();
        assert_eq!(ilk.price.as_deref(), Some(id.as_str()));

        let log: ProtocolParameterChangeLog = h
            .store
            .load(&meta(4).audit_id(AuditSuffix::ParameterChange))
            .unwrap()
            .unwrap();
        assert_eq!(log.contract_type, "SPOT");
        assert_eq!(log.parameter_key1, "pip");
        assert_eq!(log.parameter_key2, "c1");
        assert_eq!(log.parameter_value, ParameterValue::Decimal(expected));
    }

    #[test]
    fn test_pip_for_unknown_ilk_writes_nothing() {
        let mut h = Harness::new();
        let event = FilePip { ilk: "c1".into(), val: BigUint::from(7u8) };
        assert!(!h.apply(1, |ctx| file_pip(ctx, &event)).is_applied());
        assert_eq!(h.store.total_rows(), 0);
    }

    #[test]
    fn test_unknown_ilk() {
        let mut h = Harness::new();
        assert!(!h.apply(1, |ctx| poke(ctx, &poke_event(1))).is_applied());
        assert_eq!(h.store.total_rows(), 0);
    }
}
