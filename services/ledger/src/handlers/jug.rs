//! Stability fee collection
//!
//! `init` and `drip` only stamp the collateral type. The rate change itself
//! arrives through `fold` on the core contract.

use persistence::EntityStore;
use types::numeric::Decimal;

use super::{collateral_type, unknown_ilk, HandlerResult};
use crate::context::{Ctx, Outcome};

/// `init(ilk)`: start fee collection with a neutral fee.
pub fn init<S: EntityStore>(ctx: &mut Ctx<'_, S>, ilk: &str) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, ilk)? else {
        return Ok(unknown_ilk(ilk));
    };
    collateral.stability_fee = Decimal::one();
    collateral.stability_fee_updated_at = Some(ctx.meta.timestamp());
    collateral.touch(ctx.provenance());
    ctx.store.save(&collateral)?;
    Ok(Outcome::Applied)
}

/// `drip(ilk)`: fees were collected for the collateral type.
pub fn drip<S: EntityStore>(ctx: &mut Ctx<'_, S>, ilk: &str) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, ilk)? else {
        return Ok(unknown_ilk(ilk));
    };
    collateral.stability_fee_updated_at = Some(ctx.meta.timestamp());
    collateral.touch(ctx.provenance());
    ctx.store.save(&collateral)?;
    Ok(Outcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{Harness, TIMESTAMP};
    use std::str::FromStr;
    use types::vault::CollateralType;

    #[test]
    fn test_init_resets_fee() {
        let mut h = Harness::new();
        h.register("ETH-A");
        let mut ilk: CollateralType = h.store.load("ETH-A").unwrap().unwrap();
        ilk.stability_fee = Decimal::from_str("1.05").unwrap();
        h.store.save(&ilk).unwrap();

        assert!(h.apply(1, |ctx| init(ctx, "ETH-A")).is_applied());
        let ilk: CollateralType = h.store.load("ETH-A").unwrap().unwrap();
        assert_eq!(ilk.stability_fee, Decimal::one());
        assert_eq!(ilk.stability_fee_updated_at, Some(TIMESTAMP));
    }

    #[test]
    fn test_drip_stamps_only() {
        let mut h = Harness::new();
        h.register("ETH-A");
        h.apply(1, |ctx| drip(ctx, "ETH-A"));
        let ilk: CollateralType = h.store.load("ETH-A").unwrap().unwrap();
        assert_eq!(ilk.stability_fee_updated_at, Some(TIMESTAMP));
        assert_eq!(ilk.rate, Decimal::one());
    }

    #[test]
    fn test_unknown_ilk() {
        let mut h = Harness::new();
        assert!(!h.apply(1, |ctx| drip(ctx, "NOPE-A")).is_applied());
    }
}
