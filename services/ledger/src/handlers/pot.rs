//! Savings contract handlers

use num_bigint::BigInt;
use persistence::EntityStore;
use tracing::{debug, warn};
use types::numeric::{Decimal, Scale};
use types::system::ChainLog;

use super::HandlerResult;
use crate::audit;
use crate::context::{Ctx, Outcome};
use crate::entities::get_or_create_user;

/// `join(wad)`: the transaction sender deposits into savings.
pub fn join<S: EntityStore>(ctx: &mut Ctx<'_, S>, wad: &BigInt) -> HandlerResult {
    adjust_savings(ctx, Decimal::from_wad(wad))
}

/// `exit(wad)`: the transaction sender withdraws from savings.
pub fn exit<S: EntityStore>(ctx: &mut Ctx<'_, S>, wad: &BigInt) -> HandlerResult {
    adjust_savings(ctx, -Decimal::from_wad(wad))
}

fn adjust_savings<S: EntityStore>(ctx: &mut Ctx<'_, S>, delta: Decimal) -> HandlerResult {
    let mut user = get_or_create_user(ctx.store, ctx.meta.transaction_from)?;
    user.savings += &delta;
    ctx.store.save(&user)?;

    let at = ctx.provenance();
    let system = ctx.system_mut();
    system.total_savings_in_pot += &delta;
    system.touch(at);
    Ok(Outcome::Applied)
}

/// `cage()`: savings stop accruing.
pub fn cage<S: EntityStore>(ctx: &mut Ctx<'_, S>) -> HandlerResult {
    let at = ctx.provenance();
    let system = ctx.system_mut();
    system.savings_rate = Decimal::one();
    system.touch(at);
    audit::live_change(ctx.store, &ctx.meta)?;
    Ok(Outcome::Applied)
}

/// `drip()`: refresh the savings accumulator from the contract itself.
///
/// The contract address comes from the chain log, or the configured
/// fallback. A failed read keeps the previous accumulator.
pub fn drip<S: EntityStore>(ctx: &mut Ctx<'_, S>) -> HandlerResult {
    let pot = ctx
        .store
        .load::<ChainLog>(&ctx.config.pot_registry_key)?
        .map(|entry| entry.address)
        .unwrap_or(ctx.config.pot_fallback_address);

    let block = ctx.meta.block_number();
    let chi = match ctx.chain.pot_chi(&pot, block) {
        Ok(raw) => Some(Decimal::from_raw_unsigned(&raw, Scale::Ray)),
        Err(e) => {
            warn!(pot = %pot, block, error = %e, "Savings accumulator read failed, keeping previous value");
            None
        }
    };

    let at = ctx.provenance();
    let system = ctx.system_mut();
    if let Some(chi) = chi {
        debug!(pot = %pot, chi = %chi, "Savings accumulator refreshed");
        system.rate_accumulator = chi;
    }
    system.last_pot_drip_at = Some(at.timestamp);
    system.touch(at);
    Ok(Outcome::Applied)
}
