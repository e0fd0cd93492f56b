//! Core accounting contract handlers
//!
//! Collateral registration, unlocked collateral and stablecoin balances,
//! vault adjustments, liquidation, system debt and rate accrual.

use contracts::events::{Flux, Fold, Fork, Frob, Grab, Heal, Move, Slip, Suck};
use persistence::EntityStore;
use tracing::{debug, info};
use types::account::User;
use types::audit::TransferDirection;
use types::entity::EntityKind;
use types::ids;
use types::numeric::{Decimal, Scale};
use types::vault::{CollateralPrice, CollateralType, Vault};

use super::{collateral_type, unknown_ilk, HandlerResult};
use crate::audit::{self, Split};
use crate::context::{Ctx, Outcome, SkipReason};
use crate::entities::{
    get_or_create_user, load_or_create_balance, load_or_create_system_debt, load_or_open_vault,
};
use crate::errors::LedgerError;
use crate::safety::{collateralization_ratio, safety_delta, SafetyInput};

// ── Registration and liveness ───────────────────────────────────────

/// `init(ilk)`: register a collateral type.
pub fn init<S: EntityStore>(ctx: &mut Ctx<'_, S>, ilk: &str) -> HandlerResult {
    if ctx.store.exists(EntityKind::CollateralType, ilk)? {
        return Ok(Outcome::Skipped(SkipReason::AlreadyRegistered(ilk.to_string())));
    }

    let at = ctx.provenance();
    ctx.store.save(&CollateralType::new(ilk, at))?;

    let system = ctx.system_mut();
    system.collateral_count += 1;
    system.touch(at);

    info!(
        ilk,
        collateral_count = system.collateral_count,
        block = at.block_number,
        "Collateral type registered"
    );
    Ok(Outcome::Applied)
}

/// `cage()`: record that the emitting contract was shut down.
pub fn cage<S: EntityStore>(ctx: &mut Ctx<'_, S>) -> HandlerResult {
    audit::live_change(ctx.store, &ctx.meta)?;
    Ok(Outcome::Applied)
}

// ── Balances ────────────────────────────────────────────────────────

/// `slip(ilk, usr, wad)`: adjust a user's unlocked collateral.
pub fn slip<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Slip) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let at = ctx.provenance();
    let wad = Decimal::from_wad(&event.wad);

    get_or_create_user(ctx.store, event.usr)?;
    let mut balance = load_or_create_balance(&*ctx.store, event.usr, &event.ilk, at)?;
    let before = balance.amount.clone();
    balance.amount += &wad;
    balance.touch(at);
    ctx.store.save(&balance)?;
    audit::collateral_change(ctx.store, &ctx.meta, &balance.id, &before, &balance.amount)?;

    if ctx.config.slip_updates_total_collateral {
        collateral.total_collateral += &wad;
    }
    collateral.touch(at);
    ctx.store.save(&collateral)?;
    Ok(Outcome::Applied)
}

/// `flux(ilk, src, dst, wad)`: move unlocked collateral between users.
pub fn flux<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Flux) -> HandlerResult {
    let at = ctx.provenance();
    let wad = Decimal::from_wad(&event.wad);

    get_or_create_user(ctx.store, event.src)?;
    get_or_create_user(ctx.store, event.dst)?;

    // Each side is loaded after the previous save so a self-transfer nets out.
    let mut src = load_or_create_balance(&*ctx.store, event.src, &event.ilk, at)?;
    src.amount -= &wad;
    src.touch(at);
    ctx.store.save(&src)?;

    let mut dst = load_or_create_balance(&*ctx.store, event.dst, &event.ilk, at)?;
    dst.amount += &wad;
    dst.touch(at);
    ctx.store.save(&dst)?;

    let parties = (event.src, event.dst);
    audit::collateral_transfer(ctx.store, &ctx.meta, parties, &src.id, &wad, TransferDirection::Out)?;
    audit::collateral_transfer(ctx.store, &ctx.meta, parties, &dst.id, &wad, TransferDirection::In)?;
    Ok(Outcome::Applied)
}

/// `move(src, dst, rad)`: move stablecoin between users.
pub fn move_dai<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Move) -> HandlerResult {
    let amount = Decimal::from_raw_unsigned(&event.rad, Scale::Rad);

    let mut src = get_or_create_user(ctx.store, event.src)?;
    src.total_vault_dai -= &amount;
    ctx.store.save(&src)?;

    let mut dst = get_or_create_user(ctx.store, event.dst)?;
    dst.total_vault_dai += &amount;
    ctx.store.save(&dst)?;

    audit::dai_move(ctx.store, &ctx.meta, event.src, event.dst, &amount)?;
    Ok(Outcome::Applied)
}

// ── Vaults ──────────────────────────────────────────────────────────

/// Oracle value of the collateral type's latest price, if any.
fn current_price<S: EntityStore>(
    ctx: &Ctx<'_, S>,
    collateral: &CollateralType,
) -> Result<Option<Decimal>, LedgerError> {
    let Some(price_id) = collateral.price.as_deref() else {
        return Ok(None);
    };
    Ok(ctx
        .store
        .load::<CollateralPrice>(price_id)?
        .map(|price| price.value))
}

/// `frob(ilk, u, v, w, dink, dart)`: lock or free collateral and draw or
/// wipe debt on the vault of `u`.
pub fn frob<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Frob) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let at = ctx.provenance();
    let dink = Decimal::from_wad(&event.dink);
    let dart = Decimal::from_wad(&event.dart);

    let (mut vault, opened) = load_or_open_vault(ctx, event.urn, &mut collateral)?;
    let price = current_price(ctx, &collateral)?;

    let ratio_before = if opened {
        Decimal::zero()
    } else {
        collateralization_ratio(&vault.collateral, &vault.debt, price.as_ref(), &collateral.rate)
    };

    let collateral_before = vault.collateral.clone();
    let debt_before = vault.debt.clone();
    vault.collateral += &dink;
    vault.debt += &dart;
    vault.touch(at);

    if !dink.is_zero() {
        audit::vault_collateral_change(
            ctx.store,
            &ctx.meta,
            &vault.id,
            &collateral_before,
            &vault.collateral,
            &collateral.rate,
        )?;
    }
    if !dart.is_zero() {
        audit::vault_debt_change(
            ctx.store,
            &ctx.meta,
            &vault.id,
            &debt_before,
            &vault.debt,
            &collateral.rate,
        )?;
    }

    // Collateral locked into the vault leaves the provider's unlocked balance.
    get_or_create_user(ctx.store, event.collateral_from)?;
    let mut balance = load_or_create_balance(&*ctx.store, event.collateral_from, &event.ilk, at)?;
    let balance_before = balance.amount.clone();
    balance.amount -= &dink;
    balance.touch(at);
    ctx.store.save(&balance)?;
    audit::collateral_change(ctx.store, &ctx.meta, &balance.id, &balance_before, &balance.amount)?;

    let mut receiver = get_or_create_user(ctx.store, event.dai_to)?;
    receiver.total_vault_dai += &(&collateral.rate * &dart);
    ctx.store.save(&receiver)?;

    collateral.total_collateral += &dink;
    collateral.debt_normalized += &dart;
    collateral.recompute_total_debt();
    collateral.touch(at);

    let ratio_after =
        collateralization_ratio(&vault.collateral, &vault.debt, price.as_ref(), &collateral.rate);
    let delta = safety_delta(&SafetyInput {
        liquidation_ratio: &collateral.liquidation_ratio,
        ratio_before: &ratio_before,
        ratio_after: &ratio_after,
        collateral: &vault.collateral,
        debt: &vault.debt,
    });
    vault.safety_level += &delta;

    debug!(
        vault = %vault.id,
        opened,
        ratio_before = %ratio_before,
        ratio_after = %ratio_after,
        safety_delta = %delta,
        "Vault adjusted"
    );

    ctx.store.save(&vault)?;
    ctx.store.save(&collateral)?;
    Ok(Outcome::Applied)
}

/// `fork(ilk, src, dst, dink, dart)`: move collateral and debt between vaults.
pub fn fork<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Fork) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let at = ctx.provenance();
    let dink = Decimal::from_wad(&event.dink);
    let dart = Decimal::from_wad(&event.dart);

    // The source leg may be absent when the split only moves value in.
    let src_id = ids::vault_id(&event.src, &event.ilk);
    let src_exists = match ctx.store.load::<Vault>(&src_id)? {
        Some(mut src) => {
            src.collateral -= &dink;
            src.debt -= &dart;
            src.touch(at);
            ctx.store.save(&src)?;
            true
        }
        None => false,
    };

    let (mut dst, opened) = load_or_open_vault(ctx, event.dst, &mut collateral)?;
    dst.collateral += &dink;
    dst.debt += &dart;
    dst.touch(at);
    ctx.store.save(&dst)?;
    if opened {
        ctx.store.save(&collateral)?;
    }

    let logged = if src_exists { src_id.as_str() } else { dst.id.as_str() };
    audit::vault_split(
        ctx.store,
        &ctx.meta,
        &Split {
            src: event.src,
            dst: event.dst,
            vault: logged,
            collateral: &dink,
            debt: &dart,
            rate: &collateral.rate,
        },
    )?;
    Ok(Outcome::Applied)
}

/// `grab(ilk, u, v, w, dink, dart)`: confiscate collateral and debt from the
/// vault of `u` into liquidation.
///
/// Deltas are conventionally negative, so subtracting them from the
/// liquidator's balance and the system debt adds to those.
pub fn grab<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Grab) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let at = ctx.provenance();
    let dink = Decimal::from_wad(&event.dink);
    let dart = Decimal::from_wad(&event.dart);

    get_or_create_user(ctx.store, event.liquidator)?;

    collateral.debt_normalized += &dart;
    collateral.recompute_total_debt();
    let debt_moved = &dart * &collateral.rate;

    let (mut vault, _) = load_or_open_vault(ctx, event.urn, &mut collateral)?;
    vault.collateral += &dink;
    vault.debt += &dart;
    vault.touch(at);
    ctx.store.save(&vault)?;

    let mut balance = load_or_create_balance(&*ctx.store, event.liquidator, &event.ilk, at)?;
    balance.amount -= &dink;
    balance.touch(at);
    ctx.store.save(&balance)?;

    let mut sin = load_or_create_system_debt(&*ctx.store, &event.settlement)?;
    sin.amount -= &debt_moved;
    ctx.store.save(&sin)?;

    let system = ctx.system_mut();
    system.total_system_debt -= &debt_moved;
    system.touch(at);

    collateral.touch(at);
    ctx.store.save(&collateral)?;
    Ok(Outcome::Applied)
}

// ── System debt ─────────────────────────────────────────────────────

/// `heal(rad)`: destroy matched stablecoin and system debt of the emitting
/// contract.
pub fn heal<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Heal) -> HandlerResult {
    let rad = Decimal::from_raw_unsigned(&event.rad, Scale::Rad);
    let holder = ctx.meta.address;

    if let Some(mut user) = ctx.store.load::<User>(&holder.to_hex())? {
        user.total_vault_dai -= &rad;
        ctx.store.save(&user)?;

        let mut sin = load_or_create_system_debt(&*ctx.store, &holder)?;
        sin.owner = Some(user.id.clone());
        sin.amount -= &rad;
        ctx.store.save(&sin)?;
    }

    let at = ctx.provenance();
    let system = ctx.system_mut();
    system.total_debt -= &rad;
    system.total_system_debt -= &rad;
    system.touch(at);
    Ok(Outcome::Applied)
}

/// `suck(u, v, rad)`: mint unbacked stablecoin to `v` against debt of `u`.
pub fn suck<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Suck) -> HandlerResult {
    let rad = Decimal::from_raw_unsigned(&event.rad, Scale::Rad);

    if let Some(debtor) = ctx.store.load::<User>(&event.debtor.to_hex())? {
        let mut sin = load_or_create_system_debt(&*ctx.store, &event.debtor)?;
        sin.owner = Some(debtor.id);
        sin.amount += &rad;
        ctx.store.save(&sin)?;
    }

    if let Some(mut recipient) = ctx.store.load::<User>(&event.recipient.to_hex())? {
        recipient.total_vault_dai += &rad;
        ctx.store.save(&recipient)?;
    }

    let at = ctx.provenance();
    let system = ctx.system_mut();
    system.total_debt += &rad;
    system.total_system_debt += &rad;
    system.touch(at);
    Ok(Outcome::Applied)
}

/// `fold(ilk, u, rate)`: change the debt multiplier and credit the
/// resulting stablecoin to `u`.
pub fn fold<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &Fold) -> HandlerResult {
    let Some(mut collateral) = collateral_type(ctx, &event.ilk)? else {
        return Ok(unknown_ilk(&event.ilk));
    };
    let at = ctx.provenance();
    let delta = Decimal::from_ray(&event.rate);
    let rad = &collateral.total_debt * &delta;

    collateral.rate += &delta;
    collateral.recompute_total_debt();
    collateral.touch(at);
    ctx.store.save(&collateral)?;

    let mut user = get_or_create_user(ctx.store, event.user)?;
    user.total_vault_dai += &rad;
    ctx.store.save(&user)?;

    let system = ctx.system_mut();
    system.total_debt += &rad;
    system.touch(at);
    Ok(Outcome::Applied)
}
