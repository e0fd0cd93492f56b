//! Sale (collateral) and debt auction lifecycle

use contracts::events::{DebtKick, SaleKick, SaleTake};
use num_bigint::BigUint;
use persistence::EntityStore;
use tracing::debug;
use types::auction::{DebtAuction, SaleAuction};
use types::ids;
use types::numeric::{Decimal, Scale};

use super::HandlerResult;
use crate::context::{Ctx, Outcome, SkipReason};
use crate::entities::get_or_create_user;
use crate::errors::LedgerError;

// ── Sale auctions ───────────────────────────────────────────────────

/// Sale auctions are scoped to the auction house that emitted the event.
fn sale_id<S: EntityStore>(ctx: &Ctx<'_, S>, auction: &BigUint) -> String {
    ids::sale_auction_id(&auction.to_string(), &ctx.meta.address)
}

fn load_sale<S: EntityStore>(
    ctx: &Ctx<'_, S>,
    auction: &BigUint,
) -> Result<Result<SaleAuction, Outcome>, LedgerError> {
    let id = sale_id(ctx, auction);
    Ok(match ctx.store.load::<SaleAuction>(&id)? {
        Some(sale) => Ok(sale),
        None => Err(Outcome::Skipped(SkipReason::MissingAuction(id))),
    })
}

/// `Kick`: start (or restart) a sale auction.
pub fn sale_kick<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &SaleKick) -> HandlerResult {
    let id = sale_id(ctx, &event.id);
    let timestamp = ctx.meta.timestamp();
    let mut sale = ctx
        .store
        .load::<SaleAuction>(&id)?
        .unwrap_or_else(|| SaleAuction::new(id, timestamp));

    sale.amount_dai_to_raise = Decimal::from_raw_unsigned(&event.tab, Scale::Rad);
    sale.amount_collateral_to_sell = Decimal::from_raw_unsigned(&event.lot, Scale::Wad);
    sale.user_excess_collateral = event.usr;
    sale.user_incentives = event.kpr;
    sale.starting_price = Decimal::from_raw_unsigned(&event.top, Scale::Ray);
    sale.is_active = true;
    sale.user_taker = None;

    debug!(auction = %sale.id, tab = %sale.amount_dai_to_raise, "Sale auction started");
    ctx.store.save(&sale)?;
    Ok(Outcome::Applied)
}

/// `Take`: a bidder bought part or all of the lot.
pub fn sale_take<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &SaleTake) -> HandlerResult {
    let mut sale = match load_sale(ctx, &event.id)? {
        Ok(sale) => sale,
        Err(skip) => return Ok(skip),
    };
    let timestamp = ctx.meta.timestamp();
    let tab = Decimal::from_raw_unsigned(&event.tab, Scale::Rad);
    let lot = Decimal::from_raw_unsigned(&event.lot, Scale::Wad);

    if lot.is_zero() || tab.is_zero() {
        sale.is_active = false;
    } else {
        sale.amount_dai_to_raise = tab;
        sale.amount_collateral_to_sell = lot;
    }

    let taker = get_or_create_user(ctx.store, ctx.meta.transaction_from)?;
    sale.user_taker = Some(taker.address);
    sale.bought_at = Some(timestamp);
    sale.updated_at = Some(timestamp);
    ctx.store.save(&sale)?;
    Ok(Outcome::Applied)
}

/// `Redo`: restart the price curve of a stale auction.
pub fn sale_redo<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &SaleKick) -> HandlerResult {
    let mut sale = match load_sale(ctx, &event.id)? {
        Ok(sale) => sale,
        Err(skip) => return Ok(skip),
    };
    let timestamp = ctx.meta.timestamp();
    sale.starting_price = Decimal::from_raw_unsigned(&event.top, Scale::Ray);
    sale.reseted_at = Some(timestamp);
    sale.updated_at = Some(timestamp);
    ctx.store.save(&sale)?;
    Ok(Outcome::Applied)
}

/// `Yank`: the auction was cancelled.
pub fn sale_yank<S: EntityStore>(ctx: &mut Ctx<'_, S>, auction: &BigUint) -> HandlerResult {
    let mut sale = match load_sale(ctx, auction)? {
        Ok(sale) => sale,
        Err(skip) => return Ok(skip),
    };
    sale.is_active = false;
    sale.deleted_at = Some(ctx.meta.timestamp());
    ctx.store.save(&sale)?;
    Ok(Outcome::Applied)
}

// ── Debt auctions ───────────────────────────────────────────────────

/// Flop `Kick`: start a debt auction. Lot and bid are kept as raw integers.
pub fn debt_kick<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &DebtKick) -> HandlerResult {
    let id = ids::debt_auction_id(&event.id.to_string());
    let timestamp = ctx.meta.timestamp();
    let mut auction = ctx
        .store
        .load::<DebtAuction>(&id)?
        .unwrap_or_else(|| DebtAuction::new(id, timestamp));

    auction.quantity = Decimal::from_biguint(&event.lot);
    auction.bid_amount = Decimal::from_biguint(&event.bid);
    auction.highest_bidder = event.gal;
    auction.end_time_at = Decimal::from(timestamp) + &ctx.system().debt_auction_bid_duration;
    auction.active = true;
    auction.updated_at = Some(timestamp);

    ctx.store.save(&auction)?;
    Ok(Outcome::Applied)
}

/// `deal(id)`: the debt auction settled.
pub fn debt_deal<S: EntityStore>(ctx: &mut Ctx<'_, S>, auction: &BigUint) -> HandlerResult {
    let id = ids::debt_auction_id(&auction.to_string());
    let Some(mut debt) = ctx.store.load::<DebtAuction>(&id)? else {
        return Ok(Outcome::Skipped(SkipReason::MissingAuction(id)));
    };
    let timestamp = ctx.meta.timestamp();
    debt.active = false;
    debt.deleted_at = Some(timestamp);
    debt.updated_at = Some(timestamp);
    ctx.store.save(&debt)?;
    Ok(Outcome::Applied)
}
