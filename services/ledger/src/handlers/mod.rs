//! Per-contract event handlers
//!
//! Each handler applies one typed event through a [`Ctx`]. A handler either
//! applies the event completely or returns a skip before its first write.

pub mod auctions;
pub mod file;
pub mod jug;
pub mod pot;
pub mod registry;
pub mod spot;
pub mod vat;

use persistence::EntityStore;
use tracing::warn;
use types::vault::CollateralType;

use crate::context::{Ctx, Outcome, SkipReason};
use crate::errors::LedgerError;

pub type HandlerResult = Result<Outcome, LedgerError>;

/// Load a collateral type, or `None` with a warning when it is not registered.
pub(crate) fn collateral_type<S: EntityStore>(
    ctx: &Ctx<'_, S>,
    ilk: &str,
) -> Result<Option<CollateralType>, LedgerError> {
    let found = ctx.store.load::<CollateralType>(ilk)?;
    if found.is_none() {
        warn!(
            ilk,
            block = ctx.meta.block_number(),
            log_index = ctx.meta.log_index,
            "Unknown collateral type"
        );
    }
    Ok(found)
}

pub(crate) fn unknown_ilk(ilk: &str) -> Outcome {
    Outcome::Skipped(SkipReason::UnknownCollateralType(ilk.to_string()))
}
