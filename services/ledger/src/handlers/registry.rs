//! Chain-log registry of deployed contract addresses

use persistence::EntityStore;
use tracing::info;
use types::ids::Address;
use types::system::ChainLog;

use super::HandlerResult;
use crate::context::{Ctx, Outcome};

/// `UpdateAddress(key, addr)`: remember where a named contract lives.
pub fn update_address<S: EntityStore>(ctx: &mut Ctx<'_, S>, key: &str, address: Address) -> HandlerResult {
    ctx.store.save(&ChainLog {
        id: key.to_string(),
        address,
        updated: ctx.provenance(),
    })?;
    info!(key, address = %address, "Chain log entry updated");
    Ok(Outcome::Applied)
}
