//! Ledger engine
//!
//! Owns the store, the chain reader and the system-state singleton, and
//! applies envelopes one at a time in stream order.

use contracts::envelope::LogEnvelope;
use contracts::events::LedgerEvent;
use contracts::router::route;
use persistence::snapshot::{Snapshot, SnapshotError};
use persistence::{EntityStore, MemoryStore};
use tracing::{debug, error, info, warn};
use types::system::{SystemState, SYSTEM_STATE_ID};

use crate::chain::ChainReader;
use crate::config::LedgerConfig;
use crate::context::{Ctx, EventMeta, Outcome, SkipReason};
use crate::errors::LedgerError;
use crate::handlers::{auctions, file, jug, pot, registry, spot, vat, HandlerResult};

/// Running counters over every envelope offered to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub applied: u64,
    pub skipped: u64,
    pub rejected: u64,
}

impl EngineStats {
    pub fn total(&self) -> u64 {
        self.applied + self.skipped + self.rejected
    }
}

pub struct LedgerEngine<S: EntityStore, R: ChainReader> {
    store: S,
    chain: R,
    config: LedgerConfig,
    /// Cached singleton, saved back whenever a handler touches it
    system: SystemState,
    last_position: Option<(u64, u64)>,
    stats: EngineStats,
}

impl<S: EntityStore, R: ChainReader> LedgerEngine<S, R> {
    pub fn new(store: S, chain: R) -> Result<Self, LedgerError> {
        Self::with_config(store, chain, LedgerConfig::default())
    }

    /// Build an engine over `store`, resuming from its system state if present.
    pub fn with_config(store: S, chain: R, config: LedgerConfig) -> Result<Self, LedgerError> {
        let system = store.load::<SystemState>(SYSTEM_STATE_ID)?;
        let resumed = system.is_some();
        let system = system.unwrap_or_default();

        info!(
            resumed,
            collateral_count = system.collateral_count,
            strict_ordering = config.strict_ordering,
            pot_registry_key = %config.pot_registry_key,
            "LedgerEngine initialized"
        );

        Ok(Self {
            store,
            chain,
            config,
            system,
            last_position: None,
            stats: EngineStats::default(),
        })
    }

    /// Apply one envelope.
    ///
    /// Unknown signatures and missing entities come back as
    /// [`Outcome::Skipped`]. Malformed payloads and store failures are errors
    /// and leave the stream position unchanged.
    pub fn process(&mut self, envelope: &LogEnvelope) -> Result<Outcome, LedgerError> {
        let (block, log_index) = envelope.position();

        if let Some((last_block, last_log)) = self.last_position {
            if (block, log_index) <= (last_block, last_log) {
                if self.config.strict_ordering {
                    self.stats.rejected += 1;
                    error!(last_block, last_log, block, log_index, "Event out of order, rejecting");
                    return Err(LedgerError::OutOfOrder {
                        last_block,
                        last_log,
                        block,
                        log_index,
                    });
                }
                warn!(last_block, last_log, block, log_index, "Event position regressed, possible replay");
            }
        }

        let event = match route(envelope) {
            Ok(Some(event)) => event,
            Ok(None) => {
                self.last_position = Some((block, log_index));
                self.stats.skipped += 1;
                debug!(source = %envelope.source, block, log_index, "No route for event");
                return Ok(Outcome::Skipped(SkipReason::UnknownSignature));
            }
            Err(source) => {
                self.stats.rejected += 1;
                error!(
                    source_contract = %envelope.source,
                    block,
                    log_index,
                    error = %source,
                    "Malformed event rejected"
                );
                return Err(LedgerError::Malformed {
                    block,
                    log_index,
                    source,
                });
            }
        };

        let meta = EventMeta::from_envelope(envelope);
        let result = {
            let mut ctx = Ctx::new(&mut self.store, &mut self.system, meta, &self.config, &self.chain);
            dispatch(&mut ctx, &event).map(|outcome| (outcome, ctx.system_touched()))
        };

        let (outcome, system_touched) = match result {
            Ok(done) => done,
            Err(e) => {
                self.stats.rejected += 1;
                error!(event = event.name(), block, log_index, error = %e, "Event failed");
                return Err(e);
            }
        };

        if system_touched {
            self.store.save(&self.system)?;
        }
        self.last_position = Some((block, log_index));

        match &outcome {
            Outcome::Applied => {
                self.stats.applied += 1;
                debug!(event = event.name(), block, log_index, "Event applied");
            }
            Outcome::Skipped(reason) => {
                self.stats.skipped += 1;
                debug!(event = event.name(), block, log_index, reason = %reason, "Event skipped");
            }
        }
        Ok(outcome)
    }

    /// Apply envelopes in order, stopping at the first error.
    pub fn process_batch<'e, I>(&mut self, envelopes: I) -> Result<Vec<Outcome>, LedgerError>
    where
        I: IntoIterator<Item = &'e LogEnvelope>,
    {
        envelopes
            .into_iter()
            .map(|envelope| self.process(envelope))
            .collect()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn system(&self) -> &SystemState {
        &self.system
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// `(block, log index)` of the last envelope that was applied or skipped.
    pub fn last_position(&self) -> Option<(u64, u64)> {
        self.last_position
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<R: ChainReader> LedgerEngine<MemoryStore, R> {
    /// Capture the full store at the current stream position.
    pub fn snapshot(&self) -> Result<Snapshot, SnapshotError> {
        let (block, log_index) = self.last_position.unwrap_or((0, 0));
        Snapshot::capture(&self.store, block, log_index)
    }
}

fn dispatch<S: EntityStore>(ctx: &mut Ctx<'_, S>, event: &LedgerEvent) -> HandlerResult {
    match event {
        LedgerEvent::RegisterCollateralType { ilk } => vat::init(ctx, ilk),
        LedgerEvent::File(param) => file::file(ctx, param),
        LedgerEvent::Cage => vat::cage(ctx),
        LedgerEvent::Slip(slip) => vat::slip(ctx, slip),
        LedgerEvent::Flux(flux) => vat::flux(ctx, flux),
        LedgerEvent::Move(transfer) => vat::move_dai(ctx, transfer),
        LedgerEvent::Frob(frob) => vat::frob(ctx, frob),
        LedgerEvent::Fork(fork) => vat::fork(ctx, fork),
        LedgerEvent::Grab(grab) => vat::grab(ctx, grab),
        LedgerEvent::Heal(heal) => vat::heal(ctx, heal),
        LedgerEvent::Suck(suck) => vat::suck(ctx, suck),
        LedgerEvent::Fold(fold) => vat::fold(ctx, fold),
        LedgerEvent::JugInit { ilk } => jug::init(ctx, ilk),
        LedgerEvent::JugDrip { ilk } => jug::drip(ctx, ilk),
        LedgerEvent::PotJoin { wad } => pot::join(ctx, wad),
        LedgerEvent::PotExit { wad } => pot::exit(ctx, wad),
        LedgerEvent::PotDrip => pot::drip(ctx),
        LedgerEvent::PotCage => pot::cage(ctx),
        LedgerEvent::Poke(poke) => spot::poke(ctx, poke),
        LedgerEvent::SpotFilePip(pip) => spot::file_pip(ctx, pip),
        LedgerEvent::SaleKick(kick) => auctions::sale_kick(ctx, kick),
        LedgerEvent::SaleTake(take) => auctions::sale_take(ctx, take),
        LedgerEvent::SaleRedo(redo) => auctions::sale_redo(ctx, redo),
        LedgerEvent::SaleYank { id } => auctions::sale_yank(ctx, id),
        LedgerEvent::DebtKick(kick) => auctions::debt_kick(ctx, kick),
        LedgerEvent::DebtDeal { id } => auctions::debt_deal(ctx, id),
        LedgerEvent::UpdateAddress { key, address } => registry::update_address(ctx, key, *address),
    }
}
