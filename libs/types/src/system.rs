//! System-wide state singleton and the chain address registry

use serde::{Deserialize, Serialize};

use crate::entity::{impl_entity, EntityKind, Provenance};
use crate::ids::Address;
use crate::numeric::{Decimal, Scale};

/// Id of the only `SystemState` row.
pub const SYSTEM_STATE_ID: &str = "current";

/// Global totals and protocol parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub id: String,
    pub collateral_count: u64,
    pub unmanaged_vault_count: u64,

    // ── Core accounting ──
    /// rad
    pub total_debt_ceiling: Decimal,
    /// rad
    pub total_debt: Decimal,
    /// Unbacked debt across all holders (rad)
    pub total_system_debt: Decimal,

    // ── Savings ──
    /// wad
    pub total_savings_in_pot: Decimal,
    pub savings_rate: Decimal,
    /// Savings accumulator read from the savings contract (ray)
    pub rate_accumulator: Decimal,
    pub last_pot_drip_at: Option<u64>,
    pub pot_vow_contract: Option<Address>,

    // ── Fees and pricing ──
    pub base_stability_fee: Decimal,
    pub jug_vow_contract: Option<Address>,
    /// Reference value of the stablecoin, raw ray integer as filed
    pub par: Decimal,

    // ── Sale auctions ──
    pub sale_auction_starting_price_factor: Decimal,
    /// Seconds
    pub sale_auction_reset_time: Decimal,
    pub sale_auction_drop_percentage: Decimal,
    pub sale_auction_dai_to_raise_percentage: Decimal,
    pub sale_auction_flat_fee: Decimal,
    pub sale_auction_spotter_contract: Option<Address>,
    pub sale_auction_dog_contract: Option<Address>,
    pub sale_auction_vow_contract: Option<Address>,
    pub sale_auction_calc_contract: Option<Address>,

    // ── Debt auctions ──
    pub debt_auction_minimum_bid_increase: Decimal,
    pub debt_auction_lot_size_increase: Decimal,
    /// Seconds
    pub debt_auction_bid_duration: Decimal,
    /// Seconds
    pub debt_auction_duration: Decimal,

    pub updated: Option<Provenance>,
}

impl SystemState {
    pub fn new() -> Self {
        Self {
            id: SYSTEM_STATE_ID.to_string(),
            collateral_count: 0,
            unmanaged_vault_count: 0,
            total_debt_ceiling: Decimal::zero(),
            total_debt: Decimal::zero(),
            total_system_debt: Decimal::zero(),
            total_savings_in_pot: Decimal::zero(),
            savings_rate: Decimal::one(),
            rate_accumulator: Decimal::one(),
            last_pot_drip_at: None,
            pot_vow_contract: None,
            base_stability_fee: Decimal::zero(),
            jug_vow_contract: None,
            par: Decimal::new(Decimal::one().to_raw(Scale::Ray), 0),
            sale_auction_starting_price_factor: Decimal::zero(),
            sale_auction_reset_time: Decimal::zero(),
            sale_auction_drop_percentage: Decimal::zero(),
            sale_auction_dai_to_raise_percentage: Decimal::zero(),
            sale_auction_flat_fee: Decimal::zero(),
            sale_auction_spotter_contract: None,
            sale_auction_dog_contract: None,
            sale_auction_vow_contract: None,
            sale_auction_calc_contract: None,
            debt_auction_minimum_bid_increase: Decimal::zero(),
            debt_auction_lot_size_increase: Decimal::zero(),
            debt_auction_bid_duration: Decimal::zero(),
            debt_auction_duration: Decimal::zero(),
            updated: None,
        }
    }

    pub fn touch(&mut self, at: Provenance) {
        self.updated = Some(at);
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}

impl_entity!(SystemState, EntityKind::SystemState);

/// Registry entry mapping a well-known logical name to a contract address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainLog {
    /// Logical name, e.g. `MCD_POT`
    pub id: String,
    pub address: Address,
    pub updated: Provenance,
}

impl_entity!(ChainLog, EntityKind::ChainLog);
