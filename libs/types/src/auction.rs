//! Collateral sale auctions and debt auctions

use serde::{Deserialize, Serialize};

use crate::entity::{impl_entity, EntityKind};
use crate::ids::Address;
use crate::numeric::Decimal;

/// Collateral sale started by a liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleAuction {
    pub id: String,
    /// Remaining stablecoin to raise (rad)
    pub amount_dai_to_raise: Decimal,
    /// Remaining collateral lot (wad)
    pub amount_collateral_to_sell: Decimal,
    /// Receives collateral left over after the debt is covered
    pub user_excess_collateral: Address,
    /// Keeper that started the auction
    pub user_incentives: Address,
    /// ray
    pub starting_price: Decimal,
    pub is_active: bool,
    pub user_taker: Option<Address>,
    pub created_at: u64,
    pub updated_at: Option<u64>,
    pub bought_at: Option<u64>,
    pub reseted_at: Option<u64>,
    pub deleted_at: Option<u64>,
}

impl SaleAuction {
    pub fn new(id: impl Into<String>, created_at: u64) -> Self {
        Self {
            id: id.into(),
            amount_dai_to_raise: Decimal::zero(),
            amount_collateral_to_sell: Decimal::zero(),
            user_excess_collateral: Address::ZERO,
            user_incentives: Address::ZERO,
            starting_price: Decimal::zero(),
            is_active: false,
            user_taker: None,
            created_at,
            updated_at: None,
            bought_at: None,
            reseted_at: None,
            deleted_at: None,
        }
    }
}

impl_entity!(SaleAuction, EntityKind::SaleAuction);

/// Auction of governance tokens to cover bad debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAuction {
    pub id: String,
    /// Governance tokens offered, in raw token units
    pub quantity: Decimal,
    /// Stablecoin bid, in raw units
    pub bid_amount: Decimal,
    pub highest_bidder: Address,
    pub end_time_at: Decimal,
    pub active: bool,
    pub created_at: u64,
    pub updated_at: Option<u64>,
    pub deleted_at: Option<u64>,
}

impl DebtAuction {
    pub fn new(id: impl Into<String>, created_at: u64) -> Self {
        Self {
            id: id.into(),
            quantity: Decimal::zero(),
            bid_amount: Decimal::zero(),
            highest_bidder: Address::ZERO,
            end_time_at: Decimal::zero(),
            active: false,
            created_at,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl_entity!(DebtAuction, EntityKind::DebtAuction);
