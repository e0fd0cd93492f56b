//! Identifier types for chain data and ledger entities
//!
//! Addresses and transaction hashes are fixed-width byte strings rendered as
//! lower-case `0x`-prefixed hex. Entity ids are derived from them
//! deterministically so that replaying the same log rewrites the same rows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::NumericError;

fn decode_hex<const N: usize>(kind: &'static str, s: &str) -> Result<[u8; N], NumericError> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(body).map_err(|_| NumericError::InvalidHex(s.to_string()))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| NumericError::InvalidLength {
        kind,
        expected: N,
        actual: bytes.len(),
    })
}

/// 20-byte account or contract address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, NumericError> {
        <[u8; 20]>::try_from(bytes)
            .map(Self)
            .map_err(|_| NumericError::InvalidLength {
                kind: "address",
                expected: 20,
                actual: bytes.len(),
            })
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lower-case `0x` hex form, used as the entity id of users.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex::<20>("address", s).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Address::from_str(&text).map_err(serde::de::Error::custom)
    }
}

/// 32-byte transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_hex::<32>("transaction hash", s).map(Self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        TxHash::from_str(&text).map_err(serde::de::Error::custom)
    }
}

// ── Entity id builders ──────────────────────────────────────────────

/// Vault id: one vault per (owner, collateral type) pair.
pub fn vault_id(owner: &Address, ilk: &str) -> String {
    format!("{}-{}", owner.to_hex(), ilk)
}

/// Unlocked collateral balance id: one per (owner, collateral type) pair.
pub fn collateral_balance_id(owner: &Address, ilk: &str) -> String {
    format!("{}-{}", owner.to_hex(), ilk)
}

/// Point-in-time price id.
pub fn collateral_price_id(block_number: u64, ilk: &str) -> String {
    format!("{}-{}", block_number, ilk)
}

/// Sale auction id, scoped to the auction house that started it.
pub fn sale_auction_id(auction: &str, house: &Address) -> String {
    format!("{}-{}", auction, house.to_hex())
}

/// Debt auction id.
pub fn debt_auction_id(auction: &str) -> String {
    format!("{}-debt", auction)
}
