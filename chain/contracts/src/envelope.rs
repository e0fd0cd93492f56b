//! Ingress envelope
//!
//! One envelope per log, delivered in (block, log index) order by an
//! external dispatcher. Two log styles exist:
//!
//! - **Note** logs are anonymous and carry the full call data of the
//!   function that emitted them: a 4-byte selector followed by 32-byte
//!   argument words, argument *n* at `[4 + 32(n-1), 4 + 32n)`.
//! - **Named** events carry the ABI encoding of every argument (indexed
//!   ones included), word *n* at `[32n, 32n + 32)`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use types::entity::Provenance;
use types::ids::{Address, TxHash};

/// 4-byte function selector.
pub type Selector = [u8; 4];

/// Contract family that emitted a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Core accounting: collateral types, vaults, stablecoin balances
    Vat,
    /// Stability fee collection
    Jug,
    /// Savings rate
    Pot,
    /// Price feeds and liquidation ratios
    Spot,
    /// Liquidation trigger
    Dog,
    /// Collateral sale auctions
    Clipper,
    /// Debt auctions
    Flop,
    /// Contract address registry
    ChainLog,
}

impl ContractKind {
    /// Upper-case family label recorded on parameter change logs.
    pub fn label(&self) -> &'static str {
        match self {
            ContractKind::Vat => "VAT",
            ContractKind::Jug => "JUG",
            ContractKind::Pot => "POT",
            ContractKind::Spot => "SPOT",
            ContractKind::Dog => "DOG",
            ContractKind::Clipper => "CLIPPER",
            ContractKind::Flop => "FLOP",
            ContractKind::ChainLog => "CHAINLOG",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named (non-anonymous) events understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    /// `File(bytes32 what, uint256 data)`
    FileUint,
    /// `File(bytes32 what, address data)`
    FileAddress,
    /// `File(bytes32 ilk, bytes32 what, uint256 data)`
    FileIlkUint,
    Kick,
    Take,
    Redo,
    Yank,
    Poke,
    UpdateAddress,
}

/// How the log identifies the operation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signature {
    Note { selector: Selector, caller: Address },
    Event(EventName),
}

/// A raw log as delivered to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEnvelope {
    pub source: ContractKind,
    /// Emitting contract
    pub address: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: TxHash,
    /// Sender of the enclosing transaction
    pub transaction_from: Address,
    pub log_index: u64,
    pub signature: Signature,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
}

impl LogEnvelope {
    /// Provenance stamped on every row this log writes.
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.block_number, self.block_timestamp, self.transaction_hash)
    }

    /// Position in the ordered stream.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// Call data as a `0x` hex string.
mod hex_bytes {
    use super::*;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        let body = text.strip_prefix("0x").unwrap_or(&text);
        hex::decode(body).map_err(serde::de::Error::custom)
    }
}
