//! Typed ledger events
//!
//! One variant per event shape the ledger reacts to. Fields carry the raw
//! decoded integers; scaling into wad, ray or rad happens in the handler
//! that knows what the number means.

use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};
use types::ids::Address;

use crate::envelope::ContractKind;

/// Value written by a `file` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileValue {
    Uint(BigUint),
    Address(Address),
}

/// A generic parameter update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParam {
    pub contract: ContractKind,
    /// Collateral type for per-collateral parameters
    pub ilk: Option<String>,
    pub what: String,
    pub value: FileValue,
}

/// `slip(ilk, usr, wad)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slip {
    pub ilk: String,
    pub usr: Address,
    pub wad: BigInt,
}

/// `flux(ilk, src, dst, wad)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flux {
    pub ilk: String,
    pub src: Address,
    pub dst: Address,
    pub wad: BigInt,
}

/// `move(src, dst, rad)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub src: Address,
    pub dst: Address,
    pub rad: BigUint,
}

/// `frob(ilk, u, v, w, dink, dart)`: `u` owns the vault, `v` provides
/// collateral, `w` receives the stablecoin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frob {
    pub ilk: String,
    pub urn: Address,
    pub collateral_from: Address,
    pub dai_to: Address,
    pub dink: BigInt,
    pub dart: BigInt,
}

/// `fork(ilk, src, dst, dink, dart)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fork {
    pub ilk: String,
    pub src: Address,
    pub dst: Address,
    pub dink: BigInt,
    pub dart: BigInt,
}

/// `grab(ilk, u, v, w, dink, dart)`: `v` is the liquidator, `w` the
/// settlement contract that takes on the debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grab {
    pub ilk: String,
    pub urn: Address,
    pub liquidator: Address,
    pub settlement: Address,
    pub dink: BigInt,
    pub dart: BigInt,
}

/// `heal(rad)`. The debt and stablecoin settled belong to the emitting
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heal {
    pub rad: BigUint,
}

/// `suck(u, v, rad)`: `u` takes the debt, `v` receives the stablecoin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suck {
    pub debtor: Address,
    pub recipient: Address,
    pub rad: BigUint,
}

/// `fold(ilk, u, rate)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fold {
    pub ilk: String,
    pub user: Address,
    pub rate: BigInt,
}

/// Clipper `Kick` and `Redo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleKick {
    pub id: BigUint,
    pub top: BigUint,
    pub tab: BigUint,
    pub lot: BigUint,
    pub usr: Address,
    pub kpr: Address,
    pub coin: BigUint,
}

/// Clipper `Take`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTake {
    pub id: BigUint,
    pub max: BigUint,
    pub price: BigUint,
    pub owe: BigUint,
    pub tab: BigUint,
    pub lot: BigUint,
    pub usr: Address,
}

/// Flop `Kick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtKick {
    pub id: BigUint,
    pub lot: BigUint,
    pub bid: BigUint,
    pub gal: Address,
}

/// Spot `Poke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poke {
    pub ilk: String,
    pub val: BigUint,
    pub spot: BigUint,
}

/// Spot `file(ilk, "pip", data)`: a new price source, recorded with its
/// first reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePip {
    pub ilk: String,
    /// Reading as a raw wad word
    pub val: BigUint,
}

/// Every event the ledger applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // ── Vat ──
    RegisterCollateralType { ilk: String },
    File(FileParam),
    Cage,
    Slip(Slip),
    Flux(Flux),
    Move(Move),
    Frob(Frob),
    Fork(Fork),
    Grab(Grab),
    Heal(Heal),
    Suck(Suck),
    Fold(Fold),

    // ── Jug ──
    JugInit { ilk: String },
    JugDrip { ilk: String },

    // ── Pot ──
    PotJoin { wad: BigInt },
    PotExit { wad: BigInt },
    PotDrip,
    PotCage,

    // ── Spot ──
    Poke(Poke),
    SpotFilePip(FilePip),

    // ── Clipper ──
    SaleKick(SaleKick),
    SaleTake(SaleTake),
    SaleRedo(SaleKick),
    SaleYank { id: BigUint },

    // ── Flop ──
    DebtKick(DebtKick),
    DebtDeal { id: BigUint },

    // ── ChainLog ──
    UpdateAddress { key: String, address: Address },
}

impl LedgerEvent {
    /// Short name for logs and counters.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::RegisterCollateralType { .. } => "init",
            LedgerEvent::File(_) => "file",
            LedgerEvent::Cage => "cage",
            LedgerEvent::Slip(_) => "slip",
            LedgerEvent::Flux(_) => "flux",
            LedgerEvent::Move(_) => "move",
            LedgerEvent::Frob(_) => "frob",
            LedgerEvent::Fork(_) => "fork",
            LedgerEvent::Grab(_) => "grab",
            LedgerEvent::Heal(_) => "heal",
            LedgerEvent::Suck(_) => "suck",
            LedgerEvent::Fold(_) => "fold",
            LedgerEvent::JugInit { .. } => "jug.init",
            LedgerEvent::JugDrip { .. } => "jug.drip",
            LedgerEvent::PotJoin { .. } => "pot.join",
            LedgerEvent::PotExit { .. } => "pot.exit",
            LedgerEvent::PotDrip => "pot.drip",
            LedgerEvent::PotCage => "pot.cage",
            LedgerEvent::Poke(_) => "poke",
            LedgerEvent::SpotFilePip(_) => "spot.file.pip",
            LedgerEvent::SaleKick(_) => "clip.kick",
            LedgerEvent::SaleTake(_) => "clip.take",
            LedgerEvent::SaleRedo(_) => "clip.redo",
            LedgerEvent::SaleYank { .. } => "clip.yank",
            LedgerEvent::DebtKick(_) => "flop.kick",
            LedgerEvent::DebtDeal { .. } => "flop.deal",
            LedgerEvent::UpdateAddress { .. } => "chainlog.update",
        }
    }
}
