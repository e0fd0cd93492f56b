//! Function selectors of note-style logs
//!
//! The first four bytes of the keccak hash of each function signature.
//! Generic `file` overloads are shared across contracts.

use crate::envelope::Selector;

// ── Shared `file` overloads ─────────────────────────────────────────

/// `file(bytes32,uint256)`
pub const FILE_UINT: Selector = [0x29, 0xae, 0x81, 0x14];
/// `file(bytes32,bytes32,uint256)`
pub const FILE_ILK_UINT: Selector = [0x1a, 0x0b, 0x28, 0x7e];
/// `file(bytes32,address)`
pub const FILE_ADDRESS: Selector = [0xd4, 0xe8, 0xbe, 0x83];
/// `cage()`
pub const CAGE: Selector = [0x69, 0x24, 0x50, 0x09];
/// `init(bytes32)`
pub const INIT: Selector = [0x3b, 0x66, 0x31, 0x95];

// ── Vat ─────────────────────────────────────────────────────────────

/// `slip(bytes32,address,int256)`
pub const VAT_SLIP: Selector = [0x7c, 0xdd, 0x3f, 0xde];
/// `flux(bytes32,address,address,uint256)`
pub const VAT_FLUX: Selector = [0x61, 0x11, 0xbe, 0x2e];
/// `move(address,address,uint256)`
pub const VAT_MOVE: Selector = [0xbb, 0x35, 0x78, 0x3b];
/// `frob(bytes32,address,address,address,int256,int256)`
pub const VAT_FROB: Selector = [0x76, 0x08, 0x87, 0x03];
/// `fork(bytes32,address,address,int256,int256)`
pub const VAT_FORK: Selector = [0x87, 0x0c, 0x61, 0x6d];
/// `grab(bytes32,address,address,address,int256,int256)`
pub const VAT_GRAB: Selector = [0x7b, 0xab, 0x3f, 0x40];
/// `heal(uint256)`
pub const VAT_HEAL: Selector = [0xf3, 0x7a, 0xc6, 0x1c];
/// `suck(address,address,uint256)`
pub const VAT_SUCK: Selector = [0xf2, 0x4e, 0x23, 0xeb];
/// `fold(bytes32,address,int256)`
pub const VAT_FOLD: Selector = [0xb6, 0x53, 0x37, 0xdf];

// ── Jug ─────────────────────────────────────────────────────────────

/// `drip(bytes32)`
pub const JUG_DRIP: Selector = [0x44, 0xe2, 0xa5, 0xa8];

// ── Spot ────────────────────────────────────────────────────────────

/// `file(bytes32,bytes32,address)`
pub const SPOT_FILE_PIP: Selector = [0xeb, 0xec, 0xb3, 0x9d];

// ── Pot ─────────────────────────────────────────────────────────────

/// `join(uint256)`
pub const POT_JOIN: Selector = [0x04, 0x98, 0x78, 0xf3];
/// `exit(uint256)`
pub const POT_EXIT: Selector = [0x7f, 0x86, 0x61, 0xa1];
/// `drip()`
pub const POT_DRIP: Selector = [0x9f, 0x67, 0x8c, 0xca];

// ── Flop ────────────────────────────────────────────────────────────

/// `deal(uint256)`
pub const FLOP_DEAL: Selector = [0xc9, 0x59, 0xc4, 0x2b];

/// Render a selector the way block explorers do.
pub fn to_hex(selector: &Selector) -> String {
    format!("0x{}", hex::encode(selector))
}
