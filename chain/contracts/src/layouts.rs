//! Field layouts, one table per event shape
//!
//! Note logs: argument *n* (1-based) sits at `[4 + 32(n-1), 4 + 32n)`.
//! Named events: word *n* (0-based) sits at `[32n, 32n + 32)`.

use crate::abi::Field;
use crate::abi::FieldKind::{Address, Int, Text, Uint};

/// Offset of note argument `n`, counting from 1.
pub const fn note_arg(n: usize) -> usize {
    4 + 32 * (n - 1)
}

/// Offset of named-event word `n`, counting from 0.
pub const fn event_word(n: usize) -> usize {
    32 * n
}

const fn arg(name: &'static str, n: usize, kind: crate::abi::FieldKind) -> Field {
    Field::word(name, note_arg(n), kind)
}

const fn word(name: &'static str, n: usize, kind: crate::abi::FieldKind) -> Field {
    Field::word(name, event_word(n), kind)
}

// ── Note logs: shared shapes ────────────────────────────────────────

/// `init(ilk)`, `drip(ilk)`
pub const ILK_ONLY: &[Field] = &[arg("ilk", 1, Text)];

/// `file(what, data)`
pub const FILE_UINT: &[Field] = &[arg("what", 1, Text), arg("data", 2, Uint)];

/// `file(ilk, what, data)`
pub const FILE_ILK_UINT: &[Field] = &[
    arg("ilk", 1, Text),
    arg("what", 2, Text),
    arg("data", 3, Uint),
];

/// Spot `file(ilk, what, pip)`. The last word is read as a raw wad.
pub const FILE_ILK_PIP: &[Field] = &[
    arg("ilk", 1, Text),
    arg("what", 2, Text),
    arg("data", 3, Uint),
];

/// `file(what, address)`
pub const FILE_ADDRESS: &[Field] = &[arg("what", 1, Text), arg("data", 2, Address)];

// ── Note logs: Vat ──────────────────────────────────────────────────

pub const SLIP: &[Field] = &[
    arg("ilk", 1, Text),
    arg("usr", 2, Address),
    arg("wad", 3, Int),
];

pub const FLUX: &[Field] = &[
    arg("ilk", 1, Text),
    arg("src", 2, Address),
    arg("dst", 3, Address),
    arg("wad", 4, Int),
];

pub const MOVE: &[Field] = &[
    arg("src", 1, Address),
    arg("dst", 2, Address),
    arg("rad", 3, Uint),
];

/// Shared by `frob` and `grab`.
pub const FROB: &[Field] = &[
    arg("ilk", 1, Text),
    arg("u", 2, Address),
    arg("v", 3, Address),
    arg("w", 4, Address),
    arg("dink", 5, Int),
    arg("dart", 6, Int),
];

pub const FORK: &[Field] = &[
    arg("ilk", 1, Text),
    arg("src", 2, Address),
    arg("dst", 3, Address),
    arg("dink", 4, Int),
    arg("dart", 5, Int),
];

pub const HEAL: &[Field] = &[arg("rad", 1, Uint)];

pub const SUCK: &[Field] = &[
    arg("u", 1, Address),
    arg("v", 2, Address),
    arg("rad", 3, Uint),
];

pub const FOLD: &[Field] = &[
    arg("ilk", 1, Text),
    arg("u", 2, Address),
    arg("rate", 3, Int),
];

// ── Note logs: Pot, Flop ────────────────────────────────────────────

/// `join(wad)`, `exit(wad)`
pub const POT_AMOUNT: &[Field] = &[arg("wad", 1, Int)];

pub const DEAL: &[Field] = &[arg("id", 1, Uint)];

// ── Named events ────────────────────────────────────────────────────

pub const EVENT_FILE_UINT: &[Field] = &[word("what", 0, Text), word("data", 1, Uint)];

pub const EVENT_FILE_ADDRESS: &[Field] = &[word("what", 0, Text), word("data", 1, Address)];

pub const EVENT_FILE_ILK_UINT: &[Field] = &[
    word("ilk", 0, Text),
    word("what", 1, Text),
    word("data", 2, Uint),
];

/// Clipper `Kick` and `Redo` share one shape.
pub const CLIP_KICK: &[Field] = &[
    word("id", 0, Uint),
    word("top", 1, Uint),
    word("tab", 2, Uint),
    word("lot", 3, Uint),
    word("usr", 4, Address),
    word("kpr", 5, Address),
    word("coin", 6, Uint),
];

pub const CLIP_TAKE: &[Field] = &[
    word("id", 0, Uint),
    word("max", 1, Uint),
    word("price", 2, Uint),
    word("owe", 3, Uint),
    word("tab", 4, Uint),
    word("lot", 5, Uint),
    word("usr", 6, Address),
];

pub const CLIP_YANK: &[Field] = &[word("id", 0, Uint)];

pub const FLOP_KICK: &[Field] = &[
    word("id", 0, Uint),
    word("lot", 1, Uint),
    word("bid", 2, Uint),
    word("gal", 3, Address),
];

pub const POKE: &[Field] = &[
    word("ilk", 0, Text),
    word("val", 1, Uint),
    word("spot", 2, Uint),
];

pub const UPDATE_ADDRESS: &[Field] = &[word("key", 0, Text), word("addr", 1, Address)];

/// Smallest payload that satisfies a layout.
pub fn required_len(layout: &[Field]) -> usize {
    layout.iter().map(Field::end).max().unwrap_or(0)
}
