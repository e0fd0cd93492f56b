//! Error types for the shared ledger types
//!
//! Parse failures for decimals and hex-encoded identifiers.

use thiserror::Error;

/// Errors raised while constructing numeric values or identifiers from text or bytes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    #[error("Invalid decimal: {0}")]
    InvalidDecimal(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid length for {kind}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
}
