//! Decoding error types
//!
//! A decoding failure means the event cannot be applied safely. It is never
//! papered over with zero values.

use thiserror::Error;

/// Byte parameter decoding errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Truncated payload reading {field}: need {need} bytes, have {have}")]
    Truncated {
        field: &'static str,
        need: usize,
        have: usize,
    },

    #[error("Field {field} is not valid UTF-8 text")]
    InvalidText { field: &'static str },

    #[error("Note payload has no function selector")]
    MissingSelector,

    #[error("Layout has no field named {field}")]
    UnknownField { field: &'static str },

    #[error("Field {field} was decoded as {actual}, not {expected}")]
    KindMismatch {
        field: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}
