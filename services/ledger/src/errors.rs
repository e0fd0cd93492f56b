//! Ledger error types
//!
//! Only malformed input and storage failures are errors. Missing entities
//! are reported as skips, and read-through failures are logged and absorbed.

use contracts::errors::DecodeError;
use persistence::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Malformed event at block {block} log {log_index}: {source}")]
    Malformed {
        block: u64,
        log_index: u64,
        #[source]
        source: DecodeError,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Event out of order: last ({last_block}, {last_log}), received ({block}, {log_index})")]
    OutOfOrder {
        last_block: u64,
        last_log: u64,
        block: u64,
        log_index: u64,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::entity::EntityKind;

    #[test]
    fn test_from_decode_error() {
        let err: LedgerError = DecodeError::MissingSelector.into();
        assert!(matches!(err, LedgerError::Decode(_)));
    }

    #[test]
    fn test_from_store_error() {
        let err: LedgerError = StoreError::Serialization {
            kind: EntityKind::Vault,
            id: "x".into(),
            reason: "bad".into(),
        }
        .into();
        assert!(err.to_string().contains("Vault"));
    }

    #[test]
    fn test_malformed_display() {
        let err = LedgerError::Malformed {
            block: 10,
            log_index: 2,
            source: DecodeError::Truncated {
                field: "dart",
                need: 196,
                have: 100,
            },
        };
        assert!(err.to_string().contains("block 10 log 2"));
    }
}
