//! Read-through calls against deployed contracts
//!
//! The savings-rate handler needs the live accumulator of the savings
//! contract. The host supplies a [`ChainReader`]; failures never abort the
//! handler.

use num_bigint::BigUint;
use std::collections::BTreeMap;
use thiserror::Error;
use types::ids::Address;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error("Call {method} on {contract} reverted")]
    Reverted {
        contract: Address,
        method: &'static str,
    },

    #[error("Chain unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of contract state at a block.
pub trait ChainReader {
    /// Raw `chi()` of the savings contract at `pot`, as of `block_number`.
    fn pot_chi(&self, pot: &Address, block_number: u64) -> Result<BigUint, CallError>;
}

/// Reader for hosts without chain access. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChain;

impl ChainReader for NoChain {
    fn pot_chi(&self, _pot: &Address, _block_number: u64) -> Result<BigUint, CallError> {
        Err(CallError::Unavailable("no chain connection configured".to_string()))
    }
}

/// Reader answering from a fixed table of known values.
///
/// Useful when replaying a stream whose call results were recorded.
#[derive(Debug, Clone, Default)]
pub struct FixedChain {
    chi: BTreeMap<Address, BigUint>,
}

impl FixedChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chi(mut self, pot: Address, chi: BigUint) -> Self {
        self.chi.insert(pot, chi);
        self
    }
}

impl ChainReader for FixedChain {
    fn pot_chi(&self, pot: &Address, _block_number: u64) -> Result<BigUint, CallError> {
        self.chi.get(pot).cloned().ok_or(CallError::Reverted {
            contract: *pot,
            method: "chi",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_chain_is_unavailable() {
        assert!(matches!(
            NoChain.pot_chi(&Address::ZERO, 1),
            Err(CallError::Unavailable(_))
        ));
    }

    #[test]
    fn test_fixed_chain_known_and_unknown() {
        let pot = Address::new([1u8; 20]);
        let chain = FixedChain::new().with_chi(pot, BigUint::from(10u8));
        assert_eq!(chain.pot_chi(&pot, 5).unwrap(), BigUint::from(10u8));
        assert_eq!(
            chain.pot_chi(&Address::ZERO, 5).unwrap_err(),
            CallError::Reverted {
                contract: Address::ZERO,
                method: "chi"
            }
        );
    }
}
