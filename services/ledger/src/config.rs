//! Ledger configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use types::ids::Address;

use crate::errors::LedgerError;

/// Mainnet address of the savings contract, used when the registry is empty.
pub const MAINNET_POT: &str = "0x197e90f9fad81970ba7976f33cbd77088e5d7cf7";

/// Configuration for the ledger engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Chain-log key naming the savings contract.
    pub pot_registry_key: String,
    /// Savings contract used when the chain log has no entry.
    pub pot_fallback_address: Address,
    /// Whether `slip` also adds its delta to the collateral type's total.
    pub slip_updates_total_collateral: bool,
    /// Reject events whose stream position goes backwards instead of
    /// applying them with a warning.
    pub strict_ordering: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            pot_registry_key: "MCD_POT".to_string(),
            pot_fallback_address: Address::from_str(MAINNET_POT).unwrap_or(Address::ZERO),
            slip_updates_total_collateral: false,
            strict_ordering: false,
        }
    }
}

impl LedgerConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(text).map_err(|e| LedgerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.pot_registry_key, "MCD_POT");
        assert_eq!(config.pot_fallback_address.to_hex(), MAINNET_POT);
        assert!(!config.slip_updates_total_collateral);
        assert!(!config.strict_ordering);
    }

    #[test]
    fn test_partial_json() {
        let config = LedgerConfig::from_json(r#"{"strict_ordering": true}"#).unwrap();
        assert!(config.strict_ordering);
        assert_eq!(config.pot_registry_key, "MCD_POT");
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            LedgerConfig::from_json("{"),
            Err(LedgerError::Config(_))
        ));
    }
}
