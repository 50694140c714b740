//! Commission/margin lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Contract economics for one futures instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Round-turn commission per contract
    pub commission_per_contract: Decimal,
    /// Price-to-money multiplier
    pub multiplier: Decimal,
    /// Initial margin per contract, when the exchange publishes one
    #[serde(default)]
    pub margin: Option<Decimal>,
}

/// Lookup of contract specs by symbol.
///
/// An unknown symbol is a configuration fault: the universe is checked
/// against the lookup before any bar is processed.
pub trait ContractLookup {
    fn lookup(&self, symbol: &str) -> Result<ContractSpec, ConfigError>;

    /// Check that every symbol is registered.
    fn ensure_registered<'a>(
        &self,
        symbols: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), ConfigError>
    where
        Self: Sized,
    {
        for symbol in symbols {
            self.lookup(symbol)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Single;

    impl ContractLookup for Single {
        fn lookup(&self, symbol: &str) -> Result<ContractSpec, ConfigError> {
            if symbol == "C" {
                Ok(ContractSpec {
                    commission_per_contract: dec!(15.32),
                    multiplier: dec!(50),
                    margin: Some(dec!(2250)),
                })
            } else {
                Err(ConfigError::UnregisteredSymbol(symbol.to_string()))
            }
        }
    }

    #[test]
    fn test_ensure_registered() {
        let ok = vec!["C".to_string()];
        assert!(Single.ensure_registered(&ok).is_ok());

        let bad = vec!["C".to_string(), "ZZ".to_string()];
        assert_eq!(
            Single.ensure_registered(&bad),
            Err(ConfigError::UnregisteredSymbol("ZZ".into()))
        );
    }
}
