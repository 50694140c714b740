//! Futures contract schedule.

use std::collections::HashMap;

use cot_core::error::ConfigError;
use cot_core::traits::{ContractLookup, ContractSpec};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Clearing fee charged on every contract, added to the exchange fee.
const CLEARING_FEE: Decimal = dec!(2.82);

/// Contract specs keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct ContractSchedule {
    contracts: HashMap<String, ContractSpec>,
}

impl ContractSchedule {
    /// Create an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The agricultural futures traded by the strategy.
    ///
    /// Commission is the clearing fee plus the exchange fee per contract.
    pub fn futures_defaults() -> Self {
        let entries: [(&str, Decimal, Decimal, Option<Decimal>); 9] = [
            ("CC", dec!(10), dec!(10), None),
            ("KC", dec!(18.75), dec!(375), None),
            ("C", dec!(12.5), dec!(50), Some(dec!(2250))),
            ("CT", dec!(10), dec!(500), Some(dec!(1500))),
            ("W", dec!(15.32), dec!(50), Some(dec!(3300))),
            ("SB", dec!(11.2), dec!(1120), Some(dec!(2850))),
            ("BO", dec!(12), dec!(600), Some(dec!(2700))),
            ("S", dec!(12.5), dec!(50), Some(dec!(4000))),
            ("SM", dec!(10), dec!(100), Some(dec!(2500))),
        ];

        entries
            .into_iter()
            .fold(Self::new(), |schedule, (symbol, fee, multiplier, margin)| {
                schedule.with_contract(
                    symbol,
                    ContractSpec {
                        commission_per_contract: CLEARING_FEE + fee,
                        multiplier,
                        margin,
                    },
                )
            })
    }

    /// Add or replace a contract.
    pub fn with_contract(mut self, symbol: impl Into<String>, spec: ContractSpec) -> Self {
        self.insert(symbol, spec);
        self
    }

    /// Add or replace a contract in place.
    pub fn insert(&mut self, symbol: impl Into<String>, spec: ContractSpec) {
        self.contracts.insert(symbol.into(), spec);
    }

    pub fn get(&self, symbol: &str) -> Option<&ContractSpec> {
        self.contracts.get(symbol)
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.contracts.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Commission for trading `contracts` of `symbol`.
    pub fn commission(&self, symbol: &str, contracts: u64) -> Result<Decimal, ConfigError> {
        let spec = self.lookup(symbol)?;
        Ok(spec.commission_per_contract * Decimal::from(contracts))
    }
}

impl ContractLookup for ContractSchedule {
    fn lookup(&self, symbol: &str) -> Result<ContractSpec, ConfigError> {
        self.contracts
            .get(symbol)
            .copied()
            .ok_or_else(|| ConfigError::UnregisteredSymbol(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_universe() {
        let schedule = ContractSchedule::futures_defaults();
        assert_eq!(schedule.len(), 9);
        assert_eq!(
            schedule.symbols(),
            vec!["BO", "C", "CC", "CT", "KC", "S", "SB", "SM", "W"]
        );
    }

    #[test]
    fn test_default_specs() {
        let schedule = ContractSchedule::futures_defaults();

        let corn = schedule.lookup("C").unwrap();
        assert_eq!(corn.multiplier, dec!(50));
        assert_eq!(corn.commission_per_contract, dec!(15.32));
        assert_eq!(corn.margin, Some(dec!(2250)));

        let coffee = schedule.lookup("KC").unwrap();
        assert_eq!(coffee.multiplier, dec!(375));
        assert_eq!(coffee.commission_per_contract, dec!(21.57));
        assert_eq!(coffee.margin, None);
    }

    #[test]
    fn test_override_and_unknown() {
        let schedule = ContractSchedule::futures_defaults().with_contract(
            "C",
            ContractSpec {
                commission_per_contract: dec!(5),
                multiplier: dec!(50),
                margin: None,
            },
        );
        assert_eq!(schedule.commission("C", 4).unwrap(), dec!(20));
        assert_eq!(
            schedule.lookup("ZW"),
            Err(ConfigError::UnregisteredSymbol("ZW".into()))
        );
    }
}
