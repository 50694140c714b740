//! Order intents emitted by the portfolio engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Get the sign for position calculations (+1 for buy, -1 for sell).
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    /// Execute immediately at the decision price
    Market,
    /// Protective stop, triggered when the market trades through the price
    Stop,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::Market => write!(f, "MARKET"),
            OrderKind::Stop => write!(f, "STOP"),
        }
    }
}

/// An order the engine wants the broker to place.
///
/// Created per decision cycle and consumed immediately by the broker
/// collaborator. A stop with `replaces_prior_stop` set cancels the
/// instrument's previous protective stop (one-cancels-other).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Instrument symbol
    pub instrument: String,
    /// Buy or sell
    pub side: Side,
    /// Market or stop
    pub kind: OrderKind,
    /// Decision price for market intents, trigger price for stops
    pub price: Decimal,
    /// Contracts
    pub size: u64,
    /// Whether this stop replaces the live protective stop
    pub replaces_prior_stop: bool,
}

impl OrderIntent {
    /// Create a market intent.
    pub fn market(instrument: impl Into<String>, side: Side, price: Decimal, size: u64) -> Self {
        Self {
            instrument: instrument.into(),
            side,
            kind: OrderKind::Market,
            price,
            size,
            replaces_prior_stop: false,
        }
    }

    /// Create the first protective stop for a new position.
    pub fn stop(instrument: impl Into<String>, side: Side, price: Decimal, size: u64) -> Self {
        Self {
            instrument: instrument.into(),
            side,
            kind: OrderKind::Stop,
            price,
            size,
            replaces_prior_stop: false,
        }
    }

    /// Create a stop that replaces the live protective stop.
    pub fn replacing_stop(
        instrument: impl Into<String>,
        side: Side,
        price: Decimal,
        size: u64,
    ) -> Self {
        Self {
            replaces_prior_stop: true,
            ..Self::stop(instrument, side, price, size)
        }
    }

    /// Check if this is a market intent.
    pub fn is_market(&self) -> bool {
        self.kind == OrderKind::Market
    }

    /// Check if this is a stop intent.
    pub fn is_stop(&self) -> bool {
        self.kind == OrderKind::Stop
    }

    /// Signed contract change if this intent executes.
    pub fn signed_size(&self) -> i64 {
        self.side.sign() * self.size as i64
    }
}

impl std::fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} x{} @ {}{}",
            self.instrument,
            self.kind,
            self.side,
            self.size,
            self.price,
            if self.replaces_prior_stop { " (OCO)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::Sell.sign(), -1);
    }

    #[test]
    fn test_intent_constructors() {
        let market = OrderIntent::market("C", Side::Buy, dec!(500), 2);
        assert!(market.is_market());
        assert!(!market.replaces_prior_stop);
        assert_eq!(market.signed_size(), 2);

        let stop = OrderIntent::replacing_stop("C", Side::Sell, dec!(480), 2);
        assert!(stop.is_stop());
        assert!(stop.replaces_prior_stop);
        assert_eq!(stop.signed_size(), -2);
        assert_eq!(stop.to_string(), "C STOP SELL x2 @ 480 (OCO)");
    }

    #[test]
    fn test_intent_serialization() {
        let intent = OrderIntent::stop("KC", Side::Buy, dec!(180.5), 3);
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"kind\":\"stop\""));
        assert!(json.contains("\"side\":\"buy\""));
    }
}
