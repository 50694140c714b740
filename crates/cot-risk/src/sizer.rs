//! Position sizing.

use cot_core::error::SizingError;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Inputs for sizing one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRequest {
    /// Contract multiplier
    pub multiplier: Decimal,
    /// Execution price of the entry
    pub price: Decimal,
    /// Protective stop price
    pub stop: Decimal,
    /// Assets under management at the bar
    pub aum: Decimal,
}

/// Sizing policy.
pub trait Sizer: Send + Sync {
    /// Contracts to trade for one entry. Always at least 1 on success.
    fn size(&self, request: &SizingRequest) -> Result<u64, SizingError>;

    fn name(&self) -> &str;
}

/// Risk-budget sizer.
///
/// Each entry risks `risk_fraction * AUM / n_entries` against the distance
/// to the stop, capped at `concentration_cap * AUM` of notional per entry:
///
/// ```text
/// worst_case_loss = multiplier * |price - stop|
/// size = max(floor(min(risk_budget / worst_case_loss, cap * AUM / price)), 1)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBudgetSizer {
    /// Fraction of AUM at risk across a full position (default 0.5%)
    pub risk_fraction: Decimal,
    /// Number of entries the risk budget is split over
    pub n_entries: u32,
    /// Maximum fraction of AUM in one entry's price exposure
    pub concentration_cap: Decimal,
}

impl Default for RiskBudgetSizer {
    fn default() -> Self {
        Self {
            risk_fraction: dec!(0.005),
            n_entries: 3,
            concentration_cap: dec!(0.30),
        }
    }
}

impl RiskBudgetSizer {
    pub fn new(risk_fraction: Decimal, n_entries: u32, concentration_cap: Decimal) -> Self {
        assert!(n_entries > 0, "Entry count must be greater than 0");
        Self {
            risk_fraction,
            n_entries,
            concentration_cap,
        }
    }

    /// Money at risk per entry.
    pub fn risk_budget(&self, aum: Decimal) -> Decimal {
        self.risk_fraction * aum / Decimal::from(self.n_entries)
    }
}

impl Sizer for RiskBudgetSizer {
    fn size(&self, request: &SizingRequest) -> Result<u64, SizingError> {
        if request.price <= Decimal::ZERO {
            return Err(SizingError::NonPositivePrice(request.price));
        }

        let worst_case_loss = request.multiplier * (request.price - request.stop).abs();
        if worst_case_loss.is_zero() {
            return Err(SizingError::ZeroRisk {
                price: request.price,
                stop: request.stop,
                multiplier: request.multiplier,
            });
        }

        let size_by_risk = self.risk_budget(request.aum) / worst_case_loss;
        let cap_size = self.concentration_cap * request.aum / request.price;
        let size = size_by_risk.min(cap_size).floor();

        trace!(
            "Sizing: worst case {} by risk {} cap {}",
            worst_case_loss,
            size_by_risk,
            cap_size
        );

        let contracts = size
            .to_u64()
            .ok_or_else(|| SizingError::Unrepresentable(size.to_f64().unwrap_or(f64::NAN)))?;
        Ok(contracts.max(1))
    }

    fn name(&self) -> &str {
        "Risk budget"
    }
}

/// Convert an indicator price to money precision.
pub fn to_decimal(value: f64) -> Result<Decimal, SizingError> {
    Decimal::from_f64(value).ok_or(SizingError::Unrepresentable(value))
}
