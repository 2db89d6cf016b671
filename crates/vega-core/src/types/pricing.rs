//! # Pricing Types
//!
//! Inputs and outputs of the Black-Scholes engine. All decimals are at
//! standard scale (1e18 by default).

use ethnum::I256;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// Inputs for pricing a single vanilla option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackScholesInputs {
    /// Seconds until expiry
    pub time_to_expiry_secs: u64,
    /// Annualised volatility (0.2 = 20%)
    pub volatility: I256,
    /// Spot price of the underlying
    pub spot: I256,
    /// Strike price
    pub strike: I256,
    /// Annualised risk-free rate, may be negative
    pub rate: I256,
}

impl BlackScholesInputs {
    /// Reject inputs outside the model's domain
    pub fn validate(&self) -> CoreResult<()> {
        if self.spot <= I256::ZERO {
            return Err(CoreError::invalid_input("spot", format!("{} must be positive", self.spot)));
        }
        if self.strike <= I256::ZERO {
            return Err(CoreError::invalid_input("strike", format!("{} must be positive", self.strike)));
        }
        if self.volatility.is_negative() {
            return Err(CoreError::invalid_input(
                "volatility",
                format!("{} must not be negative", self.volatility),
            ));
        }
        Ok(())
    }
}

/// Call and put prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPrices {
    pub call: I256,
    pub put: I256,
}

/// Call and put deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deltas {
    /// In [0, 1]
    pub call: I256,
    /// In [-1, 0]
    pub put: I256,
}

/// Prices, deltas and standardized vega
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricesDeltaStdVega {
    pub call_price: I256,
    pub put_price: I256,
    pub call_delta: I256,
    pub put_delta: I256,
    pub std_vega: I256,
}

/// Full quote for one option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricesAndGreeks {
    pub call_price: I256,
    pub put_price: I256,
    pub call_delta: I256,
    pub put_delta: I256,
    /// Price change per 1.0 change in volatility
    pub vega: I256,
    /// Vega normalised to a 30-day period, per 1% volatility
    pub std_vega: I256,
}

impl From<PricesAndGreeks> for PricesDeltaStdVega {
    fn from(quote: PricesAndGreeks) -> Self {
        Self {
            call_price: quote.call_price,
            put_price: quote.put_price,
            call_delta: quote.call_delta,
            put_delta: quote.put_delta,
            std_vega: quote.std_vega,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: i128 = 1_000_000_000_000_000_000;

    fn inputs() -> BlackScholesInputs {
        BlackScholesInputs {
            time_to_expiry_secs: 30 * 86_400,
            volatility: I256::new(E18 / 5),
            spot: I256::new(100 * E18),
            strike: I256::new(100 * E18),
            rate: I256::ZERO,
        }
    }

    #[test]
    fn test_validate_inputs() {
        assert!(inputs().validate().is_ok());
        assert!(BlackScholesInputs { volatility: I256::ZERO, ..inputs() }.validate().is_ok());
        assert!(BlackScholesInputs { rate: I256::new(-E18 / 100), ..inputs() }.validate().is_ok());

        let err = BlackScholesInputs { spot: I256::ZERO, ..inputs() }.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { field: "spot", .. }));

        let err = BlackScholesInputs { strike: I256::new(-1), ..inputs() }.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { field: "strike", .. }));

        let err = BlackScholesInputs { volatility: I256::new(-1), ..inputs() }.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { field: "volatility", .. }));
    }

    #[test]
    fn test_inputs_serde_round_trip() {
        let json = serde_json::to_string(&inputs()).unwrap();
        let parsed: BlackScholesInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, inputs());
    }
}
