//! # Black-Scholes Engine
//!
//! Closed-form Black-Scholes prices and greeks for European options, computed
//! entirely in fixed point. Public entry points take and return standard-scale
//! decimals; the intermediate math runs at precise scale.
//!
//! Protocol minimums are applied silently:
//! - annualised time is floored at one second
//! - volatility is floored at 1 basis point
//! - time to expiry is floored at 7 days when standardizing vega
//!
//! Call and put prices clamp to zero instead of going negative from rounding.
//! `N(d2)` skips the CDF's lower clamp while `N(d1)` is still above it, so
//! the call price stays non-decreasing in spot and volatility.

use ethnum::I256;

use crate::config::EngineConfig;
use crate::constants::{BPS_DENOMINATOR, SECONDS_PER_DAY};
use crate::errors::CoreResult;
use crate::math::fixed_point::FixedPointMath;
use crate::math::safe_math::{safe_add, safe_div_u64, safe_mul_u64, safe_sub};
use crate::types::pricing::{
    BlackScholesInputs, Deltas, OptionPrices, PricesAndGreeks, PricesDeltaStdVega,
};

/// Inputs converted to precise scale
#[derive(Debug, Clone, Copy)]
struct PreciseInputs {
    t_annualised: I256,
    volatility: I256,
    spot: I256,
    strike: I256,
    rate: I256,
}

/// Stateless Black-Scholes pricer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackScholes {
    math: FixedPointMath,
    seconds_per_year: u64,
    min_t_annualised: I256,
    min_volatility: I256,
    vega_min_secs: u64,
    vega_normalisation_days: u64,
}

impl Default for BlackScholes {
    fn default() -> Self {
        Self::build(FixedPointMath::default(), &EngineConfig::default())
    }
}

impl BlackScholes {
    /// Validate the configuration and build the engine
    pub fn new(config: &EngineConfig) -> CoreResult<Self> {
        let math = FixedPointMath::new(config)?;
        Ok(Self::build(math, config))
    }

    fn build(math: FixedPointMath, config: &EngineConfig) -> Self {
        let precise_unit = math.precise_unit();
        Self {
            math,
            seconds_per_year: config.seconds_per_year,
            min_t_annualised: precise_unit * I256::from(config.min_time_to_expiry_secs)
                / I256::from(config.seconds_per_year),
            min_volatility: precise_unit * I256::from(config.min_volatility_bps)
                / I256::from(BPS_DENOMINATOR),
            vega_min_secs: config.vega_min_days * SECONDS_PER_DAY,
            vega_normalisation_days: config.vega_normalisation_days,
        }
    }

    /// Fixed-point engine this pricer runs on
    pub fn math(&self) -> &FixedPointMath {
        &self.math
    }

    // ========================================================================
    // Building Blocks (precise scale)
    // ========================================================================

    /// Seconds as a fraction of a 365-day year
    pub fn annualise(&self, seconds: u64) -> CoreResult<I256> {
        safe_div_u64(safe_mul_u64(self.math.precise_unit(), seconds)?, self.seconds_per_year)
    }

    /// d1 and d2 for annualised time `t`
    pub fn d1_d2(
        &self,
        t_annualised: I256,
        volatility: I256,
        spot: I256,
        strike: I256,
        rate: I256,
    ) -> CoreResult<(I256, I256)> {
        let math = &self.math;

        // Floors keep vol * sqrt(t) away from zero
        let t_annualised = if t_annualised < self.min_t_annualised {
            log::trace!("Flooring annualised time {} to {}", t_annualised, self.min_t_annualised);
            self.min_t_annualised
        } else {
            t_annualised
        };
        let volatility = if volatility < self.min_volatility {
            log::trace!("Flooring volatility {} to {}", volatility, self.min_volatility);
            self.min_volatility
        } else {
            volatility
        };

        let vt_sqrt = math.multiply_decimal_round_precise(volatility, math.sqrt_precise(t_annualised)?)?;
        let log = math.ln(math.divide_decimal_round_precise(spot, strike)?)?;
        let half_variance = math.multiply_decimal_round_precise(volatility, volatility)? / I256::new(2);
        let v2t = math.multiply_decimal_round_precise(safe_add(half_variance, rate)?, t_annualised)?;

        let d1 = math.divide_decimal_round_precise(safe_add(log, v2t)?, vt_sqrt)?;
        let d2 = safe_sub(d1, vt_sqrt)?;
        Ok((d1, d2))
    }

    /// Call and put prices from d1 and d2
    pub fn option_prices_precise(
        &self,
        t_annualised: I256,
        spot: I256,
        strike: I256,
        rate: I256,
        d1: I256,
        d2: I256,
    ) -> CoreResult<OptionPrices> {
        let math = &self.math;

        let discount = math.exp(-math.multiply_decimal_round_precise(rate, t_annualised)?)?;
        let strike_pv = math.multiply_decimal_round_precise(strike, discount)?;
        let spot_nd1 = math.multiply_decimal_round_precise(spot, math.std_normal_cdf(d1)?)?;
        // Snapping N(d2) to zero while N(d1) is positive overprices the call
        let nd2 = if d1 >= math.cdf_min_input {
            math.std_normal_cdf_unfloored(d2)?
        } else {
            math.std_normal_cdf(d2)?
        };
        let strike_nd2 = math.multiply_decimal_round_precise(strike_pv, nd2)?;

        let call = if strike_nd2 <= spot_nd1 {
            spot_nd1 - strike_nd2
        } else {
            I256::ZERO
        };

        // Put-call parity, clamped the same way
        let put = safe_add(call, strike_pv)?;
        let put = if spot <= put { put - spot } else { I256::ZERO };

        Ok(OptionPrices { call, put })
    }

    /// Call and put delta from d1
    pub fn delta(&self, d1: I256) -> CoreResult<Deltas> {
        let call = self.math.std_normal_cdf(d1)?;
        let put = safe_sub(call, self.math.precise_unit())?;
        Ok(Deltas { call, put })
    }

    /// sqrt(t) * spot * phi(d1)
    pub fn vega(&self, t_annualised: I256, spot: I256, d1: I256) -> CoreResult<I256> {
        let math = &self.math;
        math.multiply_decimal_round_precise(
            math.sqrt_precise(t_annualised)?,
            math.multiply_decimal_round_precise(math.std_normal(d1)?, spot)?,
        )
    }

    /// sqrt(30 / days) / 100, days floored at the vega minimum
    pub fn vega_normalisation_factor(&self, time_to_expiry_secs: u64) -> CoreResult<I256> {
        let secs = time_to_expiry_secs.max(self.vega_min_secs);
        let days = secs / SECONDS_PER_DAY;

        let normalisation = safe_mul_u64(self.math.precise_unit(), self.vega_normalisation_days)?;
        let ratio = safe_div_u64(normalisation, days)?;
        safe_div_u64(self.math.sqrt_precise(ratio)?, 100)
    }

    /// Vega scaled to the 30-day standard
    pub fn std_vega(&self, vega: I256, time_to_expiry_secs: u64) -> CoreResult<I256> {
        self.math
            .multiply_decimal_round_precise(vega, self.vega_normalisation_factor(time_to_expiry_secs)?)
    }

    // ========================================================================
    // Entry Points (standard scale)
    // ========================================================================

    /// Call and put prices
    pub fn option_prices(&self, inputs: &BlackScholesInputs) -> CoreResult<OptionPrices> {
        let precise = self.to_precise(inputs)?;
        let (d1, d2) = self.d1_d2_for(&precise)?;
        let prices = self.option_prices_precise(
            precise.t_annualised,
            precise.spot,
            precise.strike,
            precise.rate,
            d1,
            d2,
        )?;

        Ok(OptionPrices {
            call: self.math.precise_to_decimal(prices.call)?,
            put: self.math.precise_to_decimal(prices.put)?,
        })
    }

    /// Prices, deltas and standardized vega
    pub fn prices_delta_std_vega(&self, inputs: &BlackScholesInputs) -> CoreResult<PricesDeltaStdVega> {
        self.price_options(inputs).map(PricesDeltaStdVega::from)
    }

    /// Full quote: prices, deltas, vega and standardized vega
    pub fn price_options(&self, inputs: &BlackScholesInputs) -> CoreResult<PricesAndGreeks> {
        let math = &self.math;
        let precise = self.to_precise(inputs)?;
        let (d1, d2) = self.d1_d2_for(&precise)?;

        let prices = self.option_prices_precise(
            precise.t_annualised,
            precise.spot,
            precise.strike,
            precise.rate,
            d1,
            d2,
        )?;
        let deltas = self.delta(d1)?;
        let vega = self.vega(precise.t_annualised, precise.spot, d1)?;
        let std_vega = self.std_vega(vega, inputs.time_to_expiry_secs)?;

        // Derive the put delta after rounding so the pair differs by exactly one unit
        let call_delta = math.precise_to_decimal(deltas.call)?;
        let put_delta = safe_sub(call_delta, math.unit())?;

        Ok(PricesAndGreeks {
            call_price: math.precise_to_decimal(prices.call)?,
            put_price: math.precise_to_decimal(prices.put)?,
            call_delta,
            put_delta,
            vega: math.precise_to_decimal(vega)?,
            std_vega: math.precise_to_decimal(std_vega)?,
        })
    }

    fn to_precise(&self, inputs: &BlackScholesInputs) -> CoreResult<PreciseInputs> {
        inputs.validate()?;
        let math = &self.math;
        Ok(PreciseInputs {
            t_annualised: self.annualise(inputs.time_to_expiry_secs)?,
            volatility: math.decimal_to_precise(inputs.volatility)?,
            spot: math.decimal_to_precise(inputs.spot)?,
            strike: math.decimal_to_precise(inputs.strike)?,
            rate: math.decimal_to_precise(inputs.rate)?,
        })
    }

    fn d1_d2_for(&self, precise: &PreciseInputs) -> CoreResult<(I256, I256)> {
        self.d1_d2(
            precise.t_annualised,
            precise.volatility,
            precise.spot,
            precise.strike,
            precise.rate,
        )
    }
}
