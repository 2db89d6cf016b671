//! # Fixed-Point Arithmetic
//!
//! Decimal fixed-point math at two precisions: "standard" (1e18 by default)
//! for public inputs and outputs and "precise" (1e27 by default) for the
//! multi-step transcendental math where rounding error would otherwise
//! compound.
//!
//! All values are `I256` integers with an implied denominator. Products and
//! quotients round half away from zero on the discarded digits and fail
//! rather than wrap when the 256-bit intermediate overflows.

use ethnum::I256;

use crate::config::EngineConfig;
use crate::constants::{LN_2_REFERENCE, REFERENCE_DECIMALS, SQRT_TWO_PI_REFERENCE};
use crate::errors::{CoreError, CoreResult};
use crate::math::safe_math::{
    div_round_half_up, safe_div, safe_mul, safe_pow10, sqrt_i256,
};

/// Fixed-point engine built from an [`EngineConfig`]
///
/// Holds the two scale factors and the reference constants rescaled to the
/// configured precise scale. Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointMath {
    pub(crate) standard_decimals: u32,
    pub(crate) unit: I256,
    pub(crate) precise_unit: I256,
    /// precise_unit / unit
    pub(crate) precision_gap: I256,
    pub(crate) ln_2: I256,
    pub(crate) sqrt_two_pi: I256,
    pub(crate) max_exp: I256,
    pub(crate) min_exp: I256,
    pub(crate) cdf_min_input: I256,
    pub(crate) cdf_max_input: I256,
}

impl Default for FixedPointMath {
    fn default() -> Self {
        Self::build(&EngineConfig::default())
    }
}

impl FixedPointMath {
    /// Validate the configuration and build the engine
    pub fn new(config: &EngineConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Build from an already-validated configuration
    fn build(config: &EngineConfig) -> Self {
        let unit = pow10(config.standard_decimals);
        let precise_unit = pow10(config.precise_decimals);
        let tenth = precise_unit / I256::new(10);

        // Reference constants carry 27 digits; drop the surplus with rounding
        let rescale = pow10(REFERENCE_DECIMALS - config.precise_decimals);
        let from_reference = |value: i128| {
            div_round_half_up(I256::new(value), rescale).unwrap_or(I256::ZERO)
        };

        Self {
            standard_decimals: config.standard_decimals,
            unit,
            precise_unit,
            precision_gap: precise_unit / unit,
            ln_2: from_reference(LN_2_REFERENCE),
            sqrt_two_pi: from_reference(SQRT_TWO_PI_REFERENCE),
            max_exp: precise_unit * I256::from(config.max_exp_input),
            min_exp: -(precise_unit * I256::from(config.exp_underflow_input)),
            cdf_min_input: tenth * I256::from(config.cdf_min_input_tenths),
            cdf_max_input: tenth * I256::from(config.cdf_max_input_tenths),
        }
    }

    // ========================================================================
    // Scale Accessors
    // ========================================================================

    /// 1.0 at standard scale
    pub fn unit(&self) -> I256 {
        self.unit
    }

    /// 1.0 at precise scale
    pub fn precise_unit(&self) -> I256 {
        self.precise_unit
    }

    pub fn standard_decimals(&self) -> u32 {
        self.standard_decimals
    }

    /// Whole number at standard scale
    pub fn from_integer(&self, value: i64) -> I256 {
        I256::from(value) * self.unit
    }

    /// Ratio `numerator / denominator` at standard scale, rounded
    pub fn from_ratio(&self, numerator: i64, denominator: i64) -> CoreResult<I256> {
        self.divide_decimal_round(self.from_integer(numerator), self.from_integer(denominator))
    }

    // ========================================================================
    // Standard-Scale Arithmetic
    // ========================================================================

    /// `a * b / unit`, truncated toward zero
    pub fn multiply_decimal(&self, a: I256, b: I256) -> CoreResult<I256> {
        safe_div(safe_mul(a, b)?, self.unit)
    }

    /// `a * b / unit`, rounded half up
    pub fn multiply_decimal_round(&self, a: I256, b: I256) -> CoreResult<I256> {
        div_round_half_up(safe_mul(a, b)?, self.unit)
    }

    /// `a * unit / b`, truncated toward zero
    pub fn divide_decimal(&self, a: I256, b: I256) -> CoreResult<I256> {
        if b == I256::ZERO {
            return Err(CoreError::DivisionByZero);
        }
        safe_div(safe_mul(a, self.unit)?, b)
    }

    /// `a * unit / b`, rounded half up
    pub fn divide_decimal_round(&self, a: I256, b: I256) -> CoreResult<I256> {
        if b == I256::ZERO {
            return Err(CoreError::DivisionByZero);
        }
        div_round_half_up(safe_mul(a, self.unit)?, b)
    }

    // ========================================================================
    // Precise-Scale Arithmetic
    // ========================================================================

    /// `a * b / precise_unit`, rounded half up
    pub fn multiply_decimal_round_precise(&self, a: I256, b: I256) -> CoreResult<I256> {
        div_round_half_up(safe_mul(a, b)?, self.precise_unit)
    }

    /// `a * precise_unit / b`, rounded half up
    pub fn divide_decimal_round_precise(&self, a: I256, b: I256) -> CoreResult<I256> {
        if b == I256::ZERO {
            return Err(CoreError::DivisionByZero);
        }
        div_round_half_up(safe_mul(a, self.precise_unit)?, b)
    }

    // ========================================================================
    // Scale Conversion
    // ========================================================================

    /// Standard to precise (exact)
    pub fn decimal_to_precise(&self, value: I256) -> CoreResult<I256> {
        safe_mul(value, self.precision_gap)
    }

    /// Precise to standard, rounded half up
    pub fn precise_to_decimal(&self, value: I256) -> CoreResult<I256> {
        div_round_half_up(value, self.precision_gap)
    }

    // ========================================================================
    // Square Root
    // ========================================================================

    /// Integer square root of a raw value
    pub fn sqrt(&self, x: I256) -> CoreResult<I256> {
        sqrt_i256(x)
    }

    /// Square root at precise scale
    pub fn sqrt_precise(&self, x: I256) -> CoreResult<I256> {
        // sqrt(x * UNIT) = sqrt(x) * sqrt(UNIT); the extra unit is absorbed by the root
        sqrt_i256(safe_mul(x, self.precise_unit)?)
    }

    /// Square root at standard scale
    pub fn sqrt_decimal(&self, x: I256) -> CoreResult<I256> {
        sqrt_i256(safe_mul(x, self.unit)?)
    }
}

fn pow10(exponent: u32) -> I256 {
    // exponent <= 27 after validation
    safe_pow10(exponent).unwrap_or(I256::MAX)
}
