//! # Logarithm and Exponential
//!
//! `ln` and `exp` at precise scale, plus standard-scale wrappers.
//!
//! - `exp` range-reduces `x = k*ln2 + r`, sums at most 16 Taylor terms of
//!   `e^r` front to back, stopping once a term rounds to zero, and scales by
//!   `2^k`. Inputs above the configured ceiling fail; inputs below the
//!   underflow floor return exactly 0.
//! - `ln` scales `x` by a power of two into `[1, 2)`, refines the logarithm
//!   of the reduced value with Halley's method for at most 8 rounds, then
//!   adds back `k*ln2`.

use ethnum::I256;

use crate::constants::{EXP_TAYLOR_TERMS, MAX_LN_ITERATIONS};
use crate::errors::{CoreError, CoreResult};
use crate::math::fixed_point::FixedPointMath;
use crate::math::safe_math::{div_round_half_up, safe_add, safe_div, safe_mul, safe_pow2, safe_sub};

impl FixedPointMath {
    /// Natural logarithm at precise scale; `x` must be positive
    pub fn ln(&self, x: I256) -> CoreResult<I256> {
        if x <= I256::ZERO {
            return Err(CoreError::InvalidLogarithmInput(x.to_string()));
        }
        if x == self.precise_unit {
            return Ok(I256::ZERO);
        }

        // x = 2^k * reduced, unit <= reduced < 2*unit
        let (k, reduced) = if x >= self.precise_unit {
            let k = floor_log2(x / self.precise_unit);
            (I256::from(k), x >> k)
        } else {
            let mut m = floor_log2(self.precise_unit / x);
            if (x << m) < self.precise_unit {
                m += 1;
            }
            (-I256::from(m), x << m)
        };

        // ln(1 + u) <= u, so the iteration starts from above
        let two = I256::new(2);
        let mut result = safe_sub(reduced, self.precise_unit)?;
        for _ in 0..MAX_LN_ITERATIONS {
            let e = self.exp(result)?;
            let step = self.divide_decimal_round_precise(
                safe_mul(safe_sub(reduced, e)?, two)?,
                safe_add(reduced, e)?,
            )?;
            let next = safe_add(result, step)?;
            if next == result {
                break;
            }
            result = next;
        }

        safe_add(safe_mul(self.ln_2, k)?, result)
    }

    /// Exponential at precise scale
    pub fn exp(&self, x: I256) -> CoreResult<I256> {
        if x == I256::ZERO {
            return Ok(self.precise_unit);
        }
        if x > I256::ZERO {
            return self.exp_positive(x);
        }
        if x < self.min_exp {
            // The true value is below one precise unit
            log::trace!("exp({}) underflows, clamping to 0", x);
            return Ok(I256::ZERO);
        }
        self.divide_decimal_round_precise(self.precise_unit, self.exp_positive(-x)?)
    }

    /// Natural logarithm of a standard-scale value, at standard scale
    pub fn ln_decimal(&self, x: I256) -> CoreResult<I256> {
        self.precise_to_decimal(self.ln(self.decimal_to_precise(x)?)?)
    }

    /// Exponential of a standard-scale value, at standard scale
    pub fn exp_decimal(&self, x: I256) -> CoreResult<I256> {
        self.precise_to_decimal(self.exp(self.decimal_to_precise(x)?)?)
    }

    fn exp_positive(&self, x: I256) -> CoreResult<I256> {
        if x > self.max_exp {
            return Err(CoreError::ExponentialOverflow(x.to_string()));
        }

        // x = k*ln2 + r, 0 <= r < ln2
        let k = safe_div(x, self.ln_2)?;
        let shift = u32::try_from(k.as_i128()).map_err(|_| CoreError::MathOverflow)?;
        let p = safe_pow2(shift)?;
        let r = safe_sub(x, safe_mul(k, self.ln_2)?)?;

        // term_i = r^i / i!, rounded at each step
        let mut term = self.precise_unit;
        let mut sum = self.precise_unit;
        for i in 1..=EXP_TAYLOR_TERMS {
            term = div_round_half_up(
                safe_mul(term, r)?,
                safe_mul(self.precise_unit, I256::from(i))?,
            )?;
            if term == I256::ZERO {
                break;
            }
            sum = safe_add(sum, term)?;
        }

        safe_mul(p, sum)
    }
}

/// floor(log2(n)) for n >= 1
fn floor_log2(n: I256) -> u32 {
    255 - n.leading_zeros()
}
