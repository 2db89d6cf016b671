//! # Standard Normal Distribution
//!
//! Density and cumulative distribution at precise scale.
//!
//! The CDF uses the Abramowitz & Stegun 26.2.17 rational polynomial. Its
//! coefficients are published to 7 digits and are lifted to precise scale
//! once, so every intermediate keeps full precision and the result is
//! non-decreasing in `x`. Outside `[cdf_min_input, cdf_max_input]` the result
//! snaps to exactly 0 or 1.

use ethnum::I256;

use crate::constants::{CDF_B, CDF_COEFFICIENT_SCALE, CDF_P};
use crate::errors::CoreResult;
use crate::math::fixed_point::FixedPointMath;
use crate::math::safe_math::{safe_add, safe_div, safe_mul, safe_sub};

impl FixedPointMath {
    /// `exp(-x^2 / 2) / sqrt(2 * pi)` at precise scale
    pub fn std_normal(&self, x: I256) -> CoreResult<I256> {
        let half_square = self.multiply_decimal_round_precise(x, x / I256::new(2))?;
        self.divide_decimal_round_precise(self.exp(-half_square)?, self.sqrt_two_pi)
    }

    /// Standard normal CDF at precise scale
    pub fn std_normal_cdf(&self, x: I256) -> CoreResult<I256> {
        if x < self.cdf_min_input {
            log::trace!("CDF input {} below floor, clamping to 0", x);
            return Ok(I256::ZERO);
        }
        self.std_normal_cdf_unfloored(x)
    }

    /// Standard normal CDF with only the upper clamp applied
    ///
    /// Below the floor the approximation keeps decaying towards zero instead
    /// of snapping, which pricing relies on when only `d2` is that far out.
    pub fn std_normal_cdf_unfloored(&self, x: I256) -> CoreResult<I256> {
        if x > self.cdf_max_input {
            log::trace!("CDF input {} above ceiling, clamping to 1", x);
            return Ok(self.precise_unit);
        }

        // t = 1 / (1 + p|x|)
        let p = self.cdf_coefficient(CDF_P)?;
        let t = self.divide_decimal_round_precise(
            self.precise_unit,
            safe_add(self.precise_unit, self.multiply_decimal_round_precise(p, x.abs())?)?,
        )?;

        // t * (b1 + t * (b2 + ... + t * b5))
        let mut poly = self.cdf_coefficient(CDF_B[4])?;
        for b in CDF_B[..4].iter().rev() {
            poly = safe_add(self.cdf_coefficient(*b)?, self.multiply_decimal_round_precise(poly, t)?)?;
        }
        poly = self.multiply_decimal_round_precise(poly, t)?;

        let tail = self.multiply_decimal_round_precise(self.std_normal(x)?, poly)?;
        let probability = if x > I256::ZERO {
            safe_sub(self.precise_unit, tail)?
        } else {
            tail
        };
        Ok(probability.clamp(I256::ZERO, self.precise_unit))
    }

    fn cdf_coefficient(&self, raw: i128) -> CoreResult<I256> {
        safe_div(
            safe_mul(I256::new(raw), self.precise_unit)?,
            I256::new(CDF_COEFFICIENT_SCALE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E27: i128 = 1_000_000_000_000_000_000_000_000_000;

    fn i(v: i128) -> I256 {
        I256::new(v)
    }

    fn assert_close(actual: I256, expected: I256, tolerance: I256) {
        let diff = (actual - expected).abs();
        assert!(diff <= tolerance, "expected {} got {}", expected, actual);
    }

    #[test]
    fn test_std_normal_density() {
        let math = FixedPointMath::default();
        let tolerance = i(E27 / 1_000_000_000_000);

        // 1 / sqrt(2 pi)
        assert_close(math.std_normal(I256::ZERO).unwrap(), i(398_942_280_401_432_677_939_946_059), tolerance);
        // phi(1)
        assert_close(math.std_normal(i(E27)).unwrap(), i(241_970_724_519_143_349_797_830_239), tolerance);
        // symmetric
        assert_eq!(math.std_normal(i(-E27)).unwrap(), math.std_normal(i(E27)).unwrap());
    }

    #[test]
    fn test_cdf_midpoint() {
        let math = FixedPointMath::default();
        assert_close(math.std_normal_cdf(I256::ZERO).unwrap(), i(E27 / 2), i(E27 / 1_000_000));
    }

    #[test]
    fn test_cdf_known_values() {
        let math = FixedPointMath::default();
        let tolerance = i(E27 / 1_000_000);

        // N(1), N(-1), N(1.96), N(-2.5)
        assert_close(math.std_normal_cdf(i(E27)).unwrap(), i(841_344_746_068_542_948_585_232_545), tolerance);
        assert_close(math.std_normal_cdf(i(-E27)).unwrap(), i(158_655_253_931_457_051_414_767_455), tolerance);
        assert_close(math.std_normal_cdf(i(196 * E27 / 100)).unwrap(), i(975_002_104_851_779_578_330_087_898), tolerance);
        assert_close(math.std_normal_cdf(i(-25 * E27 / 10)).unwrap(), i(6_209_665_325_776_135_166_978_441), tolerance);
    }

    #[test]
    fn test_cdf_clamps() {
        let math = FixedPointMath::default();

        assert_eq!(math.std_normal_cdf(i(-45 * E27 / 10 - 1)).unwrap(), I256::ZERO);
        assert_eq!(math.std_normal_cdf(i(-50 * E27)).unwrap(), I256::ZERO);
        assert_eq!(math.std_normal_cdf(i(10 * E27 + 1)).unwrap(), i(E27));
        assert_eq!(math.std_normal_cdf(i(40 * E27)).unwrap(), i(E27));

        // Just inside the bounds the approximation is already negligible / saturated
        assert!(math.std_normal_cdf(i(-45 * E27 / 10)).unwrap() < i(E27 / 100_000));
        assert!(math.std_normal_cdf(i(10 * E27)).unwrap() > i(E27 - E27 / 100_000));
    }

    #[test]
    fn test_cdf_monotonic() {
        let math = FixedPointMath::default();
        let mut previous = I256::ZERO;
        for thousandths in -4_500i128..=10_000 {
            let value = math.std_normal_cdf(i(thousandths * E27 / 1_000)).unwrap();
            assert!(value >= previous, "CDF decreased at {}", thousandths);
            previous = value;
        }
    }

    #[test]
    fn test_cdf_monotonic_between_neighbours() {
        let math = FixedPointMath::default();

        // Adjacent inputs a single precise unit apart never step down
        for whole in [-4i128, -2, -1, 0, 1, 2, 3, 5] {
            let x = i(whole * E27 + 123_456_789);
            let mut previous = math.std_normal_cdf(x).unwrap();
            for step in 1..=200i128 {
                let value = math.std_normal_cdf(x + i(step * 1_000_000_000_000_000)).unwrap();
                assert!(value >= previous, "CDF decreased near {}", whole);
                previous = value;
            }
        }
    }

    #[test]
    fn test_cdf_unfloored_tail() {
        let math = FixedPointMath::default();

        // Only the ceiling applies
        assert_eq!(math.std_normal_cdf_unfloored(i(10 * E27 + 1)).unwrap(), i(E27));
        assert_eq!(
            math.std_normal_cdf_unfloored(i(-2 * E27)).unwrap(),
            math.std_normal_cdf(i(-2 * E27)).unwrap()
        );

        let at_five = math.std_normal_cdf_unfloored(i(-5 * E27)).unwrap();
        assert!(at_five > I256::ZERO);
        // N(-5) = 2.87e-7
        assert_close(at_five, i(286_651_571_879_193_911_506), i(E27 / 1_000_000_000));
        assert_eq!(math.std_normal_cdf_unfloored(i(-40 * E27)).unwrap(), I256::ZERO);

        let mut previous = I256::ZERO;
        for tenths in -400i128..=-45 {
            let value = math.std_normal_cdf_unfloored(i(tenths * E27 / 10)).unwrap();
            assert!(value >= previous, "tail decreased at {}", tenths);
            previous = value;
        }
    }
}
