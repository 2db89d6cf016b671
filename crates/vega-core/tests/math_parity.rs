//! # Math Parity Tests
//!
//! Fixed-point results checked against double-precision references and
//! against each other across precisions.

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ethnum::I256;
    use vega_core::math::*;
    use vega_core::EngineConfig;

    const E18: i128 = 1_000_000_000_000_000_000;
    const E27: i128 = 1_000_000_000_000_000_000_000_000_000;

    fn to_f64(value: I256, decimals: u32) -> f64 {
        value.to_string().parse::<f64>().unwrap() / 10f64.powi(decimals as i32)
    }

    #[test]
    fn test_exp_ln_against_f64() {
        let math = FixedPointMath::default();
        let grid = [-20.0, -5.0, -1.0, -0.25, 0.1, 0.5, 1.0, 2.5, 10.0, 40.0];

        for x in grid {
            let fixed = I256::new((x * 1e6) as i128 * 1_000_000_000_000);
            let exp = to_f64(math.exp_decimal(fixed).unwrap(), 18);
            assert_relative_eq!(exp, f64::exp(x), max_relative = 1e-9);
        }

        for x in [0.001, 0.05, 0.5, 0.999, 1.5, 10.0, 1234.5, 1e9] {
            let fixed = I256::new((x * 1e6) as i128 * 1_000_000_000_000);
            let ln = to_f64(math.ln_decimal(fixed).unwrap(), 18);
            assert_abs_diff_eq!(ln, f64::ln(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_exp_ln_round_trip() {
        let math = FixedPointMath::default();
        for step in 1..=40i128 {
            // 0.25 .. 10.0
            let x = I256::new(step * E27 / 4);
            let back = math.exp(math.ln(x).unwrap()).unwrap();
            let tolerance = x / I256::new(1_000_000);
            assert!((back - x).abs() <= tolerance, "exp(ln({})) = {}", x, back);
        }
    }

    #[test]
    fn test_cdf_against_reference() {
        let math = FixedPointMath::default();
        let reference = [
            (-2.0, 0.022750131948179),
            (-1.0, 0.158655253931457),
            (0.0, 0.5),
            (0.5, 0.691462461274013),
            (1.0, 0.841344746068543),
            (2.0, 0.977249868051821),
            (3.0, 0.998650101968370),
        ];

        for (x, expected) in reference {
            let fixed = I256::new((x * 1e6) as i128 * 1_000_000_000_000_000_000_000);
            let cdf = to_f64(math.std_normal_cdf(fixed).unwrap(), 27);
            assert_abs_diff_eq!(cdf, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_cdf_boundaries() {
        let math = FixedPointMath::default();
        assert_eq!(math.std_normal_cdf(I256::new(-5 * E27)).unwrap(), I256::ZERO);
        assert_eq!(math.std_normal_cdf(I256::new(11 * E27)).unwrap(), I256::new(E27));

        let mid = to_f64(math.std_normal_cdf(I256::ZERO).unwrap(), 27);
        assert_abs_diff_eq!(mid, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_precision_parity() {
        let reference = FixedPointMath::default();
        let reduced = FixedPointMath::new(&EngineConfig {
            precise_decimals: 24,
            ..EngineConfig::default()
        })
        .unwrap();

        for units in [1i128, 2, 5, 17, 100] {
            let x = I256::new(units * E18 / 3);
            let a = reference.exp_decimal(x).unwrap();
            let b = reduced.exp_decimal(x).unwrap();
            assert!((a - b).abs() <= a / I256::new(1_000_000_000_000), "exp parity at {}", x);

            let a = reference.ln_decimal(x).unwrap();
            let b = reduced.ln_decimal(x).unwrap();
            assert!((a - b).abs() <= I256::new(1_000_000), "ln parity at {}", x);
        }
    }

    #[test]
    fn test_decimal_strings_round_trip() {
        for text in ["0", "1", "-1.5", "0.000000000000000001", "123456789.987654321"] {
            let value = parse_decimal(text, 18).unwrap();
            assert_eq!(format_decimal(value, 18), text);
        }
    }
}
