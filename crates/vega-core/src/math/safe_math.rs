//! # Safe Math Operations
//!
//! Overflow-checked 256-bit arithmetic. Every fixed-point routine in the core
//! is built on these so an out-of-range intermediate surfaces as an error
//! instead of wrapping.

use ethnum::I256;

use crate::errors::{CoreError, CoreResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    // Division operations with zero check
    (div, $fn_name:ident, $checked_method:ident) => {
        /// Checked division with zero check
        pub fn $fn_name(a: I256, b: I256) -> CoreResult<I256> {
            if b == I256::ZERO {
                return Err(CoreError::DivisionByZero);
            }
            a.$checked_method(b).ok_or(CoreError::MathOverflow)
        }
    };

    // Binary operations with checked methods
    ($fn_name:ident, $type:ty, $checked_method:ident, $error:expr) => {
        /// Checked operation, erroring instead of wrapping
        pub fn $fn_name(a: $type, b: $type) -> CoreResult<$type> {
            a.$checked_method(b).ok_or($error)
        }
    };
}

safe_arith!(safe_add, I256, checked_add, CoreError::MathOverflow);
safe_arith!(safe_sub, I256, checked_sub, CoreError::MathOverflow);
safe_arith!(safe_mul, I256, checked_mul, CoreError::MathOverflow);
safe_arith!(div, safe_div, checked_div);
safe_arith!(div, safe_rem, checked_rem);

/// Multiply by a whole number of seconds, days, etc.
pub fn safe_mul_u64(a: I256, b: u64) -> CoreResult<I256> {
    safe_mul(a, I256::from(b))
}

/// Divide by a whole number, truncating toward zero
pub fn safe_div_u64(a: I256, b: u64) -> CoreResult<I256> {
    safe_div(a, I256::from(b))
}

/// 2^k
pub fn safe_pow2(k: u32) -> CoreResult<I256> {
    // bit 255 is the sign bit
    if k >= 255 {
        return Err(CoreError::MathOverflow);
    }
    Ok(I256::ONE << k)
}

/// 10^exponent
pub fn safe_pow10(exponent: u32) -> CoreResult<I256> {
    I256::from(10u8).checked_pow(exponent).ok_or(CoreError::MathOverflow)
}

/// Divide rounding half away from zero
pub fn div_round_half_up(numerator: I256, denominator: I256) -> CoreResult<I256> {
    let quotient = safe_div(numerator, denominator)?;
    let remainder = safe_rem(numerator, denominator)?;

    if remainder == I256::ZERO {
        return Ok(quotient);
    }

    let remainder_abs = remainder.unsigned_abs();
    let denominator_abs = denominator.unsigned_abs();
    if remainder_abs >= denominator_abs - remainder_abs {
        // Away from zero in the direction of the true quotient
        if numerator.is_negative() == denominator.is_negative() {
            safe_add(quotient, I256::ONE)
        } else {
            safe_sub(quotient, I256::ONE)
        }
    } else {
        Ok(quotient)
    }
}

/// Integer square root by Newton's method, 0 at 0
pub fn sqrt_i256(x: I256) -> CoreResult<I256> {
    if x.is_negative() {
        return Err(CoreError::NegativeSquareRoot);
    }
    if x == I256::ZERO {
        return Ok(I256::ZERO);
    }

    let two = I256::new(2);

    // (x + 1) / 2 without overflowing at the top of the range
    let mut z = x / two + x % two;
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) / two;
    }
    Ok(y)
}
