//! # Protocol Constants
//!
//! Reference values for the pricing core:
//! - Mathematical constants at 27 decimal digits (rescaled at engine construction)
//! - Time conversion factors
//! - Default protocol minimums and approximation bounds
//! - Normal CDF polynomial coefficients

// ============================================================================
// Mathematical Constants (27 decimal digits)
// ============================================================================

/// Number of decimal digits the reference constants are expressed in
pub const REFERENCE_DECIMALS: u32 = 27;

/// ln(2) at 27 decimal digits
pub const LN_2_REFERENCE: i128 = 693_147_180_559_945_309_417_232_121;

/// sqrt(2 * pi) at 27 decimal digits
pub const SQRT_TWO_PI_REFERENCE: i128 = 2_506_628_274_631_000_502_415_765_285;

// ============================================================================
// Time Constants
// ============================================================================

/// 365-day year
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

pub const SECONDS_PER_DAY: u64 = 86_400;

// ============================================================================
// Default Protocol Parameters
// ============================================================================

/// Public I/O decimals (1e18)
pub const DEFAULT_STANDARD_DECIMALS: u32 = 18;

/// Internal transcendental math decimals (1e27)
pub const DEFAULT_PRECISE_DECIMALS: u32 = 27;

/// Annualised time never drops below one second
pub const DEFAULT_MIN_TIME_TO_EXPIRY_SECS: u64 = 1;

/// Volatility floor in basis points (0.01%)
pub const DEFAULT_MIN_VOLATILITY_BPS: u64 = 1;

/// Time-to-expiry floor applied before standardizing vega
pub const DEFAULT_VEGA_MIN_DAYS: u64 = 7;

/// Standardized vega is quoted per 30-day period
pub const DEFAULT_VEGA_NORMALISATION_DAYS: u64 = 30;

/// exp() fails above this input (whole units)
pub const DEFAULT_MAX_EXP_INPUT: u32 = 100;

/// exp() returns exactly 0 below the negation of this input (whole units)
pub const DEFAULT_EXP_UNDERFLOW_INPUT: u32 = 63;

/// Normal CDF returns exactly 0 below this input (tenths)
pub const DEFAULT_CDF_MIN_INPUT_TENTHS: i64 = -45;

/// Normal CDF returns exactly 1 above this input (tenths)
pub const DEFAULT_CDF_MAX_INPUT_TENTHS: i64 = 100;

/// Observations retained per series
pub const DEFAULT_OBSERVATION_CAPACITY: usize = 65_535;

pub const BPS_DENOMINATOR: u64 = 10_000;

// ============================================================================
// Iteration Ceilings
// ============================================================================

/// Halley refinement rounds for ln()
pub const MAX_LN_ITERATIONS: usize = 8;

/// Taylor series terms for exp()
pub const EXP_TAYLOR_TERMS: u32 = 16;

// ============================================================================
// Normal CDF Coefficients (Abramowitz & Stegun 26.2.17, scaled by 1e7)
// ============================================================================

/// Fixed-point scale of the CDF coefficients
pub const CDF_COEFFICIENT_SCALE: i128 = 10_000_000;

pub const CDF_P: i128 = 2_316_419;

/// b1..b5, lowest order first
pub const CDF_B: [i128; 5] = [3_193_815, -3_565_638, 17_814_780, -18_212_560, 13_302_740];
