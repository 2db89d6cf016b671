//! # Mathematical Functions
//!
//! Deterministic fixed-point replacements for elementary and transcendental
//! operations. No floating point is used anywhere in this module.

pub mod decimal;
pub mod fixed_point;
pub mod normal;
pub mod safe_math;
pub mod transcendental;

// Re-export commonly used items
pub use decimal::{format_decimal, parse_decimal};
pub use fixed_point::FixedPointMath;
pub use safe_math::*;
