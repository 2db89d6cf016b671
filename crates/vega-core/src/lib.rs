//! # Vega Core - Deterministic Options Pricing
//!
//! Fixed-point numerical core of an options protocol. It provides:
//!
//! - Scaled integer arithmetic with `ln`, `exp`, `sqrt` and the normal CDF
//! - Black-Scholes prices, delta, vega and standardized vega
//! - A geometric time-weighted average oracle over a circular series
//! - Configuration and error types shared by all of the above
//!
//! No floating point is used anywhere: results are bit-reproducible.

// Re-export all modules
pub mod config;
pub mod constants;
pub mod errors;
pub mod math;
pub mod oracle;
pub mod pricing;
pub mod types;

// Re-export commonly used items
pub use config::EngineConfig;
pub use errors::{CoreError, CoreResult, ErrorKind};
pub use math::FixedPointMath;
pub use oracle::{GwavOracle, Observation, ObservationSeries, ObservedCumulatives, SharedSeries};
pub use pricing::BlackScholes;
pub use types::*;
