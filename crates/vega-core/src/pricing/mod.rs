//! # Option Pricing
//!
//! Black-Scholes prices and greeks on top of the fixed-point math layer.

pub mod black_scholes;

pub use black_scholes::BlackScholes;
