//! # Core Type Definitions
//!
//! Value types exchanged with the pricing engine.

pub mod pricing;

// Re-export all types
pub use pricing::*;
