//! # Oracle Module
//!
//! Geometric time-weighted averages over a bounded circular series of
//! observations. One series per tracked metric.

pub mod gwav;
pub mod observation;
pub mod shared;

pub use gwav::{GwavOracle, ObservedCumulatives};
pub use observation::{Observation, ObservationSeries};
pub use shared::SharedSeries;
