//! # Shared Series Handle
//!
//! Serializes writers and lets readers share a consistent view of one
//! series across threads.

use std::sync::Arc;

use ethnum::I256;
use parking_lot::RwLock;

use crate::errors::CoreResult;
use crate::oracle::gwav::{GwavOracle, ObservedCumulatives};
use crate::oracle::observation::{Observation, ObservationSeries};

/// Cloneable handle to a lock-protected series
#[derive(Debug, Clone)]
pub struct SharedSeries {
    oracle: GwavOracle,
    series: Arc<RwLock<ObservationSeries>>,
}

impl SharedSeries {
    /// Wrap an existing series
    pub fn new(oracle: GwavOracle, series: ObservationSeries) -> Self {
        Self {
            oracle,
            series: Arc::new(RwLock::new(series)),
        }
    }

    /// Allocate an empty series at the oracle's capacity
    pub fn empty(oracle: GwavOracle) -> CoreResult<Self> {
        let series = oracle.new_series()?;
        Ok(Self::new(oracle, series))
    }

    pub fn initialize(&self, value: I256, timestamp: u64) -> CoreResult<()> {
        let mut series = self.series.write();
        self.oracle.initialize(&mut series, value, timestamp)
    }

    pub fn write(&self, value: I256, timestamp: u64) -> CoreResult<()> {
        let mut series = self.series.write();
        self.oracle.write(&mut series, value, timestamp)
    }

    pub fn query_first_before(&self, now: u64, seconds_ago: u64) -> CoreResult<Observation> {
        self.oracle.query_first_before(&self.series.read(), now, seconds_ago)
    }

    pub fn query_first_before_and_scale(&self, now: u64, seconds_ago: u64) -> CoreResult<(I256, u64)> {
        self.oracle
            .query_first_before_and_scale(&self.series.read(), now, seconds_ago)
    }

    pub fn gwav_for_period(&self, now: u64, seconds_ago_a: u64, seconds_ago_b: u64) -> CoreResult<I256> {
        self.oracle
            .gwav_for_period(&self.series.read(), now, seconds_ago_a, seconds_ago_b)
    }

    pub fn observe(&self, now: u64, seconds_agos: &[u64]) -> CoreResult<ObservedCumulatives> {
        self.oracle.observe(&self.series.read(), now, seconds_agos)
    }

    /// Consistent copy of the current series
    pub fn snapshot(&self) -> ObservationSeries {
        self.series.read().clone()
    }
}
