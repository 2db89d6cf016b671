//! # Geometric Time-Weighted Average Oracle
//!
//! Tracks `sum(ln(value) * dt)` over an [`ObservationSeries`] so that the
//! geometric mean over any retained window is
//! `exp((acc_b - acc_a) / (t_b - t_a))`. Accumulators are kept at precise
//! scale; only the final mean is rounded to standard scale, so a constant
//! series averages back to exactly its value.
//!
//! Lookups resolve a target time to the observation at or before it:
//! - newer than everything: the newest observation
//! - older than everything retained: the oldest observation, with its
//!   accumulator rescaled linearly to the target time
//! - otherwise: bounded binary search over the circular buffer

use ethnum::I256;

use crate::config::EngineConfig;
use crate::errors::{CoreError, CoreResult};
use crate::math::fixed_point::FixedPointMath;
use crate::math::safe_math::{safe_add, safe_div, safe_mul, safe_sub};
use crate::oracle::observation::{Observation, ObservationSeries};

/// Accumulators and timestamps resolved for a batch of lookbacks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedCumulatives {
    pub accumulators: Vec<I256>,
    pub timestamps: Vec<u64>,
}

/// Stateless operations over caller-owned series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GwavOracle {
    math: FixedPointMath,
    capacity: usize,
}

impl Default for GwavOracle {
    fn default() -> Self {
        Self {
            math: FixedPointMath::default(),
            capacity: EngineConfig::default().observation_capacity,
        }
    }
}

impl GwavOracle {
    pub fn new(config: &EngineConfig) -> CoreResult<Self> {
        Ok(Self {
            math: FixedPointMath::new(config)?,
            capacity: config.observation_capacity,
        })
    }

    pub fn math(&self) -> &FixedPointMath {
        &self.math
    }

    /// Configured series capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Allocate an empty series at the configured capacity
    pub fn new_series(&self) -> CoreResult<ObservationSeries> {
        ObservationSeries::with_capacity(self.capacity)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Record the first observation at slot 0 and point the cursor at it
    pub fn initialize(&self, series: &mut ObservationSeries, value: I256, timestamp: u64) -> CoreResult<()> {
        if series.is_initialized() {
            log::warn!("Rejecting re-initialization of series at {}", timestamp);
            return Err(CoreError::AlreadyInitialized);
        }
        let log_value = self.log_value(value)?;

        series.reset_to_first(Observation {
            accumulator: safe_mul(log_value, I256::from(timestamp))?,
            last_value: value,
            timestamp,
            initialized: true,
        });
        log::debug!("Initialized series at {} with value {}", timestamp, value);
        Ok(())
    }

    /// Record `value` at `timestamp`
    pub fn write(&self, series: &mut ObservationSeries, value: I256, timestamp: u64) -> CoreResult<()> {
        if !series.is_initialized() {
            log::warn!("Write at {} to uninitialized series", timestamp);
            return Err(CoreError::NotInitialized);
        }
        if value <= I256::ZERO {
            return Err(CoreError::invalid_input("value", format!("{} must be positive", value)));
        }

        let prior = series.newest();
        if timestamp < prior.timestamp {
            log::warn!("Non-monotonic write at {} (last recorded {})", timestamp, prior.timestamp);
            return Err(CoreError::NonMonotonicTimestamp {
                timestamp,
                last: prior.timestamp,
            });
        }

        if timestamp == prior.timestamp {
            series.set(series.cursor(), Observation { last_value: value, ..prior });
            return Ok(());
        }
        if value == prior.last_value {
            return Ok(());
        }

        let accumulator = self.extend(&prior, timestamp)?;
        series.advance(Observation {
            accumulator,
            last_value: value,
            timestamp,
            initialized: true,
        });
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Observation at or before `now - seconds_ago`
    pub fn query_first_before(
        &self,
        series: &ObservationSeries,
        now: u64,
        seconds_ago: u64,
    ) -> CoreResult<Observation> {
        if !series.is_initialized() {
            return Err(CoreError::NotInitialized);
        }
        let target = now.checked_sub(seconds_ago).ok_or_else(|| {
            log::warn!("Query {}s ago at {} reaches before epoch", seconds_ago, now);
            CoreError::QueryBeforeEpoch { seconds_ago, now }
        })?;

        let newest = series.newest();
        if newest.timestamp <= target {
            return Ok(newest);
        }

        let oldest = series.oldest();
        if oldest.timestamp > target {
            // Linear rescale of the oldest accumulator
            log::debug!(
                "Target {} precedes oldest observation {}, extrapolating",
                target,
                oldest.timestamp
            );
            let accumulator = safe_div(
                safe_mul(oldest.accumulator, I256::from(target))?,
                I256::from(oldest.timestamp),
            )?;
            return Ok(Observation {
                accumulator,
                timestamp: target,
                ..oldest
            });
        }

        self.binary_search(series, target)
    }

    /// Accumulator extended from the resolved observation to exactly `now - seconds_ago`
    pub fn query_first_before_and_scale(
        &self,
        series: &ObservationSeries,
        now: u64,
        seconds_ago: u64,
    ) -> CoreResult<(I256, u64)> {
        let observation = self.query_first_before(series, now, seconds_ago)?;
        let target = now - seconds_ago;
        Ok((self.extend(&observation, target)?, target))
    }

    /// Geometric mean between two lookbacks, standard scale
    pub fn gwav_for_period(
        &self,
        series: &ObservationSeries,
        now: u64,
        seconds_ago_a: u64,
        seconds_ago_b: u64,
    ) -> CoreResult<I256> {
        let (accumulator_a, timestamp_a) = self.query_first_before_and_scale(series, now, seconds_ago_a)?;
        let (accumulator_b, timestamp_b) = self.query_first_before_and_scale(series, now, seconds_ago_b)?;

        let mean_log = if timestamp_a == timestamp_b {
            // Average since inception
            if timestamp_b == 0 {
                return Err(CoreError::DivisionByZero);
            }
            safe_div(accumulator_b, I256::from(timestamp_b))?
        } else {
            let elapsed = safe_sub(I256::from(timestamp_b), I256::from(timestamp_a))?;
            safe_div(safe_sub(accumulator_b, accumulator_a)?, elapsed)?
        };

        self.math.precise_to_decimal(self.math.exp(mean_log)?)
    }

    /// Batched [`query_first_before`](Self::query_first_before)
    pub fn observe(
        &self,
        series: &ObservationSeries,
        now: u64,
        seconds_agos: &[u64],
    ) -> CoreResult<ObservedCumulatives> {
        let mut cumulatives = ObservedCumulatives {
            accumulators: Vec::with_capacity(seconds_agos.len()),
            timestamps: Vec::with_capacity(seconds_agos.len()),
        };
        for &seconds_ago in seconds_agos {
            let observation = self.query_first_before(series, now, seconds_ago)?;
            cumulatives.accumulators.push(observation.accumulator);
            cumulatives.timestamps.push(observation.timestamp);
        }
        Ok(cumulatives)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// ln of a standard-scale value, at precise scale
    fn log_value(&self, value: I256) -> CoreResult<I256> {
        if value <= I256::ZERO {
            return Err(CoreError::invalid_input("value", format!("{} must be positive", value)));
        }
        self.math.ln(self.math.decimal_to_precise(value)?)
    }

    /// `accumulator + ln(last_value) * (timestamp - observation.timestamp)`
    fn extend(&self, observation: &Observation, timestamp: u64) -> CoreResult<I256> {
        let elapsed = timestamp - observation.timestamp;
        if elapsed == 0 {
            return Ok(observation.accumulator);
        }
        let log_value = self.log_value(observation.last_value)?;
        safe_add(observation.accumulator, safe_mul(log_value, I256::from(elapsed))?)
    }

    /// Search `[oldest, newest]` for `ts <= target < next.ts`
    ///
    /// Callers guarantee `oldest.ts <= target < newest.ts`.
    fn binary_search(&self, series: &ObservationSeries, target: u64) -> CoreResult<Observation> {
        let capacity = series.capacity();
        let mut lo = series.oldest_index();
        let newest = if series.cursor() >= lo {
            series.cursor()
        } else {
            series.cursor() + capacity
        };
        let mut hi = newest;

        let max_rounds = ceil_log2(capacity) + 1;
        for _ in 0..max_rounds {
            if lo > hi {
                break;
            }
            let mid = (lo + hi) / 2;
            let before = series.get(mid);

            if !before.initialized {
                // Never-written slots sort after everything
                match mid.checked_sub(1) {
                    Some(next_hi) => hi = next_hi,
                    None => break,
                }
                continue;
            }

            if before.timestamp <= target {
                let after = series.get(mid + 1);
                if mid < newest && after.initialized && target < after.timestamp {
                    return Ok(before);
                }
                lo = mid + 1;
            } else {
                match mid.checked_sub(1) {
                    Some(next_hi) => hi = next_hi,
                    None => break,
                }
            }
        }

        log::warn!("Binary search for {} exhausted {} rounds", target, max_rounds);
        Err(CoreError::CorruptSeries("no observation brackets the target"))
    }
}

fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E18: i128 = 1_000_000_000_000_000_000;

    fn oracle(capacity: usize) -> GwavOracle {
        GwavOracle::new(&EngineConfig {
            observation_capacity: capacity,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn v(units: i128) -> I256 {
        I256::new(units * E18)
    }

    #[test]
    fn test_ceil_log2() {
        assert_eq!(ceil_log2(2), 1);
        assert_eq!(ceil_log2(3), 2);
        assert_eq!(ceil_log2(4), 2);
        assert_eq!(ceil_log2(5), 3);
        assert_eq!(ceil_log2(65_535), 16);
    }

    #[test]
    fn test_initialize() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();

        oracle.initialize(&mut series, v(1), 100).unwrap();
        let first = series.newest();
        assert_eq!(first.accumulator, I256::ZERO);
        assert_eq!(first.last_value, v(1));
        assert_eq!(first.timestamp, 100);
        assert_eq!(series.cursor(), 0);

        assert!(matches!(
            oracle.initialize(&mut series, v(1), 200),
            Err(CoreError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_initialize_resets_stale_cursor() {
        let oracle = oracle(4);
        // Empty slots but a cursor left pointing past slot 0
        let mut series: ObservationSeries = serde_json::from_value(serde_json::json!({
            "observations": vec![Observation::EMPTY; 4],
            "cursor": 2,
        }))
        .unwrap();
        assert!(!series.is_initialized());

        oracle.initialize(&mut series, v(3), 100).unwrap();
        assert_eq!(series.cursor(), 0);
        assert!(series.is_initialized());
        assert_eq!(series.newest().timestamp, 100);
        assert!(series.validate().is_ok());

        oracle.write(&mut series, v(5), 200).unwrap();
        assert_eq!(series.cursor(), 1);
        assert_eq!(oracle.query_first_before(&series, 200, 50).unwrap().timestamp, 100);
    }

    #[test]
    fn test_initialize_rejects_non_positive() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        assert!(oracle.initialize(&mut series, I256::ZERO, 100).is_err());
        assert!(!series.is_initialized());
    }

    #[test]
    fn test_write_cases() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(1), 100).unwrap();

        // (a) same timestamp overwrites in place
        oracle.write(&mut series, v(2), 100).unwrap();
        assert_eq!(series.cursor(), 0);
        assert_eq!(series.newest().last_value, v(2));

        // (c) unchanged value is a no-op
        oracle.write(&mut series, v(2), 150).unwrap();
        assert_eq!(series.cursor(), 0);
        assert_eq!(series.newest().timestamp, 100);

        // (b) new value appends, accumulating the prior value's log
        oracle.write(&mut series, v(4), 200).unwrap();
        assert_eq!(series.cursor(), 1);
        let ln2 = oracle.math().ln(oracle.math().decimal_to_precise(v(2)).unwrap()).unwrap();
        assert_eq!(series.newest().accumulator, ln2 * I256::new(100));
        assert_eq!(series.newest().last_value, v(4));
    }

    #[test]
    fn test_write_errors() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        assert!(matches!(
            oracle.write(&mut series, v(1), 100),
            Err(CoreError::NotInitialized)
        ));

        oracle.initialize(&mut series, v(1), 100).unwrap();
        assert!(matches!(
            oracle.write(&mut series, v(2), 99),
            Err(CoreError::NonMonotonicTimestamp { timestamp: 99, last: 100 })
        ));
        assert!(oracle.write(&mut series, I256::new(-1), 200).is_err());
        assert_eq!(series.cursor(), 0);
    }

    #[test]
    fn test_query_cases() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(1), 100).unwrap();
        oracle.write(&mut series, v(2), 200).unwrap();
        oracle.write(&mut series, v(3), 300).unwrap();
        oracle.write(&mut series, v(4), 400).unwrap();

        // Case A
        assert_eq!(oracle.query_first_before(&series, 500, 0).unwrap().timestamp, 400);
        assert_eq!(oracle.query_first_before(&series, 500, 100).unwrap().timestamp, 400);

        // Case C
        assert_eq!(oracle.query_first_before(&series, 500, 101).unwrap().timestamp, 300);
        assert_eq!(oracle.query_first_before(&series, 500, 250).unwrap().timestamp, 200);
        assert_eq!(oracle.query_first_before(&series, 500, 400).unwrap().timestamp, 100);

        // Case B
        let extrapolated = oracle.query_first_before(&series, 500, 450).unwrap();
        assert_eq!(extrapolated.timestamp, 50);
        assert_eq!(extrapolated.last_value, v(1));

        assert!(matches!(
            oracle.query_first_before(&series, 500, 501),
            Err(CoreError::QueryBeforeEpoch { seconds_ago: 501, now: 500 })
        ));
    }

    #[test]
    fn test_query_and_scale_extends_to_target() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(2), 100).unwrap();

        let ln2 = oracle.math().ln(oracle.math().decimal_to_precise(v(2)).unwrap()).unwrap();
        let (accumulator, target) = oracle.query_first_before_and_scale(&series, 160, 10).unwrap();
        assert_eq!(target, 150);
        assert_eq!(accumulator, ln2 * I256::new(150));
    }

    #[test]
    fn test_gwav_of_two_levels() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(1), 1_000).unwrap();
        oracle.write(&mut series, v(4), 2_000).unwrap();

        // Half the window at 1, half at 4: geometric mean 2
        let gwav = oracle.gwav_for_period(&series, 3_000, 2_000, 0).unwrap();
        assert_eq!(gwav, v(2));
    }

    #[test]
    fn test_gwav_at_epoch_is_division_by_zero() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(3), 0).unwrap();
        assert!(matches!(
            oracle.gwav_for_period(&series, 0, 0, 0),
            Err(CoreError::DivisionByZero)
        ));
    }

    #[test]
    fn test_observe_batches_lookups() {
        let oracle = oracle(8);
        let mut series = oracle.new_series().unwrap();
        oracle.initialize(&mut series, v(1), 100).unwrap();
        oracle.write(&mut series, v(2), 200).unwrap();

        let observed = oracle.observe(&series, 300, &[0, 150, 200]).unwrap();
        assert_eq!(observed.timestamps, vec![200, 100, 100]);
        assert_eq!(observed.accumulators.len(), 3);
        assert_eq!(observed.accumulators[1], I256::ZERO);

        assert!(oracle.observe(&series, 300, &[0, 301]).is_err());
    }
}
