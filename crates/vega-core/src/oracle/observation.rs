//! # Observation Series
//!
//! Fixed-capacity circular buffer of log-value accumulators. Slots are
//! allocated once; on wraparound the oldest entry is overwritten.

use ethnum::I256;
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

/// One recorded point of a geometric time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Running sum of ln(value) * elapsed seconds, precise scale
    pub accumulator: I256,
    /// Most recent value written at `timestamp`, standard scale
    pub last_value: I256,
    /// Seconds since epoch
    pub timestamp: u64,
    /// Whether this slot has ever been written
    pub initialized: bool,
}

impl Observation {
    /// A never-written slot
    pub const EMPTY: Self = Self {
        accumulator: I256::ZERO,
        last_value: I256::ZERO,
        timestamp: 0,
        initialized: false,
    };
}

impl Default for Observation {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Circular buffer of observations plus the index of the newest one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationSeries {
    observations: Vec<Observation>,
    cursor: usize,
}

impl ObservationSeries {
    /// Allocate an empty series with `capacity` slots
    pub fn with_capacity(capacity: usize) -> CoreResult<Self> {
        if capacity < 2 {
            return Err(CoreError::invalid_input(
                "capacity",
                format!("{} is below the minimum of 2", capacity),
            ));
        }
        Ok(Self {
            observations: vec![Observation::EMPTY; capacity],
            cursor: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.observations.len()
    }

    /// Index of the newest observation
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_initialized(&self) -> bool {
        self.observations[self.cursor].initialized
    }

    /// Number of written slots
    pub fn len(&self) -> usize {
        self.observations.iter().filter(|o| o.initialized).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_initialized()
    }

    /// Slot at `index`, wrapped to capacity
    pub fn get(&self, index: usize) -> Observation {
        self.observations[index % self.capacity()]
    }

    pub fn newest(&self) -> Observation {
        self.observations[self.cursor]
    }

    /// Slot index of the oldest retained observation
    pub fn oldest_index(&self) -> usize {
        let next = (self.cursor + 1) % self.capacity();
        if self.observations[next].initialized {
            next
        } else {
            0
        }
    }

    pub fn oldest(&self) -> Observation {
        self.observations[self.oldest_index()]
    }

    /// Written observations, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Observation> + '_ {
        let start = self.oldest_index();
        let capacity = self.capacity();
        (0..capacity)
            .map(move |offset| &self.observations[(start + offset) % capacity])
            .filter(|o| o.initialized)
    }

    /// Check structural invariants, e.g. after deserializing
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity() < 2 {
            return Err(CoreError::CorruptSeries("capacity below 2"));
        }
        if self.cursor >= self.capacity() {
            return Err(CoreError::CorruptSeries("cursor out of range"));
        }
        if self.is_empty() {
            if self.observations.iter().any(|o| o.initialized) {
                return Err(CoreError::CorruptSeries("written slots without a newest observation"));
            }
            if self.cursor != 0 {
                return Err(CoreError::CorruptSeries("empty series with a non-zero cursor"));
            }
            return Ok(());
        }

        let mut previous: Option<u64> = None;
        for observation in self.iter() {
            if previous.is_some_and(|last| observation.timestamp <= last) {
                return Err(CoreError::CorruptSeries("timestamps not strictly increasing"));
            }
            if observation.last_value <= I256::ZERO {
                return Err(CoreError::CorruptSeries("non-positive value"));
            }
            previous = Some(observation.timestamp);
        }

        if previous != Some(self.newest().timestamp) {
            return Err(CoreError::CorruptSeries("cursor does not point at the newest observation"));
        }
        Ok(())
    }

    pub(crate) fn set(&mut self, index: usize, observation: Observation) {
        let capacity = self.capacity();
        self.observations[index % capacity] = observation;
    }

    /// Make `observation` the only entry, at slot 0
    pub(crate) fn reset_to_first(&mut self, observation: Observation) {
        self.cursor = 0;
        self.observations[0] = observation;
    }

    pub(crate) fn advance(&mut self, observation: Observation) {
        self.cursor = (self.cursor + 1) % self.capacity();
        self.observations[self.cursor] = observation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(timestamp: u64) -> Observation {
        Observation {
            accumulator: I256::from(timestamp),
            last_value: I256::ONE,
            timestamp,
            initialized: true,
        }
    }

    #[test]
    fn test_empty_series() {
        let series = ObservationSeries::with_capacity(4).unwrap();
        assert_eq!(series.capacity(), 4);
        assert_eq!(series.cursor(), 0);
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
        assert_eq!(series.iter().count(), 0);
        assert!(series.validate().is_ok());

        assert!(ObservationSeries::with_capacity(1).is_err());
    }

    #[test]
    fn test_oldest_before_and_after_wrap() {
        let mut series = ObservationSeries::with_capacity(3).unwrap();
        series.set(0, obs(10));
        series.advance(obs(20));
        assert_eq!(series.oldest_index(), 0);
        assert_eq!(series.newest().timestamp, 20);

        series.advance(obs(30));
        series.advance(obs(40));
        assert_eq!(series.cursor(), 0);
        assert_eq!(series.oldest_index(), 1);
        assert_eq!(series.oldest().timestamp, 20);

        let timestamps: Vec<u64> = series.iter().map(|o| o.timestamp).collect();
        assert_eq!(timestamps, vec![20, 30, 40]);
        assert!(series.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_corruption() {
        let mut series = ObservationSeries::with_capacity(3).unwrap();
        series.set(0, obs(10));
        series.advance(obs(5));
        assert!(matches!(series.validate(), Err(CoreError::CorruptSeries(_))));

        let mut series = ObservationSeries::with_capacity(3).unwrap();
        series.set(1, obs(10));
        assert!(matches!(series.validate(), Err(CoreError::CorruptSeries(_))));
    }

    #[test]
    fn test_validate_rejects_empty_series_with_cursor() {
        let series = ObservationSeries {
            observations: vec![Observation::EMPTY; 4],
            cursor: 2,
        };
        assert!(series.is_empty());
        assert!(matches!(
            series.validate(),
            Err(CoreError::CorruptSeries("empty series with a non-zero cursor"))
        ));

        let mut series = series;
        series.reset_to_first(obs(10));
        assert_eq!(series.cursor(), 0);
        assert!(series.validate().is_ok());
    }
}
