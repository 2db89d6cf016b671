//! # Engine Configuration
//!
//! Scale factors, protocol minimums and buffer capacity are carried in an
//! immutable [`EngineConfig`] that is threaded into the math, pricing and
//! oracle engines at construction. The defaults reproduce the reference
//! protocol constants; a TOML file may override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{CoreError, CoreResult};

/// Engine configuration loaded from TOML or built from defaults
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimals of public inputs and outputs
    pub standard_decimals: u32,

    /// Decimals used internally for sqrt/ln/exp/CDF
    pub precise_decimals: u32,

    /// Seconds in the annualisation year
    pub seconds_per_year: u64,

    /// Floor on time to expiry before annualising (seconds)
    pub min_time_to_expiry_secs: u64,

    /// Floor on volatility (basis points)
    pub min_volatility_bps: u64,

    /// Floor on time to expiry when standardizing vega (days)
    pub vega_min_days: u64,

    /// Period standardized vega is quoted over (days)
    pub vega_normalisation_days: u64,

    /// exp() overflow ceiling (whole units)
    pub max_exp_input: u32,

    /// exp() underflows to 0 below minus this many units
    pub exp_underflow_input: u32,

    /// Normal CDF clamps to 0 below this input (tenths)
    pub cdf_min_input_tenths: i64,

    /// Normal CDF clamps to 1 above this input (tenths)
    pub cdf_max_input_tenths: i64,

    /// Observations retained per GWAV series
    pub observation_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_decimals: DEFAULT_STANDARD_DECIMALS,
            precise_decimals: DEFAULT_PRECISE_DECIMALS,
            seconds_per_year: SECONDS_PER_YEAR,
            min_time_to_expiry_secs: DEFAULT_MIN_TIME_TO_EXPIRY_SECS,
            min_volatility_bps: DEFAULT_MIN_VOLATILITY_BPS,
            vega_min_days: DEFAULT_VEGA_MIN_DAYS,
            vega_normalisation_days: DEFAULT_VEGA_NORMALISATION_DAYS,
            max_exp_input: DEFAULT_MAX_EXP_INPUT,
            exp_underflow_input: DEFAULT_EXP_UNDERFLOW_INPUT,
            cdf_min_input_tenths: DEFAULT_CDF_MIN_INPUT_TENTHS,
            cdf_max_input_tenths: DEFAULT_CDF_MAX_INPUT_TENTHS,
            observation_capacity: DEFAULT_OBSERVATION_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigIo(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Serialize configuration to TOML text
    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.precise_decimals < 18 || self.precise_decimals > REFERENCE_DECIMALS {
            return Err(CoreError::invalid_config(
                "precise_decimals",
                format!("{} not in 18..={}", self.precise_decimals, REFERENCE_DECIMALS),
            ));
        }

        if self.standard_decimals < 6 || self.standard_decimals > self.precise_decimals {
            return Err(CoreError::invalid_config(
                "standard_decimals",
                format!("{} not in 6..={}", self.standard_decimals, self.precise_decimals),
            ));
        }

        if self.seconds_per_year == 0 {
            return Err(CoreError::invalid_config("seconds_per_year", "must be greater than 0"));
        }

        if self.min_time_to_expiry_secs == 0 {
            return Err(CoreError::invalid_config("min_time_to_expiry_secs", "must be greater than 0"));
        }

        if self.min_volatility_bps == 0 {
            return Err(CoreError::invalid_config("min_volatility_bps", "must be greater than 0"));
        }

        if self.vega_min_days == 0 {
            return Err(CoreError::invalid_config("vega_min_days", "must be greater than 0"));
        }

        if self.vega_normalisation_days == 0 {
            return Err(CoreError::invalid_config("vega_normalisation_days", "must be greater than 0"));
        }

        if self.max_exp_input == 0 || self.max_exp_input > DEFAULT_MAX_EXP_INPUT {
            return Err(CoreError::invalid_config(
                "max_exp_input",
                format!("{} not in 1..={}", self.max_exp_input, DEFAULT_MAX_EXP_INPUT),
            ));
        }

        if self.exp_underflow_input == 0 {
            return Err(CoreError::invalid_config("exp_underflow_input", "must be greater than 0"));
        }

        if self.cdf_min_input_tenths >= 0 || self.cdf_max_input_tenths <= 0 {
            return Err(CoreError::invalid_config(
                "cdf_min_input_tenths",
                format!(
                    "bounds [{}, {}] must straddle zero",
                    self.cdf_min_input_tenths, self.cdf_max_input_tenths
                ),
            ));
        }

        // x^2/2 at the upper CDF bound must stay inside exp()'s domain
        let max_cdf_input = self.cdf_max_input_tenths as u128;
        if max_cdf_input * max_cdf_input > 200 * self.max_exp_input as u128 {
            return Err(CoreError::invalid_config(
                "cdf_max_input_tenths",
                format!("{} exceeds the exp() ceiling", self.cdf_max_input_tenths),
            ));
        }

        if self.observation_capacity < 2 {
            return Err(CoreError::invalid_config(
                "observation_capacity",
                format!("{} is below the minimum of 2", self.observation_capacity),
            ));
        }

        Ok(())
    }
}
