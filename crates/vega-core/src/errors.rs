//! # Core Error Types
//!
//! Every fallible operation in the core returns [`CoreResult`]. Errors fall
//! into three groups, reported by [`CoreError::kind`]:
//!
//! - domain errors: an input outside a function's valid domain
//! - invariant violations: a caller broke an ordering or lifecycle rule
//! - configuration errors: an `EngineConfig` that cannot be used
//!
//! Values that are valid but outside an approximation's accurate range are
//! clamped silently and never reach this module.

use thiserror::Error;

/// Broad classification of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input outside a function's domain
    Domain,
    /// Caller bug or clock skew detected by the oracle
    Invariant,
    /// Unusable configuration
    Config,
}

/// Core errors shared by the math, pricing and oracle modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ========================================================================
    // Domain Errors
    // ========================================================================

    #[error("Math overflow")]
    MathOverflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid logarithm input: {0}")]
    InvalidLogarithmInput(String),

    #[error("Exponential overflow: {0} exceeds the supported ceiling")]
    ExponentialOverflow(String),

    #[error("Square root of negative value")]
    NegativeSquareRoot,

    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid decimal string: {0}")]
    InvalidDecimal(String),

    // ========================================================================
    // Oracle Invariant Violations
    // ========================================================================

    #[error("Non-monotonic timestamp {timestamp} (last recorded {last})")]
    NonMonotonicTimestamp { timestamp: u64, last: u64 },

    #[error("Query reaches before epoch: {seconds_ago}s ago at time {now}")]
    QueryBeforeEpoch { seconds_ago: u64, now: u64 },

    #[error("Observation series not initialized")]
    NotInitialized,

    #[error("Observation series already initialized")]
    AlreadyInitialized,

    #[error("Observation series is corrupt: {0}")]
    CorruptSeries(&'static str),

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid config '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Failed to read config: {0}")]
    ConfigIo(String),

    #[error("Failed to parse config: {0}")]
    ConfigParse(String),
}

/// Result type using core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MathOverflow
            | Self::DivisionByZero
            | Self::InvalidLogarithmInput(_)
            | Self::ExponentialOverflow(_)
            | Self::NegativeSquareRoot
            | Self::InvalidInput { .. }
            | Self::InvalidDecimal(_) => ErrorKind::Domain,

            Self::NonMonotonicTimestamp { .. }
            | Self::QueryBeforeEpoch { .. }
            | Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::CorruptSeries(_) => ErrorKind::Invariant,

            Self::InvalidConfig { .. } | Self::ConfigIo(_) | Self::ConfigParse(_) => ErrorKind::Config,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field, reason: reason.into() }
    }
}
