//! Subcommand implementations. Each returns a serializable result that
//! `main` prints as JSON.

use std::path::Path;

use clap::Args;
use serde::Serialize;
use vega_core::math::{format_decimal, parse_decimal};
use vega_core::{BlackScholes, BlackScholesInputs, EngineConfig, GwavOracle};

use crate::error::{CliError, CliResult};
use crate::series_file::{load_series, save_series};

/// Option parameters as decimal strings
#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: String,

    /// Strike price
    #[arg(long)]
    pub strike: String,

    /// Annualised volatility, e.g. 0.2 for 20%
    #[arg(long = "vol")]
    pub volatility: String,

    /// Annualised risk-free rate
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rate: String,

    /// Seconds until expiry
    #[arg(long)]
    pub expiry_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteOutput {
    pub call_price: String,
    pub put_price: String,
    pub call_delta: String,
    pub put_delta: String,
    pub vega: String,
    pub std_vega: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Initialized,
    Written,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GwavOutput {
    pub gwav: String,
    pub from_timestamp: u64,
    pub to_timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObserveOutput {
    pub timestamps: Vec<u64>,
    pub accumulators: Vec<String>,
}

/// Price a call/put pair
pub fn quote(config: &EngineConfig, args: &QuoteArgs) -> CliResult<QuoteOutput> {
    let decimals = config.standard_decimals;
    let inputs = BlackScholesInputs {
        time_to_expiry_secs: args.expiry_secs,
        volatility: parse_decimal(&args.volatility, decimals)?,
        spot: parse_decimal(&args.spot, decimals)?,
        strike: parse_decimal(&args.strike, decimals)?,
        rate: parse_decimal(&args.rate, decimals)?,
    };

    let engine = BlackScholes::new(config)?;
    let quote = engine.price_options(&inputs)?;
    log::debug!("Quoted {:?}", inputs);

    Ok(QuoteOutput {
        call_price: format_decimal(quote.call_price, decimals),
        put_price: format_decimal(quote.put_price, decimals),
        call_delta: format_decimal(quote.call_delta, decimals),
        put_delta: format_decimal(quote.put_delta, decimals),
        vega: format_decimal(quote.vega, decimals),
        std_vega: format_decimal(quote.std_vega, decimals),
    })
}

/// Append `value` to the series at `path`, creating it on first use
pub fn record(
    config: &EngineConfig,
    path: impl AsRef<Path>,
    value: &str,
    timestamp: u64,
) -> CliResult<RecordOutcome> {
    let path = path.as_ref();
    let oracle = GwavOracle::new(config)?;
    let value = parse_decimal(value, config.standard_decimals)?;

    let (series, outcome) = if path.exists() {
        let mut series = load_series(path)?;
        oracle.write(&mut series, value, timestamp)?;
        (series, RecordOutcome::Written)
    } else {
        let mut series = oracle.new_series()?;
        oracle.initialize(&mut series, value, timestamp)?;
        log::info!("Created series {} with {} slots", path.display(), series.capacity());
        (series, RecordOutcome::Initialized)
    };

    save_series(path, &series)?;
    Ok(outcome)
}

/// Geometric mean of the series between two lookbacks
pub fn gwav(
    config: &EngineConfig,
    path: impl AsRef<Path>,
    now: u64,
    from_seconds_ago: u64,
    to_seconds_ago: u64,
) -> CliResult<GwavOutput> {
    if to_seconds_ago > from_seconds_ago {
        return Err(CliError::InvalidArgument {
            name: "to",
            reason: format!("{}s ago is earlier than the window start {}s ago", to_seconds_ago, from_seconds_ago),
        });
    }

    let oracle = GwavOracle::new(config)?;
    let series = load_series(path)?;
    let gwav = oracle.gwav_for_period(&series, now, from_seconds_ago, to_seconds_ago)?;

    Ok(GwavOutput {
        gwav: format_decimal(gwav, config.standard_decimals),
        from_timestamp: now.saturating_sub(from_seconds_ago),
        to_timestamp: now.saturating_sub(to_seconds_ago),
    })
}

/// Raw accumulators at each lookback, printed at precise scale
pub fn observe(
    config: &EngineConfig,
    path: impl AsRef<Path>,
    now: u64,
    seconds_agos: &[u64],
) -> CliResult<ObserveOutput> {
    let oracle = GwavOracle::new(config)?;
    let series = load_series(path)?;
    let observed = oracle.observe(&series, now, seconds_agos)?;

    Ok(ObserveOutput {
        timestamps: observed.timestamps,
        accumulators: observed
            .accumulators
            .into_iter()
            .map(|accumulator| format_decimal(accumulator, config.precise_decimals))
            .collect(),
    })
}
