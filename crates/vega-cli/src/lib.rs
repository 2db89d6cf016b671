pub mod commands;
pub mod error;
pub mod series_file;

pub use commands::{GwavOutput, ObserveOutput, QuoteArgs, QuoteOutput, RecordOutcome};
pub use error::{CliError, CliResult};
pub use series_file::{load_series, save_series};
