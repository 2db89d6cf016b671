//! Persistence of an observation series as JSON

use std::fs;
use std::path::Path;

use vega_core::ObservationSeries;

use crate::error::{CliError, CliResult};

fn io_error(path: &Path, err: std::io::Error) -> CliError {
    CliError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Load and validate a series file
pub fn load_series(path: impl AsRef<Path>) -> CliResult<ObservationSeries> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let series: ObservationSeries = serde_json::from_str(&content)?;
    series.validate()?;

    log::debug!(
        "Loaded series from {} ({} of {} slots written)",
        path.display(),
        series.len(),
        series.capacity()
    );
    Ok(series)
}

/// Write a series file, replacing any previous contents
pub fn save_series(path: impl AsRef<Path>, series: &ObservationSeries) -> CliResult<()> {
    let path = path.as_ref();
    let content = serde_json::to_string(series)?;
    fs::write(path, content).map_err(|e| io_error(path, e))?;
    log::debug!("Saved series to {}", path.display());
    Ok(())
}
