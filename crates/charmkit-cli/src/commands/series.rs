//! Series command - resolve the series a deployment would use

use charmkit_core::{Charm, read_charm, series_for};
use serde::Serialize;
use std::path::Path;

use crate::error::{CliError, Result};

#[derive(Serialize)]
struct SeriesOutput<'a> {
    charm: &'a str,
    requested: &'a str,
    series: &'a str,
    supported: &'a [String],
}

pub fn run(path: &Path, requested: &str, json: bool) -> Result<()> {
    let charm = read_charm(path)?;
    let series = series_for(&charm, requested)?;

    tracing::debug!(charm = %charm.meta().name, requested, %series, "resolved series");

    if json {
        let output = SeriesOutput {
            charm: &charm.meta().name,
            requested,
            series: &series,
            supported: &charm.meta().series,
        };
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| CliError::internal(format!("JSON serialization failed: {e}")))?;
        println!("{}", rendered);
    } else {
        println!("{}", series);
    }

    Ok(())
}
