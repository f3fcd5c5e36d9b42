//! Output formatting and persistence for comparison results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export of ratios.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::ratio::PriceRatioTable;
use crate::analyzers::types::ComparisonReport;
use csv::WriterBuilder;
use std::path::Path;

#[derive(Serialize)]
struct RatioRow<'a> {
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "RegionName")]
    region_name: &'a str,
    #[serde(rename = "PriceRatio")]
    price_ratio: f64,
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &ComparisonReport) {
    debug!("{:#?}", report);
}

/// Logs the report as pretty-printed JSON.
pub fn print_json(report: &ComparisonReport) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Writes one `State,RegionName,PriceRatio` row per region, replacing any
/// existing file at `path`.
pub fn write_ratios(path: impl AsRef<Path>, ratios: &PriceRatioTable) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = ratios.len(), "Writing ratio CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for (region, price_ratio) in ratios.iter() {
        writer.serialize(RatioRow {
            state: &region.state,
            region_name: &region.region_name,
            price_ratio,
        })?;
    }
    writer.flush()?;

    Ok(())
}
