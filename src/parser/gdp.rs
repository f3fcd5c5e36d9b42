//! Parser for the quarterly GDP sheet (CSV export of `gdplev.xls`).
//!
//! The export has a ragged header region and annual figures in the leftmost
//! columns. Only the quarterly label column and the chained-dollar column
//! matter, and only for quarters from 2000 onward.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::GdpLayout;
use crate::error::{PipelineError, Result};
use crate::quarter::Quarter;

/// A single quarter of chained-dollar GDP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GdpPoint {
    pub quarter: Quarter,
    pub gdp: f64,
}

/// Chronological, gap-free quarterly GDP.
#[derive(Debug, Clone, PartialEq)]
pub struct GdpSeries {
    points: Vec<GdpPoint>,
}

impl GdpSeries {
    /// Builds a series from points, checking each quarter follows the last.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Inconsistent`] on the first gap.
    pub fn new(points: Vec<GdpPoint>) -> Result<Self> {
        for pair in points.windows(2) {
            if pair[1].quarter != pair[0].quarter.next() {
                return Err(PipelineError::Inconsistent(format!(
                    "GDP series jumps from {} to {}",
                    pair[0].quarter, pair[1].quarter
                )));
            }
        }
        Ok(Self { points })
    }

    /// Consecutive quarters starting at `first`.
    pub fn from_values(first: Quarter, values: &[f64]) -> Self {
        let mut quarter = first;
        let points = values
            .iter()
            .map(|&gdp| {
                let point = GdpPoint { quarter, gdp };
                quarter = quarter.next();
                point
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[GdpPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn quarter(&self, i: usize) -> Option<Quarter> {
        self.points.get(i).map(|p| p.quarter)
    }

    pub fn position(&self, quarter: Quarter) -> Option<usize> {
        self.points.iter().position(|p| p.quarter == quarter)
    }
}

/// Parses the CSV export of the GDP sheet.
///
/// The first line is the header row; `layout.skip` records after it are
/// discarded before data begins. Rows with a blank quarter label are
/// ignored.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidValue`] for a retained row whose label or
/// GDP value does not parse to a finite number, and [`PipelineError::Format`] if the retained
/// quarters are not consecutive.
pub fn parse_gdp<R: Read>(reader: R, layout: &GdpLayout) -> Result<GdpSeries> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut points: Vec<GdpPoint> = Vec::new();

    for result in rdr.records().skip(layout.skip) {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        let label = record.get(layout.quarter_column).unwrap_or("").trim();
        if label.is_empty() || !label.starts_with(layout.year_prefix.as_str()) {
            continue;
        }

        let quarter: Quarter = label
            .parse()
            .map_err(|_| PipelineError::invalid(line, "quarter", label))?;

        let raw = record.get(layout.value_column).unwrap_or("").trim();
        let gdp = raw
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| PipelineError::invalid(line, "GDP", raw))?;

        if let Some(last) = points.last() {
            if quarter != last.quarter.next() {
                return Err(PipelineError::format(
                    line,
                    format!("GDP series jumps from {} to {}", last.quarter, quarter),
                ));
            }
        }

        debug!(line, %quarter, gdp, "GDP row");
        points.push(GdpPoint { quarter, gdp });
    }

    Ok(GdpSeries { points })
}

/// Reads and parses the GDP export at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_gdp(path: impl AsRef<Path>, layout: &GdpLayout) -> Result<GdpSeries> {
    let file = std::fs::File::open(path.as_ref())?;
    let series = parse_gdp(file, layout)?;
    info!(
        quarters = series.len(),
        first = ?series.quarter(0).map(|q| q.to_string()),
        "GDP series loaded"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Current-Dollar and Real GDP,,,,,,,\n\
        ,,,,,,,\n\
        Annual,,,,Quarterly,,,\n\
        ,,,,(Seasonally adjusted annual rates),,,\n\
        ,,,,,,,\n\
        ,GDP in billions of current dollars,GDP in billions of chained 2009 dollars,,,GDP in billions of current dollars,GDP in billions of chained 2009 dollars,\n\
        ,,,,,,,\n\
        ,,,,,,,\n";

    fn sheet(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_keeps_quarters_from_2000() {
        let text = sheet(&[
            "1999,9660.6,12323.3,,1999q4,9660.6,\"12,323.3\",",
            "2000,10284.8,12665.9,,2000q1,10031.0,\"12,359.1\",",
            "2001,10621.8,12825.4,,2000q2,10278.3,\"12,592.5\",",
            ",,,,2000q3,10357.4,\"12,607.7\",",
        ]);

        let series = parse_gdp(text.as_bytes(), &GdpLayout::default()).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.quarter(0).unwrap().to_string(), "2000q1");
        assert_eq!(series.points()[0].gdp, 12359.1);
        assert_eq!(series.points()[2].gdp, 12607.7);
    }

    #[test]
    fn test_parse_ignores_blank_labels() {
        let text = sheet(&["2000,1,1,,2000q1,1,100,", ",,,,,,,", "2001,1,1,,2000q2,1,101,"]);

        let series = parse_gdp(text.as_bytes(), &GdpLayout::default()).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_parse_rejects_bad_value() {
        let text = sheet(&["2000,1,1,,2000q1,1,n/a,"]);

        let err = parse_gdp(text.as_bytes(), &GdpLayout::default()).unwrap_err();
        match err {
            PipelineError::InvalidValue { column, value, .. } => {
                assert_eq!(column, "GDP");
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_gap() {
        let text = sheet(&["2000,1,1,,2000q1,1,100,", "2001,1,1,,2000q3,1,101,"]);

        let err = parse_gdp(text.as_bytes(), &GdpLayout::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Format { .. }));
    }

    #[test]
    fn test_new_validates_order() {
        let q1: Quarter = "2000q1".parse().unwrap();
        let q3: Quarter = "2000q3".parse().unwrap();
        let points = vec![
            GdpPoint { quarter: q1, gdp: 1.0 },
            GdpPoint { quarter: q3, gdp: 2.0 },
        ];
        assert!(matches!(
            GdpSeries::new(points).unwrap_err(),
            PipelineError::Inconsistent(msg) if msg.contains("2000q1 to 2000q3")
        ));
    }

    #[test]
    fn test_parse_rejects_non_finite_values() {
        for raw in ["NaN", "inf", "-infinity"] {
            let row = format!("2000,1,1,,2000q1,1,{raw},");
            let text = sheet(&[row.as_str()]);

            match parse_gdp(text.as_bytes(), &GdpLayout::default()).unwrap_err() {
                PipelineError::InvalidValue { column, value, .. } => {
                    assert_eq!(column, "GDP");
                    assert_eq!(value, raw);
                }
                other => panic!("unexpected error for {raw}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_from_values_is_dense() {
        let series = GdpSeries::from_values(Quarter::from_offset(0), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(series.quarter(4).unwrap().to_string(), "2001q1");
        assert_eq!(series.position("2000q3".parse().unwrap()), Some(2));
    }
}
