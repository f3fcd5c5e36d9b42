//! Parser for the city-level monthly housing table, and the quarterly
//! [`HousingTable`] it produces.
//!
//! Source rows look like:
//!
//! ```text
//! RegionID,RegionName,State,Metro,CountyName,SizeRank,1996-04,...,2016-08
//! 6181,New York,NY,New York,Queens,1,,...,587200
//! ```
//!
//! Only `State`, `RegionName` and month columns from `2000-01` onward are
//! used. Months are folded into quarters with [`quarter_means`].

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{Months, NaiveDate};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::config::StateTable;
use crate::error::{PipelineError, Result};
use crate::quarter::{BASE_YEAR, Quarter, quarter_means};
use crate::region::RegionRecord;

/// Mean sale price per region and quarter, from `2000q1` onward.
///
/// Every row is aligned with [`HousingTable::quarters`]; a `None` cell means
/// no monthly value was available for that quarter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HousingTable {
    quarters: Vec<Quarter>,
    rows: BTreeMap<RegionRecord, Vec<Option<f64>>>,
}

impl HousingTable {
    /// Builds a table from rows already aligned to `quarters`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Inconsistent`] if a row has the wrong width.
    pub fn new(
        quarters: Vec<Quarter>,
        rows: BTreeMap<RegionRecord, Vec<Option<f64>>>,
    ) -> Result<Self> {
        if let Some((region, row)) = rows.iter().find(|(_, row)| row.len() != quarters.len()) {
            return Err(PipelineError::Inconsistent(format!(
                "row for {region} has {} values, expected {}",
                row.len(),
                quarters.len()
            )));
        }
        Ok(Self { quarters, rows })
    }

    pub fn quarters(&self) -> &[Quarter] {
        &self.quarters
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionRecord> {
        self.rows.keys()
    }

    pub fn contains(&self, region: &RegionRecord) -> bool {
        self.rows.contains_key(region)
    }

    pub fn row(&self, region: &RegionRecord) -> Option<&[Option<f64>]> {
        self.rows.get(region).map(Vec::as_slice)
    }

    /// Mean price of `region` in `quarter`, if both exist and a value is present.
    pub fn value(&self, region: &RegionRecord, quarter: Quarter) -> Option<f64> {
        let col = self.quarters.iter().position(|q| *q == quarter)?;
        self.rows.get(region)?.get(col).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for the given regions, on the same quarter grid. Regions absent
    /// from this table are skipped.
    pub fn subset<'a>(&self, regions: impl IntoIterator<Item = &'a RegionRecord>) -> HousingTable {
        let rows = regions
            .into_iter()
            .filter_map(|region| {
                self.rows
                    .get(region)
                    .map(|row| (region.clone(), row.clone()))
            })
            .collect();
        HousingTable {
            quarters: self.quarters.clone(),
            rows,
        }
    }
}

/// Parses the monthly housing CSV into quarterly means.
///
/// # Errors
///
/// - [`PipelineError::MissingColumn`] if `State` or `RegionName` is absent
/// - [`PipelineError::Format`] if month columns from `2000-01` are missing
///   or not consecutive
/// - [`PipelineError::UnknownState`] for an abbreviation not in `states`
/// - [`PipelineError::InvalidValue`] for a non-numeric cell that is neither
///   empty nor a missing-value marker
pub fn parse_housing<R: Read>(reader: R, states: &StateTable) -> Result<HousingTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let state_col = column(&headers, "State")?;
    let region_col = column(&headers, "RegionName")?;
    let months = month_columns(&headers)?;
    debug!(months = months.len(), "Monthly columns from 2000-01");

    let mut rows: BTreeMap<RegionRecord, Vec<Option<f64>>> = BTreeMap::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line() as usize);

        let abbreviation = record.get(state_col).unwrap_or("").trim();
        let state = states
            .full_name(abbreviation)
            .ok_or_else(|| PipelineError::UnknownState {
                line,
                abbreviation: abbreviation.to_string(),
            })?;
        let region = RegionRecord::new(state, record.get(region_col).unwrap_or("").trim());

        if rows.contains_key(&region) {
            warn!(line, %region, "Duplicate region, keeping first row");
            continue;
        }

        let monthly = months
            .iter()
            .map(|&col| {
                let cell = record.get(col).unwrap_or("").trim();
                price(cell).map_err(|_| PipelineError::invalid(line, &headers[col], cell))
            })
            .collect::<Result<Vec<_>>>()?;

        rows.insert(region, quarter_means(&monthly));
    }

    let quarters = (0..months.len().div_ceil(3))
        .map(Quarter::from_offset)
        .collect();

    Ok(HousingTable { quarters, rows })
}

/// Reads and parses the housing CSV at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_housing(path: impl AsRef<Path>, states: &StateTable) -> Result<HousingTable> {
    let file = std::fs::File::open(path.as_ref())?;
    let table = parse_housing(file, states)?;
    info!(
        regions = table.len(),
        quarters = table.quarters().len(),
        "Housing table loaded"
    );
    Ok(table)
}

/// Cells that mean "no value" in exported price tables.
const MISSING_MARKERS: [&str; 3] = ["nan", "na", "n/a"];

/// A monthly price, or `None` for blanks, missing markers and non-finite
/// numbers.
fn price(cell: &str) -> std::result::Result<Option<f64>, std::num::ParseFloatError> {
    if cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    cell.parse::<f64>().map(|v| Some(v).filter(|v| v.is_finite()))
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
}

/// Indices of `YYYY-MM` columns from January of the base year, checked to
/// be consecutive months.
fn month_columns(headers: &StringRecord) -> Result<Vec<usize>> {
    let Some(base) = NaiveDate::from_ymd_opt(BASE_YEAR, 1, 1) else {
        return Err(PipelineError::format(1, "invalid base month"));
    };

    let mut months: Vec<(NaiveDate, usize)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| parse_month(h).map(|date| (date, idx)))
        .filter(|(date, _)| *date >= base)
        .collect();
    months.sort();

    let mut expected = base;
    for (date, _) in &months {
        if *date != expected {
            return Err(PipelineError::format(
                1,
                format!(
                    "expected month column {}, found {}",
                    expected.format("%Y-%m"),
                    date.format("%Y-%m")
                ),
            ));
        }
        expected = expected
            .checked_add_months(Months::new(1))
            .ok_or_else(|| PipelineError::format(1, "month column out of range"))?;
    }

    if months.is_empty() {
        return Err(PipelineError::format(
            1,
            format!("no month columns from {}", base.format("%Y-%m")),
        ));
    }

    Ok(months.into_iter().map(|(_, idx)| idx).collect())
}

fn parse_month(header: &str) -> Option<NaiveDate> {
    let header = header.trim();
    if header.len() != 7 || header.as_bytes()[4] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{header}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<HousingTable> {
        parse_housing(text.as_bytes(), &StateTable::default())
    }

    #[test]
    fn test_parse_aggregates_into_quarters() {
        let text = "RegionID,RegionName,State,Metro,1999-12,2000-01,2000-02,2000-03,2000-04,2000-05\n\
                    1,Athens,OH,Athens,50,100,200,300,400,600\n";

        let table = parse(text).unwrap();
        let athens = RegionRecord::new("Ohio", "Athens");

        assert_eq!(table.len(), 1);
        let labels: Vec<String> = table.quarters().iter().map(|q| q.to_string()).collect();
        assert_eq!(labels, vec!["2000q1", "2000q2"]);
        assert_eq!(table.row(&athens).unwrap(), &[Some(200.0), Some(500.0)]);
    }

    #[test]
    fn test_missing_months_are_skipped_in_mean() {
        let text = "RegionName,State,2000-01,2000-02,2000-03,2000-04,2000-05,2000-06\n\
                    Ann Arbor,MI,,90,110,,,\n";

        let table = parse(text).unwrap();
        let region = RegionRecord::new("Michigan", "Ann Arbor");

        assert_eq!(table.value(&region, "2000q1".parse().unwrap()), Some(100.0));
        assert_eq!(table.value(&region, "2000q2".parse().unwrap()), None);
    }

    #[test]
    fn test_unknown_state_reports_line() {
        let text = "RegionName,State,2000-01\n\
                    Athens,OH,1\n\
                    Nowhere,ZZ,1\n";

        match parse(text).unwrap_err() {
            PipelineError::UnknownState { line, abbreviation } => {
                assert_eq!(line, 3);
                assert_eq!(abbreviation, "ZZ");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_column() {
        let text = "RegionName,2000-01\nAthens,1\n";
        assert!(matches!(
            parse(text).unwrap_err(),
            PipelineError::MissingColumn(c) if c == "State"
        ));
    }

    #[test]
    fn test_non_consecutive_months_rejected() {
        let text = "RegionName,State,2000-01,2000-03\nAthens,OH,1,2\n";
        assert!(matches!(parse(text).unwrap_err(), PipelineError::Format { .. }));
    }

    #[test]
    fn test_invalid_cell_rejected() {
        let text = "RegionName,State,2000-01\nAthens,OH,cheap\n";
        match parse(text).unwrap_err() {
            PipelineError::InvalidValue { column, value, .. } => {
                assert_eq!(column, "2000-01");
                assert_eq!(value, "cheap");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_region_keeps_first() {
        let text = "RegionName,State,2000-01\nAthens,OH,1\nAthens,OH,2\n";
        let table = parse(text).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.value(&RegionRecord::new("Ohio", "Athens"), Quarter::from_offset(0)),
            Some(1.0)
        );
    }

    #[test]
    fn test_subset_skips_unknown_regions() {
        let text = "RegionName,State,2000-01\nAthens,OH,1\nAustin,TX,2\n";
        let table = parse(text).unwrap();

        let wanted = [
            RegionRecord::new("Texas", "Austin"),
            RegionRecord::new("Ohio", "Oberlin"),
        ];
        let subset = table.subset(&wanted);

        assert_eq!(subset.len(), 1);
        assert!(subset.contains(&wanted[0]));
        assert_eq!(subset.quarters(), table.quarters());
    }

    #[test]
    fn test_new_rejects_misaligned_row() {
        let mut rows = BTreeMap::new();
        rows.insert(RegionRecord::new("Ohio", "Athens"), vec![Some(1.0)]);
        assert!(matches!(
            HousingTable::new(vec![], rows).unwrap_err(),
            PipelineError::Inconsistent(_)
        ));
    }

    #[test]
    fn test_missing_markers_are_skipped() {
        let text = "RegionName,State,2000-01,2000-02,2000-03,2000-04,2000-05,2000-06\n\
                    Athens,OH,100,NaN,100,80,80,80\n\
                    Austin,TX,NaN,nan,NaN,80,80,80\n\
                    Boston,MA,N/A,NA,inf,80,-inf,80\n";

        let table = parse(text).unwrap();
        let q1 = Quarter::from_offset(0);
        let q2 = Quarter::from_offset(1);

        assert_eq!(table.value(&RegionRecord::new("Ohio", "Athens"), q1), Some(100.0));
        assert_eq!(table.value(&RegionRecord::new("Texas", "Austin"), q1), None);
        assert_eq!(table.value(&RegionRecord::new("Massachusetts", "Boston"), q1), None);
        assert_eq!(table.value(&RegionRecord::new("Massachusetts", "Boston"), q2), Some(80.0));

        let ratios = crate::analyzers::ratio::price_ratios(&table, q1, q2);
        assert_eq!(ratios.values(), vec![1.25]);
    }
}
