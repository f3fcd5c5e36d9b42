//! Calendar quarters and the monthly → quarterly aggregation grid.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// First year of the quarterly grid. Quarter offsets count from `2000q1`.
pub const BASE_YEAR: i32 = 2000;

/// A calendar quarter, displayed as `YYYYqN`.
///
/// Ordering is chronological: year first, then quarter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Returns `None` unless `quarter` is in `1..=4`.
    pub fn new(year: i32, quarter: u8) -> Option<Self> {
        (1..=4)
            .contains(&quarter)
            .then_some(Quarter { year, quarter })
    }

    /// Label of the `i`-th quarter of the grid starting at `2000q1`.
    pub fn from_offset(i: usize) -> Self {
        Quarter {
            year: BASE_YEAR + (i / 4) as i32,
            quarter: (i % 4) as u8 + 1,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u8 {
        self.quarter
    }

    /// The quarter immediately following this one.
    pub fn next(&self) -> Self {
        if self.quarter == 4 {
            Quarter {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Quarter {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}q{}", self.year, self.quarter)
    }
}

/// Error returned when a string is not a `YYYYqN` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuarterError(String);

impl fmt::Display for ParseQuarterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a quarter label (expected YYYYqN)", self.0)
    }
}

impl std::error::Error for ParseQuarterError {}

impl FromStr for Quarter {
    type Err = ParseQuarterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQuarterError(s.to_string());
        let (year, quarter) = s.trim().split_once(['q', 'Q']).ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let quarter: u8 = quarter.parse().map_err(|_| err())?;
        Quarter::new(year, quarter).ok_or_else(err)
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Collapses a run of monthly values, starting at a quarter boundary, into
/// quarterly means.
///
/// Each group of three months averages over the months that are present.
/// A trailing group shorter than three months is averaged over what it has.
/// A group with no values at all yields `None`.
pub fn quarter_means(monthly: &[Option<f64>]) -> Vec<Option<f64>> {
    monthly
        .chunks(3)
        .map(|group| {
            let present: Vec<f64> = group.iter().flatten().copied().collect();
            if present.is_empty() {
                None
            } else {
                Some(present.iter().sum::<f64>() / present.len() as f64)
            }
        })
        .collect()
}
