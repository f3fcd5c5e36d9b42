//! Data types produced by the comparison driver.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::ratio::PriceRatioTable;
use crate::analyzers::ttest::TestOutcome;
use crate::analyzers::utility::{mean, sample_stddev};
use crate::recession::RecessionWindow;

/// p-values below this reject the hypothesis that both groups share a mean.
pub const SIGNIFICANCE_LEVEL: f64 = 0.01;

/// Summary statistics for one group of price ratios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Regions of this group present in the housing table
    pub regions: usize,
    /// Regions with a ratio, i.e. values for both start and bottom quarters
    pub count: usize,
    pub mean_ratio: f64,
    pub stddev: f64,
}

impl GroupSummary {
    pub fn from_ratios(regions: usize, ratios: &PriceRatioTable) -> Self {
        let values = ratios.values();
        let m = mean(&values);
        Self {
            regions,
            count: values.len(),
            mean_ratio: m,
            stddev: sample_stddev(&values, m),
        }
    }
}

/// Complete result of a run, serialised by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: DateTime<Utc>,
    pub window: RecessionWindow,
    pub test: &'static str,
    pub university: GroupSummary,
    pub other: GroupSummary,
    pub outcome: TestOutcome,
    pub threshold: f64,
    pub significant: bool,
}

impl ComparisonReport {
    /// The group whose prices held up better, i.e. fell least into the bottom.
    pub fn better_group(&self) -> &'static str {
        if self.university.mean_ratio < self.other.mean_ratio {
            "university towns"
        } else {
            "non-university towns"
        }
    }
}
