//! The comparison driver: loads every source once and runs the analysis.

use std::fmt;

use chrono::Utc;
use tracing::info;

use crate::analyzers::partition::{Partition, partition};
use crate::analyzers::ratio::{PriceRatioTable, price_ratios};
use crate::analyzers::ttest::TwoSampleTest;
use crate::analyzers::types::{ComparisonReport, GroupSummary, SIGNIFICANCE_LEVEL};
use crate::config::{GdpLayout, SourcePaths, StateTable, TownListing};
use crate::error::Result;
use crate::parser::{GdpSeries, HousingTable, load_gdp, load_housing, load_towns};
use crate::recession::{RecessionWindow, detect};
use crate::region::UniversityTownSet;

/// The three normalized inputs, parsed once and shared by every stage.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub towns: UniversityTownSet,
    pub gdp: GdpSeries,
    pub housing: HousingTable,
}

/// A source that has just been loaded by [`Pipeline::load_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Towns,
    Gdp,
    Housing,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Towns => f.write_str("university towns"),
            LoadStage::Gdp => f.write_str("GDP"),
            LoadStage::Housing => f.write_str("housing prices"),
        }
    }
}

/// Report plus the per-region ratios it summarises.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub report: ComparisonReport,
    pub university: PriceRatioTable,
    pub other: PriceRatioTable,
}

impl Pipeline {
    pub fn new(towns: UniversityTownSet, gdp: GdpSeries, housing: HousingTable) -> Self {
        Self {
            towns,
            gdp,
            housing,
        }
    }

    /// Loads all three sources with the default GDP layout and town marker.
    pub fn load(paths: &SourcePaths, states: &StateTable) -> Result<Self> {
        Self::load_with(
            paths,
            states,
            &GdpLayout::default(),
            &TownListing::default(),
            |_| Ok(()),
        )
    }

    /// Loads towns, GDP and housing in that order, calling `after` once each
    /// source is parsed. An error from `after` stops the load.
    #[tracing::instrument(skip_all)]
    pub fn load_with(
        paths: &SourcePaths,
        states: &StateTable,
        layout: &GdpLayout,
        listing: &TownListing,
        mut after: impl FnMut(LoadStage) -> Result<()>,
    ) -> Result<Self> {
        let towns = load_towns(&paths.towns, listing)?;
        after(LoadStage::Towns)?;
        let gdp = load_gdp(&paths.gdp, layout)?;
        after(LoadStage::Gdp)?;
        let housing = load_housing(&paths.housing, states)?;
        after(LoadStage::Housing)?;
        Ok(Self::new(towns, gdp, housing))
    }

    pub fn window(&self) -> Result<RecessionWindow> {
        detect(&self.gdp)
    }

    pub fn partition(&self) -> Partition {
        partition(&self.housing, &self.towns)
    }

    /// Runs detection, partitioning, ratios and `test` over other towns
    /// versus university towns.
    pub fn compare(&self, test: &dyn TwoSampleTest) -> Result<Comparison> {
        let window = self.window()?;
        let split = self.partition();

        let university = price_ratios(&split.university, window.start, window.bottom);
        let other = price_ratios(&split.other, window.start, window.bottom);
        info!(
            university = university.len(),
            other = other.len(),
            "Price ratios computed"
        );

        let outcome = test.test(&other.values(), &university.values())?;
        let significant = outcome.p_value < SIGNIFICANCE_LEVEL;
        info!(
            test = test.name(),
            statistic = outcome.statistic,
            p_value = outcome.p_value,
            significant,
            "Two-sample test complete"
        );

        let report = ComparisonReport {
            generated_at: Utc::now(),
            window,
            test: test.name(),
            university: GroupSummary::from_ratios(split.university.len(), &university),
            other: GroupSummary::from_ratios(split.other.len(), &other),
            outcome,
            threshold: SIGNIFICANCE_LEVEL,
            significant,
        };

        Ok(Comparison {
            report,
            university,
            other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::ttest::{StudentT, WelchT};
    use crate::quarter::Quarter;
    use crate::region::RegionRecord;
    use std::collections::BTreeMap;

    // Recession starts 2000q3, bottoms 2001q1 (offsets 2 and 4).
    const GDP: [f64; 9] = [100.0, 101.0, 99.0, 98.0, 97.0, 99.0, 100.0, 101.0, 102.0];

    fn row(start: f64, bottom: f64) -> Vec<Option<f64>> {
        vec![None, None, Some(start), None, Some(bottom), None]
    }

    fn pipeline() -> Pipeline {
        let quarters = (0..6).map(Quarter::from_offset).collect();
        let mut rows = BTreeMap::new();
        rows.insert(RegionRecord::new("Ohio", "Athens"), row(125.0, 100.0));
        rows.insert(RegionRecord::new("California", "Davis"), row(110.0, 100.0));
        rows.insert(RegionRecord::new("Michigan", "Ann Arbor"), vec![None; 6]);
        rows.insert(RegionRecord::new("Ohio", "Columbus"), row(104.0, 100.0));
        rows.insert(RegionRecord::new("Texas", "Dallas"), row(102.0, 100.0));
        rows.insert(RegionRecord::new("Texas", "Houston"), row(106.0, 100.0));

        let towns = [
            RegionRecord::new("Ohio", "Athens"),
            RegionRecord::new("California", "Davis"),
            RegionRecord::new("Michigan", "Ann Arbor"),
            RegionRecord::new("Ohio", "Oberlin"),
        ]
        .into_iter()
        .collect();

        Pipeline::new(
            towns,
            GdpSeries::from_values(Quarter::from_offset(0), &GDP),
            HousingTable::new(quarters, rows).unwrap(),
        )
    }

    #[test]
    fn test_compare_groups() {
        let result = pipeline().compare(&StudentT).unwrap();

        assert_eq!(result.report.window.start.to_string(), "2000q3");
        assert_eq!(result.report.window.bottom.to_string(), "2001q1");
        assert_eq!(result.report.university.regions, 3);
        assert_eq!(result.report.university.count, 2);
        assert_eq!(result.report.other.count, 3);
        assert_eq!(
            result.university.get(&RegionRecord::new("Ohio", "Athens")),
            Some(1.25)
        );
        assert!((result.report.other.mean_ratio - 1.04).abs() < 1e-12);
        assert_eq!(result.report.better_group(), "non-university towns");
        assert_eq!(result.report.threshold, 0.01);
        assert_eq!(
            result.report.significant,
            result.report.outcome.p_value < 0.01
        );
    }

    #[test]
    fn test_compare_is_deterministic() {
        let pipeline = pipeline();
        let first = pipeline.compare(&WelchT).unwrap();
        let second = pipeline.compare(&WelchT).unwrap();

        assert_eq!(first.report.window, second.report.window);
        assert_eq!(first.university, second.university);
        assert_eq!(first.other, second.other);
        assert_eq!(first.report.outcome, second.report.outcome);
    }
}
