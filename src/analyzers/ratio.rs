use std::collections::BTreeMap;

use crate::parser::HousingTable;
use crate::quarter::Quarter;
use crate::region::RegionRecord;

/// Start-to-bottom price ratio per region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceRatioTable {
    ratios: BTreeMap<RegionRecord, f64>,
}

impl PriceRatioTable {
    pub fn get(&self, region: &RegionRecord) -> Option<f64> {
        self.ratios.get(region).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionRecord, f64)> {
        self.ratios.iter().map(|(region, ratio)| (region, *ratio))
    }

    /// Ratios in region order, as a plain sample for statistical testing.
    pub fn values(&self) -> Vec<f64> {
        self.ratios.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}

/// Divides each region's price in `start` by its price in `bottom`.
///
/// Regions missing either value are left out of the result, as are regions
/// whose ratio is not finite (a zero bottom price).
pub fn price_ratios(table: &HousingTable, start: Quarter, bottom: Quarter) -> PriceRatioTable {
    let ratios = table
        .regions()
        .filter_map(|region| {
            let before = table.value(region, start)?;
            let low = table.value(region, bottom)?;
            let ratio = before / low;
            ratio.is_finite().then(|| (region.clone(), ratio))
        })
        .collect();
    PriceRatioTable { ratios }
}
