use std::collections::BTreeSet;

use tracing::debug;

use crate::parser::HousingTable;
use crate::region::{RegionRecord, UniversityTownSet};

/// Housing rows split by town category. The two halves never share a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub university: HousingTable,
    pub other: HousingTable,
}

/// Splits `housing` into university towns and every other region.
///
/// University rows are the intersection of the housing regions with `towns`.
/// Other rows are the symmetric difference of the housing regions and the
/// university rows, so listed towns missing from the housing data are
/// simply ignored.
pub fn partition(housing: &HousingTable, towns: &UniversityTownSet) -> Partition {
    let all: BTreeSet<&RegionRecord> = housing.regions().collect();
    let listed: BTreeSet<&RegionRecord> = towns.iter().collect();

    let university: BTreeSet<&RegionRecord> = all.intersection(&listed).copied().collect();
    let other: BTreeSet<&RegionRecord> = all.symmetric_difference(&university).copied().collect();

    debug!(
        listed = listed.len(),
        university = university.len(),
        other = other.len(),
        "Housing regions partitioned"
    );

    Partition {
        university: housing.subset(university.iter().copied()),
        other: housing.subset(other.iter().copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quarter::Quarter;
    use std::collections::BTreeMap;

    fn housing(regions: &[(&str, &str)]) -> HousingTable {
        let rows: BTreeMap<RegionRecord, Vec<Option<f64>>> = regions
            .iter()
            .map(|(state, name)| (RegionRecord::new(*state, *name), vec![Some(1.0)]))
            .collect();
        HousingTable::new(vec![Quarter::from_offset(0)], rows).unwrap()
    }

    fn towns(regions: &[(&str, &str)]) -> UniversityTownSet {
        regions
            .iter()
            .map(|(state, name)| RegionRecord::new(*state, *name))
            .collect()
    }

    #[test]
    fn test_partition_splits_on_listed_towns() {
        let table = housing(&[("Ohio", "Athens"), ("Ohio", "Columbus"), ("Texas", "Austin")]);
        let listed = towns(&[("Ohio", "Athens"), ("Texas", "Austin")]);

        let split = partition(&table, &listed);

        assert_eq!(split.university.len(), 2);
        assert_eq!(split.other.len(), 1);
        assert!(split.other.contains(&RegionRecord::new("Ohio", "Columbus")));
    }

    #[test]
    fn test_listed_towns_missing_from_housing_are_ignored() {
        let table = housing(&[("Ohio", "Athens"), ("Ohio", "Columbus")]);
        let listed = towns(&[("Ohio", "Athens"), ("Ohio", "Oberlin")]);

        let split = partition(&table, &listed);

        assert_eq!(split.university.len(), 1);
        assert!(!split.university.contains(&RegionRecord::new("Ohio", "Oberlin")));
        assert!(!split.other.contains(&RegionRecord::new("Ohio", "Oberlin")));
    }

    #[test]
    fn test_halves_are_disjoint_and_cover_table() {
        let table = housing(&[
            ("Ohio", "Athens"),
            ("Ohio", "Columbus"),
            ("Texas", "Austin"),
            ("Texas", "Dallas"),
            ("California", "Davis"),
        ]);
        let listed = towns(&[("Ohio", "Athens"), ("California", "Davis"), ("Iowa", "Ames")]);

        let split = partition(&table, &listed);

        let university: BTreeSet<_> = split.university.regions().collect();
        let other: BTreeSet<_> = split.other.regions().collect();
        let all: BTreeSet<_> = table.regions().collect();

        assert!(university.is_disjoint(&other));
        let union: BTreeSet<_> = university.union(&other).copied().collect();
        assert_eq!(union, all);
    }

    #[test]
    fn test_empty_listing_puts_everything_in_other() {
        let table = housing(&[("Ohio", "Athens"), ("Ohio", "Columbus")]);

        let split = partition(&table, &UniversityTownSet::new());

        assert!(split.university.is_empty());
        assert_eq!(split.other, table);
    }
}
