//! Region keys shared by every table in the pipeline.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A town, keyed by full state name and region name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RegionRecord {
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "RegionName")]
    pub region_name: String,
}

impl RegionRecord {
    pub fn new(state: impl Into<String>, region_name: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            region_name: region_name.into(),
        }
    }
}

impl fmt::Display for RegionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.region_name, self.state)
    }
}

/// Towns listed under a state heading in the university-town listing.
pub type UniversityTownSet = BTreeSet<RegionRecord>;
