use std::path::PathBuf;

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub towns: PathBuf,
    pub gdp: PathBuf,
    pub housing: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            towns: PathBuf::from("university_towns.txt"),
            gdp: PathBuf::from("gdplev.csv"),
            housing: PathBuf::from("City_Zhvi_AllHomes.csv"),
        }
    }
}

impl SourcePaths {
    /// Default paths, each overridable by `UNIVERSITY_TOWNS_PATH`,
    /// `GDP_PATH` and `HOUSING_PATH`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            towns: lookup("UNIVERSITY_TOWNS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.towns),
            gdp: lookup("GDP_PATH").map(PathBuf::from).unwrap_or(defaults.gdp),
            housing: lookup("HOUSING_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.housing),
        }
    }
}

/// Where the quarterly chained-dollar series sits in the GDP sheet export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdpLayout {
    /// Records dropped after the header row before data begins
    pub skip: usize,
    pub quarter_column: usize,
    pub value_column: usize,
    /// Only quarters whose label starts with this prefix are kept
    pub year_prefix: String,
}

impl Default for GdpLayout {
    fn default() -> Self {
        Self {
            skip: 7,
            quarter_column: 4,
            value_column: 6,
            year_prefix: "20".to_string(),
        }
    }
}

/// Marker that distinguishes state headings from towns in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownListing {
    pub state_marker: String,
}

impl Default for TownListing {
    fn default() -> Self {
        Self {
            state_marker: "[edit]".to_string(),
        }
    }
}
