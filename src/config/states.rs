use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// State abbreviations used by the city-level housing table.
static STATES: &[(&str, &str)] = &[
    ("AK", "Alaska"),
    ("AL", "Alabama"),
    ("AR", "Arkansas"),
    ("AS", "American Samoa"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DC", "District of Columbia"),
    ("DE", "Delaware"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("GU", "Guam"),
    ("HI", "Hawaii"),
    ("IA", "Iowa"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("MA", "Massachusetts"),
    ("MD", "Maryland"),
    ("ME", "Maine"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MO", "Missouri"),
    ("MP", "Northern Mariana Islands"),
    ("MS", "Mississippi"),
    ("MT", "Montana"),
    ("NA", "National"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("NE", "Nebraska"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NV", "Nevada"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VA", "Virginia"),
    ("VI", "Virgin Islands"),
    ("VT", "Vermont"),
    ("WA", "Washington"),
    ("WI", "Wisconsin"),
    ("WV", "West Virginia"),
    ("WY", "Wyoming"),
];

/// Maps two-letter state abbreviations to full state names.
///
/// Overrides can be stored as a plain JSON object on disk:
/// ```json
/// {
///   "OH": "Ohio",
///   "CA": "California"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StateTable {
    entries: HashMap<String, String>,
}

impl Default for StateTable {
    fn default() -> Self {
        Self {
            entries: STATES
                .iter()
                .map(|(abbr, name)| (abbr.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl StateTable {
    /// Loads the table from a JSON file at `path`, replacing the built-in one.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)?;
        Ok(Self { entries })
    }

    /// Returns the full state name for `abbreviation`, if one is configured.
    pub fn full_name(&self, abbreviation: &str) -> Option<&str> {
        self.entries.get(abbreviation).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_default_table_covers_states_and_territories() {
        let table = StateTable::default();
        assert_eq!(table.len(), 57);
        assert_eq!(table.full_name("OH"), Some("Ohio"));
        assert_eq!(table.full_name("DC"), Some("District of Columbia"));
        assert_eq!(table.full_name("PR"), Some("Puerto Rico"));
        assert_eq!(table.full_name("ZZ"), None);
    }

    #[test]
    fn test_load_from_json() {
        let path = env::temp_dir().join("house_price_recession_states.json");
        fs::write(&path, r#"{"OH": "Ohio", "XX": "Example"}"#).unwrap();

        let table = StateTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.full_name("XX"), Some("Example"));
        assert_eq!(table.full_name("CA"), None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_non_object_json() {
        let path = env::temp_dir().join("house_price_recession_states_bad.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(StateTable::load(&path).is_err());

        fs::remove_file(&path).unwrap();
    }
}
