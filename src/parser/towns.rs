//! Parser for the flat university-town listing.
//!
//! The listing alternates state headings (carrying a marker such as
//! `[edit]`) with the towns of that state, one per line:
//!
//! ```text
//! Ohio[edit]
//! Athens (Ohio University)
//! California[edit]
//! Los Angeles
//! ```

use std::path::Path;

use tracing::{debug, info};

use crate::config::TownListing;
use crate::error::{PipelineError, Result};
use crate::region::{RegionRecord, UniversityTownSet};

/// Parses listing text into the set of university towns.
///
/// # Errors
///
/// Returns [`PipelineError::Format`] if a town appears before any state
/// heading.
pub fn parse_towns(text: &str, listing: &TownListing) -> Result<UniversityTownSet> {
    let mut towns = UniversityTownSet::new();
    let mut state: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.contains(listing.state_marker.as_str()) {
            let name = line.replace(listing.state_marker.as_str(), "");
            debug!(line = idx + 1, state = name.trim(), "State heading");
            state = Some(name.trim().to_string());
            continue;
        }

        let Some(current) = state.as_deref() else {
            return Err(PipelineError::format(
                idx + 1,
                format!("town '{line}' listed before any state heading"),
            ));
        };

        towns.insert(RegionRecord::new(current, town_name(line)));
    }

    Ok(towns)
}

/// Reads and parses the listing at `path`.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_towns(path: impl AsRef<Path>, listing: &TownListing) -> Result<UniversityTownSet> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let towns = parse_towns(&text, listing)?;
    info!(towns = towns.len(), "University towns loaded");
    Ok(towns)
}

/// Drops any parenthetical annotation, e.g. the university name.
fn town_name(line: &str) -> &str {
    match line.find('(') {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}
