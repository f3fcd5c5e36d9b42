//! Explicit configuration handed to the parsers.
//!
//! [`StateTable`] maps state abbreviations to full names.
//! [`SourcePaths`] locates the three input files.
//! [`GdpLayout`] and [`TownListing`] describe the quirks of the raw sources.

mod sources;
mod states;

pub use sources::{GdpLayout, SourcePaths, TownListing};
pub use states::StateTable;
