//! Parsers that turn the three raw sources into normalized tables.
//!
//! Each source is parsed exactly once per run; the resulting tables are
//! passed explicitly to the analysis stages.

pub mod gdp;
pub mod housing;
pub mod towns;

pub use gdp::{GdpPoint, GdpSeries, load_gdp, parse_gdp};
pub use housing::{HousingTable, load_housing, parse_housing};
pub use towns::{load_towns, parse_towns};
