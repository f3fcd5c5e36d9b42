pub mod analyzers;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod quarter;
pub mod recession;
pub mod region;

pub use error::{PipelineError, Result};
pub use quarter::Quarter;
pub use region::{RegionRecord, UniversityTownSet};
