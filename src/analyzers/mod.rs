//! Analysis stages downstream of the parsers.
//!
//! Splits the housing table into university and other towns, computes the
//! start-to-bottom price ratio per region, and compares the two groups with
//! a two-sample t-test.

pub mod compare;
pub mod partition;
pub mod ratio;
pub mod ttest;
pub mod types;
pub mod utility;
