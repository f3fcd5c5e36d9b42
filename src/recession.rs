//! Recession detection over a quarterly GDP series.
//!
//! A recession starts with two consecutive quarters of GDP decline and ends
//! once GDP has grown for two consecutive quarters. The bottom is the
//! quarter with the lowest GDP in between.
//!
//! All functions are pure: the same series always yields the same window.

use serde::Serialize;
use tracing::debug;

use crate::error::{Boundary, PipelineError, Result};
use crate::parser::gdp::{GdpPoint, GdpSeries};
use crate::quarter::Quarter;

/// Start, end and bottom quarters of a detected recession.
///
/// `start <= bottom <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecessionWindow {
    pub start: Quarter,
    pub end: Quarter,
    pub bottom: Quarter,
}

/// Index of the first position `i` where both `flags[i]` and `flags[i + 1]`
/// are set.
pub fn first_consecutive_pair(flags: impl IntoIterator<Item = bool>) -> Option<usize> {
    let mut previous = false;
    for (i, flag) in flags.into_iter().enumerate() {
        if previous && flag {
            return Some(i - 1);
        }
        previous = flag;
    }
    None
}

/// `gdp[i + 1] - gdp[i]` for each adjacent pair.
fn diffs(points: &[GdpPoint]) -> impl Iterator<Item = f64> + '_ {
    points.windows(2).map(|pair| pair[1].gdp - pair[0].gdp)
}

fn start_position(points: &[GdpPoint]) -> Result<usize> {
    first_consecutive_pair(diffs(points).map(|d| d < 0.0))
        .map(|i| i + 1)
        .ok_or(PipelineError::NotFound(Boundary::Start))
}

fn end_position(points: &[GdpPoint], start: usize) -> Result<usize> {
    // A pair at k means r[k] -> r[k+1] -> r[k+2] all rise, so k + 2 is in range.
    first_consecutive_pair(diffs(&points[start..]).map(|d| d > 0.0))
        .map(|k| start + k + 2)
        .ok_or(PipelineError::NotFound(Boundary::End))
}

/// Position of the lowest GDP in `start..=end`, first occurrence on ties.
fn bottom_position(points: &[GdpPoint], start: usize, end: usize) -> usize {
    let mut bottom = start;
    for i in start + 1..=end {
        if points[i].gdp < points[bottom].gdp {
            bottom = i;
        }
    }
    bottom
}

/// First of the two consecutive declining quarters that open the recession.
///
/// # Errors
///
/// [`PipelineError::NotFound`] if GDP never declines two quarters in a row.
pub fn recession_start(series: &GdpSeries) -> Result<Quarter> {
    let points = series.points();
    Ok(points[start_position(points)?].quarter)
}

/// Quarter by which GDP has grown for two consecutive quarters after the start.
///
/// # Errors
///
/// [`PipelineError::NotFound`] if either boundary is missing.
pub fn recession_end(series: &GdpSeries) -> Result<Quarter> {
    let points = series.points();
    let start = start_position(points)?;
    Ok(points[end_position(points, start)?].quarter)
}

/// Quarter with the lowest GDP between start and end, inclusive.
///
/// # Errors
///
/// [`PipelineError::NotFound`] if either boundary is missing.
pub fn recession_bottom(series: &GdpSeries) -> Result<Quarter> {
    Ok(detect(series)?.bottom)
}

/// Locates the full recession window in one pass over the series.
pub fn detect(series: &GdpSeries) -> Result<RecessionWindow> {
    let points = series.points();
    let start = start_position(points)?;
    let end = end_position(points, start)?;
    let bottom = bottom_position(points, start, end);

    let window = RecessionWindow {
        start: points[start].quarter,
        end: points[end].quarter,
        bottom: points[bottom].quarter,
    };
    debug!(
        start = %window.start,
        end = %window.end,
        bottom = %window.bottom,
        "Recession window detected"
    );
    Ok(window)
}
