//! Error types for the ingestion and analysis pipeline.

use std::fmt;

use thiserror::Error;

/// Which edge of the recession window could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("start (two consecutive quarters of decline)"),
            Boundary::End => f.write_str("end (two consecutive quarters of growth)"),
        }
    }
}

/// Errors raised while loading sources or running the comparison.
///
/// Every parse-time variant carries the 1-based line of the offending input
/// so a failed run can be traced back to the source file. Tables assembled
/// in memory report [`PipelineError::Inconsistent`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Structurally malformed input
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Housing row with a state abbreviation missing from the state table
    #[error("unknown state abbreviation '{abbreviation}' at line {line}")]
    UnknownState { line: usize, abbreviation: String },

    /// In-memory series or table whose parts don't line up
    #[error("inconsistent data: {0}")]
    Inconsistent(String),

    /// Recession pattern absent from the GDP series
    #[error("recession {0} not found in GDP series")]
    NotFound(Boundary),

    /// Required header missing from a tabular source
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// Cell that should hold a number or a quarter label but doesn't
    #[error("invalid value '{value}' in column '{column}' at line {line}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
    },

    /// Not enough usable samples for a statistic
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        PipelineError::Format {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(line: usize, column: &str, value: &str) -> Self {
        PipelineError::InvalidValue {
            line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
