//! Error types for glam-predict.

use glam_core::{GlamError, ParamName, SubjectId};
use glam_sim::SimError;
use thiserror::Error;

/// Errors raised while loading a fitted model or generating predictions.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The estimates table has no row for this subject (and condition level).
    /// Indicates a mismatch between the data and the fitted estimates.
    #[error(
        "no {parameter} estimate for subject {subject} ({})",
        describe_condition(.condition)
    )]
    MissingEstimate {
        subject:   SubjectId,
        parameter: ParamName,
        /// `"column = level"` when the parameter depends on a condition.
        condition: Option<String>,
    },

    #[error("{table} table has no column {column:?}")]
    MissingColumn {
        table:  &'static str,
        column: String,
    },

    #[error("row {row} is out of range for {len} observed trials")]
    RowOutOfRange { row: usize, len: usize },

    #[error("subject {0} has no finite observed response time")]
    NoObservedRt(SubjectId),

    #[error("{what} length {got} does not match expected {expected}")]
    ShapeMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] GlamError),

    #[error("simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_condition(condition: &Option<String>) -> &str {
    condition.as_deref().unwrap_or("no condition dependency")
}

/// Alias for `Result<T, PredictError>`.
pub type PredictResult<T> = Result<T, PredictError>;
