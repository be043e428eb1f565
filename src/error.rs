//! Error types for the ranking pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can abort a single (position, year, week) run.
///
/// Every variant is recoverable at the orchestrator level: one position's
/// failure is reported and the remaining positions keep running.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No usable headers or rows after raw-table filtering.
    #[error("no usable input rows")]
    EmptyInput,

    /// A column the position profile requires is absent after
    /// extraction/rename. This is the dominant production failure mode
    /// (upstream site layout drift), so it carries the column and position.
    #[error("missing column `{column}` for position {position}")]
    MissingColumn { column: String, position: String },

    /// Ranking produced zero rows.
    #[error("empty cohort for position {position}")]
    EmptyCohort { position: String },

    /// A profile's formula references a column it never coerces.
    #[error("invalid profile for {position}: {reason}")]
    InvalidProfile { position: String, reason: String },

    /// Upstream table provider failed (HTTP status, unparseable page, ...).
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A record-set invariant was violated (duplicate name, ragged column).
    #[error("record set invariant: {0}")]
    RecordSet(String),

    /// I/O while writing a cohort artifact.
    #[error("sink I/O error: {0}")]
    Sink(#[from] std::io::Error),

    /// CSV encoding while writing a cohort artifact.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    pub fn missing_column(column: impl Into<String>, position: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            position: position.into(),
        }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}
