//! Error kinds for a report run.
//!
//! Every error here is fatal: a report is all-or-nothing, so a single bad
//! row aborts the run before any output is written.

use std::path::PathBuf;

/// A CSV row that could not be turned into an [`Activity`](crate::activity::Activity).
#[derive(Debug, thiserror::Error)]
pub enum MalformedRecordError {
    #[error("expected at least {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },

    #[error("invalid start time '{value}': {source}")]
    StartTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid duration '{0}': expected H:M:S")]
    Duration(String),

    #[error("invalid {field} '{value}': not a decimal number")]
    Decimal { field: &'static str, value: String },

    #[error("{field} '{value}' is out of range")]
    OutOfRange { field: &'static str, value: String },

    #[error("unknown activity type '{0}'")]
    UnknownType(String),
}

/// Errors that terminate a report run.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("Need one argument: the CSV exported from Elevate")]
    InvalidArguments,

    #[error("{} is not a file", .0.display())]
    InputNotFound(PathBuf),

    /// `row` is 1-based and does not count the header.
    #[error("row {row}: {source}")]
    MalformedRecord {
        row: usize,
        #[source]
        source: MalformedRecordError,
    },
}
