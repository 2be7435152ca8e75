//! Error types for loading and configuring an assignment run.
//!
//! Only the loading side can fail. Once a roster, panel or request list
//! has been validated, the allocators always return a (possibly partial)
//! result.

use thiserror::Error;

/// Malformed input detected while reading one of the CSV inputs.
///
/// Row numbers are 1-based and count data rows only (the header is not
/// row 1).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV itself is structurally broken (unbalanced quotes, ragged rows).
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A required header column is absent.
    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// A required field is present but empty.
    #[error("row {row}: field '{field}' is empty")]
    EmptyField { row: usize, field: &'static str },

    /// A time value is not `HH:MM` or `HH:MM:SS`.
    #[error("row {row}: '{value}' is not a valid time of day")]
    InvalidTime { row: usize, value: String },

    /// An availability interval is not `HH:MM-HH:MM`, or is zero-length.
    #[error("row {row}: '{value}' is not a valid availability interval")]
    InvalidInterval { row: usize, value: String },

    /// A slot count is not an integer.
    #[error("row {row}: '{value}' is not a valid number for '{field}'")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// A slot count is below zero.
    #[error("row {row}: capacity for '{field}' is negative ({value})")]
    NegativeCapacity {
        row: usize,
        field: &'static str,
        value: i64,
    },

    /// An availability flag is not a recognised boolean.
    #[error("row {row}: '{value}' is not a valid boolean for '{field}'")]
    InvalidBool {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// Two panel rows (or two roster rows) share the same key.
    #[error("row {row}: duplicate interviewer '{key}'")]
    DuplicateInterviewer { row: usize, key: String },
}

/// Invalid run configuration supplied as free text (query strings, flags).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown shift '{0}', expected 'day' or 'night'")]
    UnknownShift(String),

    #[error("invalid category mapping '{0}', expected REQUEST=FLAG")]
    InvalidCategoryMapping(String),

    #[error("slot duration must be between 1 and {max} minutes, got {0}", max = crate::schedule::slot_utils::MINUTES_PER_DAY)]
    SlotDurationOutOfRange(u32),
}
