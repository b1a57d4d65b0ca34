//! Error types for snapdelta
//!
//! Provides a unified error type for all operations. Errors are structured
//! values so callers can distinguish failure kinds programmatically instead
//! of matching on rendered messages.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DeltaError
pub type Result<T> = std::result::Result<T, DeltaError>;

/// Which comparator argument a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Which input dataset of a delta calculation is being reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Old,
    New,
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dataset::Old => write!(f, "old"),
            Dataset::New => write!(f, "new"),
        }
    }
}

/// Unified error type for snapdelta operations
#[derive(Debug, Error)]
pub enum DeltaError {
    // -------------------------------------------------------------------------
    // Merge Errors
    // -------------------------------------------------------------------------
    #[error("{dataset} dataset is not sorted by key: record {record} comes after key {previous_key}")]
    SortOrderViolation {
        dataset: Dataset,
        record: String,
        previous_key: String,
    },

    // -------------------------------------------------------------------------
    // Comparator Errors
    // -------------------------------------------------------------------------
    #[error("non-numeric key field {field} in {side} record: {value}")]
    NonNumericKeyValue {
        field: String,
        side: Side,
        value: String,
    },

    // -------------------------------------------------------------------------
    // Sorter Errors
    // -------------------------------------------------------------------------
    #[error("sort position {position} does not match number of values {field_count}")]
    InvalidSortPosition { position: usize, field_count: usize },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("empty list of values given for table {table}")]
    EmptyValueSet { table: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}

impl DeltaError {
    /// Wrap an I/O error with the path and operation that produced it
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        DeltaError::Io {
            path: path.into(),
            operation,
            source,
        }
    }
}
