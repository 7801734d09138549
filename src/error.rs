//! Error taxonomy for the counter-log pipeline
//!
//! Structural failures abort the operation that hit them. Per-cell and
//! per-column problems are not errors: they are recorded in
//! [`crate::anomaly::AnomalyLog`] and processing continues.

use thiserror::Error;

/// Errors surfaced by the parsing and aggregation pipeline
#[derive(Error, Debug)]
pub enum PcpuvisError {
    #[error("Not a recognized counter log: expected header tag 'PDH-CSV 4.0', found '{found}'")]
    InvalidFormat { found: String },

    #[error("Malformed counter path in column {column}: '{path}'")]
    MalformedCounterPath { column: usize, path: String },

    #[error("Invalid timestamp in row {row}: '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("Counter log is empty (no header row)")]
    EmptyLog,

    #[error("Insufficient data: need at least {required} ranked entries, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Division by zero: '{key}' total is zero")]
    DivisionByZero { key: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PcpuvisError>;
