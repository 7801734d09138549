//! pcpuvis - process CPU visualizer for performance-counter logs
//!
//! This library parses Windows performance monitor logs in PDH-CSV 4.0
//! format, normalizes per-process `% Processor Time` samples by core count,
//! aggregates them per instance and per process group, and selects the
//! top five consumers plus an `Other` bucket for charting.

pub mod aggregate;
pub mod anomaly;
pub mod chart;
pub mod cli;
pub mod config;
pub mod counter_path;
pub mod csv_input;
pub mod csv_output;
pub mod error;
pub mod html_output;
pub mod json_output;
pub mod pipeline;
pub mod sample;
pub mod summary;
pub mod top_n;
pub mod totals;

pub use error::{PcpuvisError, Result};
