//! Per-cell sample normalization and timestamp parsing
//!
//! Raw `% Processor Time` values are summed over all cores, so a process
//! can report more than 100. Dividing by the core count yields a
//! system-wide percentage which is then clamped into `[0, 100]`.

use chrono::{Local, NaiveDateTime, TimeZone};

/// Upper bound of a normalized sample
pub const MAX_PERCENT: f64 = 100.0;

/// Normalized values above this are reported as anomalies before clamping
pub const OVER_RANGE_THRESHOLD: f64 = 101.0;

/// Decimal digits kept after dividing by the core count
const SAMPLE_DECIMALS: i32 = 3;

/// Timestamp layout of data row cell 0: `10/17/2026 14:03:15.123456`
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S%.f";

/// Round to `decimals` digits, ties to even (`2.25` -> `2.2`)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Result of normalizing one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    /// Core-normalized utilization in `[0, 100]`
    pub value: f64,
    /// Cell did not parse as a finite float and was replaced by 0.0
    pub parse_failed: bool,
    /// Pre-clamp value when it exceeded [`OVER_RANGE_THRESHOLD`]
    pub over_range: Option<f64>,
}

/// Normalize a raw cell against the system core count
///
/// `cores` must be positive; [`crate::pipeline::PipelineConfig::validate`]
/// guarantees this before any row is processed.
pub fn normalize(raw: &str, cores: u32) -> NormalizedSample {
    let (parsed, parse_failed) = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => (v, false),
        _ => (0.0, true),
    };

    let value = round_to(parsed / f64::from(cores), SAMPLE_DECIMALS);
    let over_range = (value > OVER_RANGE_THRESHOLD).then_some(value);

    NormalizedSample {
        value: value.clamp(0.0, MAX_PERCENT),
        parse_failed,
        over_range,
    }
}

/// Convert a counter log timestamp to a Unix epoch using local-time semantics
///
/// Fractional seconds are dropped. On a DST fold the earlier instant is
/// used; times inside a DST gap do not exist and yield `None`.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
}
