//! Counter log loading
//!
//! PDH exports quote every field (`"10/17/2026 14:03:15.123","12.5"`) and
//! counter paths may contain commas, so cells are split with a real CSV
//! reader. Rows may differ in length; the aggregator reports ragged rows.
//! The whole file is loaded into memory before processing.

use crate::error::Result;
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Rows of cells, header first
pub type Table = Vec<Vec<String>>;

/// Read and split a counter log file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let table = parse(&content)?;
    tracing::debug!(path = %path.display(), rows = table.len(), "loaded counter log");
    Ok(table)
}

/// Split CSV text into rows of unquoted cells
///
/// Blank lines are skipped, and a leading UTF-8 byte order mark is ignored.
pub fn parse(content: &str) -> Result<Table> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        table.push(record.iter().map(str::to_string).collect());
    }
    Ok(table)
}
