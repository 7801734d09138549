//! Pipeline driver: header -> aggregation -> percent table -> top-N
//!
//! The `detailed` flag is the only runtime decision: it selects
//! instance-level totals and per-row maps instead of group-level ones.
//! Structural errors propagate unchanged; anomalies are collected in the
//! report.

use crate::aggregate::{Aggregator, GlobalTotals, Level, SampleRow};
use crate::anomaly::AnomalyLog;
use crate::config::PipelineConfig;
use crate::counter_path::{parse_header, ColumnDescriptor};
use crate::csv_input;
use crate::error::{PcpuvisError, Result};
use crate::top_n::{self, PercentEntry, RankedEntry, TopSelection};
use serde::Serialize;
use std::path::Path;

/// Everything the pipeline produced for one counter log
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub config: PipelineConfig,
    pub level: Level,
    /// Header tag was recognized
    pub valid_file: bool,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<SampleRow>,
    pub totals: GlobalTotals,
    /// Non-reserved entries at `level`, heaviest first
    pub ranked: Vec<RankedEntry>,
    /// Percent of `_Total` for every entry at `level`, reserved ones included
    pub percent_table: Vec<PercentEntry>,
    pub selection: TopSelection,
    pub anomalies: AnomalyLog,
}

impl PipelineReport {
    /// Data rows aggregated
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Metric columns in the header
    pub fn column_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Process groups seen, `_Total` and `Idle` excluded
    pub fn group_count(&self) -> usize {
        self.totals.per_group_total.unreserved_len()
    }

    /// Unique process instances seen, `_Total` and `Idle` excluded
    pub fn instance_count(&self) -> usize {
        self.totals.per_instance_total.unreserved_len()
    }
}

/// Run the pipeline over an in-memory table without progress reporting
pub fn run(table: &[Vec<String>], config: &PipelineConfig) -> Result<PipelineReport> {
    run_with_progress(table, config, |_, _| {})
}

/// Run the pipeline, reporting `(done, total)` after each data row
pub fn run_with_progress<F>(
    table: &[Vec<String>],
    config: &PipelineConfig,
    progress: F,
) -> Result<PipelineReport>
where
    F: FnMut(usize, usize),
{
    config.validate()?;

    let (header, data) = table.split_first().ok_or(PcpuvisError::EmptyLog)?;
    let mut anomalies = AnomalyLog::new();
    let columns = parse_header(header, config.numeric_pid, &mut anomalies)?;
    tracing::info!(columns = columns.len() - 1, rows = data.len(), "counter log header is valid");

    let skip = config.skip_leading_samples.min(data.len());
    let aggregation = Aggregator::new(&columns, config.cores)
        .with_row_offset(skip)
        .aggregate(&data[skip..], progress)?;
    anomalies.extend(aggregation.anomalies);

    let level = Level::from_detailed(config.detailed);
    let totals = aggregation.totals.at(level);

    let ranked = top_n::rank(totals);
    tracing::debug!(ranked = ?ranked, "ranked totals");
    let percent_table = top_n::percent_of_total(totals)?;
    let selection = top_n::select(&ranked, &aggregation.rows, level)?;

    Ok(PipelineReport {
        config: config.clone(),
        level,
        valid_file: true,
        columns,
        rows: aggregation.rows,
        totals: aggregation.totals,
        ranked,
        percent_table,
        selection,
        anomalies,
    })
}

/// Load a counter log from disk and run the pipeline over it
pub fn run_file<P, F>(path: P, config: &PipelineConfig, progress: F) -> Result<PipelineReport>
where
    P: AsRef<Path>,
    F: FnMut(usize, usize),
{
    let table = csv_input::load(path)?;
    run_with_progress(&table, config, progress)
}
