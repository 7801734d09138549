//! Per-row and global aggregation of normalized samples
//!
//! The aggregator is a fold: each data row is turned into a [`SampleRow`]
//! and absorbed into an [`Aggregation`] value that is threaded through the
//! scan and returned at the end. No state lives outside the accumulator.

use crate::anomaly::{AnomalyKind, AnomalyLog};
use crate::counter_path::{ColumnDescriptor, ColumnKind};
use crate::error::{PcpuvisError, Result};
use crate::sample::{normalize, parse_timestamp};
use crate::totals::Totals;
use serde::Serialize;

/// One data row after normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    /// Timestamp exactly as found in the log
    pub date: String,
    /// Unix epoch of `date` interpreted as local time
    pub unix_time: i64,
    /// Normalized utilization per instance
    pub per_instance: Totals,
    /// Sum of `per_instance` values sharing a group name
    pub per_group: Totals,
}

impl SampleRow {
    /// Per-row map matching an aggregation level
    pub fn values(&self, level: Level) -> &Totals {
        match level {
            Level::Instance => &self.per_instance,
            Level::Group => &self.per_group,
        }
    }
}

/// Aggregation level selected by the details flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Every process instance individually (`chrome#1`, `chrome#2`)
    Instance,
    /// Instances summed per process group (`chrome`)
    Group,
}

impl Level {
    pub fn from_detailed(detailed: bool) -> Self {
        if detailed {
            Level::Instance
        } else {
            Level::Group
        }
    }
}

/// Running totals across all sample rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlobalTotals {
    pub per_instance_total: Totals,
    pub per_group_total: Totals,
}

impl GlobalTotals {
    /// Add one row's contribution
    pub fn absorb(&mut self, row: &SampleRow) {
        self.per_instance_total.merge(&row.per_instance);
        self.per_group_total.merge(&row.per_group);
    }

    /// Merge totals accumulated over another partition of rows
    pub fn merge(&mut self, other: &GlobalTotals) {
        self.per_instance_total.merge(&other.per_instance_total);
        self.per_group_total.merge(&other.per_group_total);
    }

    pub fn at(&self, level: Level) -> &Totals {
        match level {
            Level::Instance => &self.per_instance_total,
            Level::Group => &self.per_group_total,
        }
    }
}

/// Accumulator threaded through the row scan
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    pub rows: Vec<SampleRow>,
    pub totals: GlobalTotals,
    pub anomalies: AnomalyLog,
}

impl Aggregation {
    /// Absorb a finished row into the accumulator
    pub fn push(mut self, row: SampleRow) -> Self {
        self.totals.absorb(&row);
        self.rows.push(row);
        self
    }
}

/// Turns raw data rows into sample rows using the parsed header
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    columns: &'a [ColumnDescriptor],
    cores: u32,
    row_offset: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(columns: &'a [ColumnDescriptor], cores: u32) -> Self {
        Self {
            columns,
            cores,
            row_offset: 0,
        }
    }

    /// Shift reported row numbers when leading rows were skipped
    pub fn with_row_offset(mut self, row_offset: usize) -> Self {
        self.row_offset = row_offset;
        self
    }

    /// Normalize a single data row
    pub fn sample_row(
        &self,
        row_index: usize,
        cells: &[String],
        anomalies: &mut AnomalyLog,
    ) -> Result<SampleRow> {
        let row_number = row_index + self.row_offset;
        let date = cells.first().map(String::as_str).unwrap_or("");
        let unix_time = parse_timestamp(date).ok_or_else(|| PcpuvisError::InvalidTimestamp {
            row: row_number,
            value: date.to_string(),
        })?;

        if cells.len() != self.columns.len() {
            anomalies.record(
                AnomalyKind::RaggedRow,
                Some(row_number),
                None,
                format!("{} cells, header has {}", cells.len(), self.columns.len()),
            );
        }

        let mut per_instance = Totals::new();
        let mut per_group = Totals::new();

        for (column, (cell, descriptor)) in cells.iter().zip(self.columns).enumerate() {
            if descriptor.kind == ColumnKind::Timestamp {
                continue;
            }

            let sample = normalize(cell, self.cores);
            if sample.parse_failed {
                anomalies.record(
                    AnomalyKind::ValueParse,
                    Some(row_number),
                    Some(column),
                    format!("float convert error for instance {}: '{}'", descriptor.instance, cell),
                );
            }
            if let Some(value) = sample.over_range {
                anomalies.record(
                    AnomalyKind::OverRange,
                    Some(row_number),
                    Some(column),
                    format!("value over 100 for instance {}: {}", descriptor.instance, value),
                );
            }

            per_instance.add(&descriptor.instance, sample.value);
            per_group.add(&descriptor.group_name, sample.value);
        }

        Ok(SampleRow {
            date: date.to_string(),
            unix_time,
            per_instance,
            per_group,
        })
    }

    /// One fold step: normalize `cells` and absorb it into `acc`
    pub fn fold(&self, mut acc: Aggregation, row_index: usize, cells: &[String]) -> Result<Aggregation> {
        let row = self.sample_row(row_index, cells, &mut acc.anomalies)?;
        Ok(acc.push(row))
    }

    /// Aggregate all data rows in file order
    ///
    /// `progress` is called with `(done, total)` after every row. Zero rows
    /// produce an empty aggregation.
    pub fn aggregate<F>(&self, rows: &[Vec<String>], mut progress: F) -> Result<Aggregation>
    where
        F: FnMut(usize, usize),
    {
        let total = rows.len();
        let aggregation = rows
            .iter()
            .enumerate()
            .try_fold(Aggregation::default(), |acc, (i, cells)| {
                let acc = self.fold(acc, i, cells)?;
                progress(i + 1, total);
                Ok::<_, PcpuvisError>(acc)
            })?;

        tracing::info!(
            rows = aggregation.rows.len(),
            instances = aggregation.totals.per_instance_total.len(),
            groups = aggregation.totals.per_group_total.len(),
            anomalies = aggregation.anomalies.len(),
            "aggregated counter log"
        );
        Ok(aggregation)
    }
}
