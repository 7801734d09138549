//! Ranking, percent-of-total table and top-N time series
//!
//! The five heaviest non-reserved names become individual chart series;
//! everything else except `_Total` and `Idle` is folded into `_Other`.

use crate::aggregate::{Level, SampleRow};
use crate::error::{PcpuvisError, Result};
use crate::sample::{round_to, MAX_PERCENT};
use crate::totals::{is_reserved, Totals, TOTAL_KEY};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of individually charted series
pub const TOP_N: usize = 5;

/// Series key of the residual bucket
pub const OTHER_KEY: &str = "_Other";

/// Legend name of the residual bucket
pub const OTHER_LABEL: &str = "Other";

/// Decimal digits of percent-of-total values
const PERCENT_DECIMALS: i32 = 3;

/// Decimal digits of legend averages
const AVERAGE_DECIMALS: i32 = 1;

/// A name with its accumulated utilization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub total: f64,
}

/// Share of the `_Total` aggregate consumed by one name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentEntry {
    pub name: String,
    pub percent_of_total: f64,
}

/// Top-N series aligned with the sample rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSelection {
    /// Shared X axis: Unix time of every sample row
    pub timestamps: Vec<i64>,
    /// Top names, heaviest first
    pub top_names: Vec<String>,
    /// Integer percentage per row for every top name
    pub per_name_series: BTreeMap<String, Vec<u8>>,
    /// Integer percentage per row of everything outside the top names
    pub other_series: Vec<u8>,
    /// Series average per top name, one decimal
    pub averages: BTreeMap<String, f64>,
    /// Average of `other_series`, one decimal
    pub other_average: f64,
}

impl TopSelection {
    /// Legend labels `"<name>: <avg>%"`, top names first, then `Other`
    pub fn legend_labels(&self) -> Vec<String> {
        self.top_names
            .iter()
            .map(|name| {
                let avg = self.averages.get(name).copied().unwrap_or(0.0);
                format!("{}: {:.1}%", name, avg)
            })
            .chain(std::iter::once(format!(
                "{}: {:.1}%",
                OTHER_LABEL, self.other_average
            )))
            .collect()
    }

    /// Stacked chart series in drawing order: top names, then `_Other`
    pub fn stacked(&self) -> Vec<(&str, &[u8])> {
        self.top_names
            .iter()
            .map(|name| {
                let values = self
                    .per_name_series
                    .get(name)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                (name.as_str(), values)
            })
            .chain(std::iter::once((OTHER_KEY, self.other_series.as_slice())))
            .collect()
    }
}

/// Sort non-reserved totals descending; ties keep insertion order
pub fn rank(totals: &Totals) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = totals
        .iter()
        .filter(|(name, _)| !is_reserved(name))
        .map(|(name, total)| RankedEntry {
            name: name.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked
}

/// The first [`TOP_N`] ranked names
pub fn top_names(ranked: &[RankedEntry]) -> Result<Vec<String>> {
    if ranked.len() < TOP_N {
        return Err(PcpuvisError::InsufficientData {
            required: TOP_N,
            actual: ranked.len(),
        });
    }
    Ok(ranked[..TOP_N].iter().map(|e| e.name.clone()).collect())
}

/// Percent of `_Total` for every key, reserved ones included, sorted descending
pub fn percent_of_total(totals: &Totals) -> Result<Vec<PercentEntry>> {
    let total = totals.get(TOTAL_KEY).unwrap_or(0.0);
    if total == 0.0 {
        return Err(PcpuvisError::DivisionByZero {
            key: TOTAL_KEY.to_string(),
        });
    }

    let mut table: Vec<PercentEntry> = totals
        .iter()
        .map(|(name, value)| PercentEntry {
            name: name.to_string(),
            percent_of_total: round_to(value * 100.0 / total, PERCENT_DECIMALS),
        })
        .collect();
    table.sort_by(|a, b| b.percent_of_total.total_cmp(&a.percent_of_total));
    Ok(table)
}

/// Whole percent for the chart series, ties to even
fn to_percent(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, MAX_PERCENT) as u8
}

fn average(series: &[u8]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let sum: u64 = series.iter().map(|&v| u64::from(v)).sum();
    round_to(sum as f64 / series.len() as f64, AVERAGE_DECIMALS)
}

/// Build the top-N and `_Other` series from the per-row maps at `level`
///
/// `ranked` is the output of [`rank`] over the totals at the same level.
pub fn select(ranked: &[RankedEntry], rows: &[SampleRow], level: Level) -> Result<TopSelection> {
    let top_names = top_names(ranked)?;
    tracing::debug!(top = ?top_names, "top processes");

    let mut per_name_series: BTreeMap<String, Vec<u8>> = top_names
        .iter()
        .map(|name| (name.clone(), Vec::with_capacity(rows.len())))
        .collect();
    let mut other_series = Vec::with_capacity(rows.len());
    let mut timestamps = Vec::with_capacity(rows.len());

    for row in rows {
        let values = row.values(level);
        timestamps.push(row.unix_time);

        for name in &top_names {
            let value = to_percent(values.get(name).unwrap_or(0.0));
            if let Some(series) = per_name_series.get_mut(name) {
                series.push(value);
            }
        }

        let other: f64 = values
            .iter()
            .filter(|(name, _)| !is_reserved(name) && !top_names.iter().any(|t| t == name))
            .map(|(_, value)| value)
            .sum();
        other_series.push(to_percent(other));
    }

    let averages = per_name_series
        .iter()
        .map(|(name, series)| (name.clone(), average(series)))
        .collect();
    let other_average = average(&other_series);

    Ok(TopSelection {
        timestamps,
        top_names,
        per_name_series,
        other_series,
        averages,
        other_average,
    })
}
