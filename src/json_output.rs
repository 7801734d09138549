//! JSON output format for pipeline reports

use crate::aggregate::{GlobalTotals, Level};
use crate::anomaly::ParseAnomaly;
use crate::config::PipelineConfig;
use crate::pipeline::PipelineReport;
use crate::top_n::{PercentEntry, RankedEntry, TopSelection};
use serde::Serialize;

/// Row and column counts of the processed log
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub rows: usize,
    pub columns: usize,
    /// Process groups, reserved names excluded
    pub groups: usize,
    /// Unique process instances, reserved names excluded
    pub instances: usize,
    pub anomalies: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Format version identifier
    pub version: &'static str,
    /// Format name
    pub format: &'static str,
    pub config: &'a PipelineConfig,
    pub level: Level,
    pub summary: JsonSummary,
    pub totals: &'a GlobalTotals,
    pub ranked: &'a [RankedEntry],
    pub percent_table: &'a [PercentEntry],
    pub selection: &'a TopSelection,
    /// `"<name>: <avg>%"` labels in chart order
    pub legend: Vec<String>,
    #[serde(skip_serializing_if = "no_anomalies")]
    pub anomalies: &'a [ParseAnomaly],
}

fn no_anomalies(anomalies: &&[ParseAnomaly]) -> bool {
    anomalies.is_empty()
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a PipelineReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            format: "pcpuvis-json-v1",
            config: &report.config,
            level: report.level,
            summary: JsonSummary {
                rows: report.row_count(),
                columns: report.column_count(),
                groups: report.group_count(),
                instances: report.instance_count(),
                anomalies: report.anomalies.len(),
            },
            totals: &report.totals,
            ranked: &report.ranked,
            percent_table: &report.percent_table,
            selection: &report.selection,
            legend: report.selection.legend_labels(),
            anomalies: report.anomalies.entries(),
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline;

    fn report() -> PipelineReport {
        let header: Vec<String> = std::iter::once("(PDH-CSV 4.0) (UTC)(0)".to_string())
            .chain(
                ["_Total", "Idle", "a", "b", "c", "d", "e"]
                    .iter()
                    .map(|i| format!(r"\\H\Process({})\% Processor Time", i)),
            )
            .collect();
        let row: Vec<String> = ["01/01/2020 00:00:00.000", "50", "50", "20", "10", "10", "5", "5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        pipeline::run(&[header, row], &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_json_output_structure() {
        let report = report();
        let json = JsonOutput::new(&report).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["format"], "pcpuvis-json-v1");
        assert_eq!(value["level"], "group");
        assert_eq!(value["summary"]["rows"], 1);
        assert_eq!(value["summary"]["groups"], 5);
        assert_eq!(value["selection"]["top_names"][0], "a");
        assert_eq!(value["legend"][5], "Other: 0.0%");
        assert!(value.get("anomalies").is_none());
    }

    #[test]
    fn test_json_totals_keep_order() {
        let report = report();
        let json = JsonOutput::new(&report).to_json().unwrap();
        let total_pos = json.find("\"_Total\"").unwrap();
        let idle_pos = json.find("\"Idle\"").unwrap();
        assert!(total_pos < idle_pos);
    }
}
