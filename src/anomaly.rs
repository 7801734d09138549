//! Non-fatal parse anomalies
//!
//! Malformed cells, instance names that break the grouping rules and
//! samples far above 100% are recorded here instead of aborting the run.
//! Every recorded anomaly is also emitted as a `tracing` debug event.

use serde::Serialize;

/// What went wrong with a single cell or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Cell did not parse as a float; substituted with 0.0
    ValueParse,
    /// Instance suffix after the separator was not numeric; column ungrouped
    InstanceName,
    /// Normalized value exceeded 101 before clamping to 100
    OverRange,
    /// Data row has a different cell count than the header
    RaggedRow,
}

/// A single recorded anomaly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseAnomaly {
    pub kind: AnomalyKind,
    /// Data row index (0 = first row after the header), `None` for header anomalies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Column index in the counter log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Human-readable detail (instance name, offending value)
    pub detail: String,
}

/// Collector for anomalies found during one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnomalyLog {
    entries: Vec<ParseAnomaly>,
}

impl AnomalyLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an anomaly and emit it as a debug event
    pub fn record(
        &mut self,
        kind: AnomalyKind,
        row: Option<usize>,
        column: Option<usize>,
        detail: impl Into<String>,
    ) {
        let detail = detail.into();
        tracing::debug!(?kind, ?row, ?column, %detail, "parse anomaly");
        self.entries.push(ParseAnomaly {
            kind,
            row,
            column,
            detail,
        });
    }

    /// Append every anomaly of another log, preserving order
    pub fn extend(&mut self, other: AnomalyLog) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ParseAnomaly] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of anomalies of a given kind
    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.entries.iter().filter(|a| a.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_count() {
        let mut log = AnomalyLog::new();
        log.record(AnomalyKind::ValueParse, Some(0), Some(2), "N/A");
        log.record(AnomalyKind::OverRange, Some(1), Some(3), "150.5");
        log.record(AnomalyKind::ValueParse, Some(4), Some(1), "");

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(AnomalyKind::ValueParse), 2);
        assert_eq!(log.count(AnomalyKind::OverRange), 1);
        assert_eq!(log.count(AnomalyKind::InstanceName), 0);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = AnomalyLog::new();
        first.record(AnomalyKind::InstanceName, None, Some(1), "foo#bar");
        let mut second = AnomalyLog::new();
        second.record(AnomalyKind::RaggedRow, Some(0), None, "3 cells, header has 4");

        first.extend(second);
        assert_eq!(first.entries()[0].kind, AnomalyKind::InstanceName);
        assert_eq!(first.entries()[1].kind, AnomalyKind::RaggedRow);
    }

    #[test]
    fn test_serializes_snake_case_kind() {
        let mut log = AnomalyLog::new();
        log.record(AnomalyKind::OverRange, Some(2), Some(5), "130");
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"over_range\""));
        assert!(json.contains("\"row\":2"));
    }
}
