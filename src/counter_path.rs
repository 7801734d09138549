//! Header parsing for PDH-CSV 4.0 counter logs
//!
//! Row 0 of a counter log carries the format tag in cell 0 and one counter
//! path per metric column:
//!
//! ```text
//! "(PDH-CSV 4.0) (W. Europe Standard Time)(-60)","\\HOST\Process(chrome#3)\% Processor Time",...
//! ```
//!
//! Only the `object(instance)` segment of a counter path is consumed. The
//! instance is split into a process group and a numeric index at the last
//! separator (`#` for instance numbers, `_` for PIDs).
//!
//! # Example
//!
//! ```
//! use pcpuvis::counter_path::{InstanceName, Separator};
//!
//! let name = InstanceName::parse("chrome#3", Separator::Hash);
//! assert_eq!(name.group(), "chrome");
//! assert!(name.is_grouped());
//! ```

use crate::anomaly::{AnomalyKind, AnomalyLog};
use crate::error::{PcpuvisError, Result};
use serde::Serialize;

/// Format tag expected in the first header cell
pub const HEADER_TAG: &str = "PDH-CSV 4.0";

/// Zero-based position of the `object(instance)` segment in a counter path
const OBJECT_SEGMENT: usize = 3;

/// Separator between process group and index within an instance name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Separator {
    /// `chrome#3` - perfmon instance numbering (default)
    Hash,
    /// `chrome_4120` - process-ID suffixed instances
    Underscore,
}

impl Separator {
    pub fn from_numeric_pid(numeric_pid: bool) -> Self {
        if numeric_pid {
            Separator::Underscore
        } else {
            Separator::Hash
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Separator::Hash => '#',
            Separator::Underscore => '_',
        }
    }
}

/// Column role within the counter log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
    Timestamp,
    Metric,
}

/// Identity metadata for one counter log column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub kind: ColumnKind,
    /// Performance object name (`Process`), empty for the timestamp column
    pub object: String,
    /// Instance name inside the parentheses (`chrome#3`)
    pub instance: String,
    /// True when the instance carries a numeric index after the separator
    pub is_grouped: bool,
    /// Process group the instance belongs to (`chrome`)
    pub group_name: String,
    /// Instance number or PID for grouped instances
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
}

impl ColumnDescriptor {
    fn timestamp() -> Self {
        Self {
            kind: ColumnKind::Timestamp,
            object: String::new(),
            instance: String::new(),
            is_grouped: false,
            group_name: String::new(),
            index: None,
        }
    }
}

/// `object(instance)` segment of a counter path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectSegment {
    /// `Memory` - object without an instance
    ObjectOnly { object: String },
    /// `Process(chrome#3)`
    WithInstance { object: String, instance: String },
}

impl ObjectSegment {
    /// Parse the `object(instance)` text; the instance runs from the first
    /// `(` up to a trailing `)`, so nested parentheses stay in the instance.
    pub fn parse(segment: &str) -> Self {
        match segment.split_once('(') {
            None => ObjectSegment::ObjectOnly {
                object: segment.to_string(),
            },
            Some((object, rest)) => ObjectSegment::WithInstance {
                object: object.to_string(),
                instance: rest.strip_suffix(')').unwrap_or(rest).to_string(),
            },
        }
    }

    /// Extract the object segment from a full `\\host\object(instance)\counter` path
    pub fn from_counter_path(path: &str) -> Option<Self> {
        path.split('\\').nth(OBJECT_SEGMENT).map(Self::parse)
    }

    pub fn object(&self) -> &str {
        match self {
            ObjectSegment::ObjectOnly { object } | ObjectSegment::WithInstance { object, .. } => {
                object
            }
        }
    }

    pub fn instance(&self) -> &str {
        match self {
            ObjectSegment::ObjectOnly { .. } => "",
            ObjectSegment::WithInstance { instance, .. } => instance,
        }
    }
}

/// Classification of an instance name against the grouping rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceName {
    /// No separator, or separator at position 0 (`_Total`, `Idle`, `System`)
    Ungrouped { name: String },
    /// `chrome#3` -> group `chrome`, index 3
    Grouped { group: String, index: u64 },
    /// Separator present but the suffix is not a nonnegative integer
    NonNumericSuffix { name: String, suffix: String },
}

impl InstanceName {
    pub fn parse(instance: &str, separator: Separator) -> Self {
        match instance.rfind(separator.as_char()) {
            None | Some(0) => InstanceName::Ungrouped {
                name: instance.to_string(),
            },
            Some(pos) => {
                let group = &instance[..pos];
                let suffix = &instance[pos + 1..];
                match parse_index(suffix) {
                    Some(index) => InstanceName::Grouped {
                        group: group.to_string(),
                        index,
                    },
                    None => InstanceName::NonNumericSuffix {
                        name: instance.to_string(),
                        suffix: suffix.to_string(),
                    },
                }
            }
        }
    }

    /// Group name used for aggregation; ungrouped instances are their own group
    pub fn group(&self) -> &str {
        match self {
            InstanceName::Ungrouped { name } | InstanceName::NonNumericSuffix { name, .. } => name,
            InstanceName::Grouped { group, .. } => group,
        }
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, InstanceName::Grouped { .. })
    }

    pub fn index(&self) -> Option<u64> {
        match self {
            InstanceName::Grouped { index, .. } => Some(*index),
            _ => None,
        }
    }
}

fn parse_index(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Read the format tag out of the first header cell
///
/// `(PDH-CSV 4.0) (Zone)(-60)` splits on `(`, `)` and `_` into
/// `["", "PDH-CSV 4.0", " ", "Zone", ...]`; the second token is the tag.
pub fn header_tag(cell: &str) -> &str {
    cell.split(['(', ')', '_']).nth(1).unwrap_or("").trim()
}

/// Validate the format tag of the first header cell
pub fn validate_header_tag(cell: &str) -> Result<()> {
    let tag = header_tag(cell);
    if tag == HEADER_TAG {
        Ok(())
    } else {
        tracing::debug!(header = %cell, "invalid file header");
        Err(PcpuvisError::InvalidFormat {
            found: tag.to_string(),
        })
    }
}

/// Parse the header row into index-aligned column descriptors
///
/// Column 0 is always the timestamp. Instances whose index suffix is not
/// numeric are ungrouped and recorded as [`AnomalyKind::InstanceName`].
pub fn parse_header(
    header: &[String],
    numeric_pid: bool,
    anomalies: &mut AnomalyLog,
) -> Result<Vec<ColumnDescriptor>> {
    let first = header.first().map(String::as_str).unwrap_or("");
    validate_header_tag(first)?;

    let separator = Separator::from_numeric_pid(numeric_pid);
    let mut columns = Vec::with_capacity(header.len());
    columns.push(ColumnDescriptor::timestamp());

    for (column, path) in header.iter().enumerate().skip(1) {
        let segment = ObjectSegment::from_counter_path(path).ok_or_else(|| {
            PcpuvisError::MalformedCounterPath {
                column,
                path: path.clone(),
            }
        })?;

        let instance = segment.instance();
        let name = InstanceName::parse(instance, separator);
        if let InstanceName::NonNumericSuffix { suffix, .. } = &name {
            anomalies.record(
                AnomalyKind::InstanceName,
                None,
                Some(column),
                format!("incorrect process name column: {} (suffix '{}')", instance, suffix),
            );
        }

        columns.push(ColumnDescriptor {
            kind: ColumnKind::Metric,
            object: segment.object().to_string(),
            instance: instance.to_string(),
            is_grouped: name.is_grouped(),
            group_name: name.group().to_string(),
            index: name.index(),
        });
    }

    tracing::debug!(columns = ?columns, "parsed counter log header");
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    const TAG: &str = "(PDH-CSV 4.0) (W. Europe Standard Time)(-60)";

    #[test]
    fn test_header_tag_extraction() {
        assert_eq!(header_tag(TAG), "PDH-CSV 4.0");
        assert_eq!(header_tag("(PDH-CSV 3.0)"), "PDH-CSV 3.0");
        assert_eq!(header_tag("no tag here"), "");
    }

    #[test]
    fn test_validate_rejects_other_tags() {
        assert!(validate_header_tag(TAG).is_ok());
        let err = validate_header_tag("Time,Value").unwrap_err();
        assert!(matches!(err, PcpuvisError::InvalidFormat { .. }));
    }

    #[test]
    fn test_hash_grouped_instance() {
        let name = InstanceName::parse("chrome#3", Separator::Hash);
        assert_eq!(
            name,
            InstanceName::Grouped {
                group: "chrome".to_string(),
                index: 3
            }
        );
        assert!(name.is_grouped());
    }

    #[test]
    fn test_total_is_ungrouped_with_underscore() {
        let name = InstanceName::parse("_Total", Separator::Underscore);
        assert_eq!(name.group(), "_Total");
        assert!(!name.is_grouped());
    }

    #[test]
    fn test_numeric_pid_instance() {
        let name = InstanceName::parse("System_16", Separator::Underscore);
        assert_eq!(name.group(), "System");
        assert_eq!(name.index(), Some(16));
    }

    #[test]
    fn test_last_separator_wins() {
        let name = InstanceName::parse("my_app_2048", Separator::Underscore);
        assert_eq!(name.group(), "my_app");
        assert_eq!(name.index(), Some(2048));
    }

    #[test]
    fn test_no_separator_is_ungrouped() {
        let name = InstanceName::parse("Idle", Separator::Hash);
        assert_eq!(
            name,
            InstanceName::Ungrouped {
                name: "Idle".to_string()
            }
        );
    }

    #[test]
    fn test_non_numeric_suffix_falls_back() {
        let name = InstanceName::parse("svc#abc", Separator::Hash);
        assert_eq!(name.group(), "svc#abc");
        assert!(!name.is_grouped());
        assert!(matches!(name, InstanceName::NonNumericSuffix { .. }));
    }

    #[test]
    fn test_empty_suffix_falls_back() {
        let name = InstanceName::parse("svc#", Separator::Hash);
        assert!(matches!(name, InstanceName::NonNumericSuffix { .. }));
    }

    #[test]
    fn test_object_segment_with_instance() {
        let seg = ObjectSegment::from_counter_path(r"\\HOST\Process(chrome#3)\% Processor Time")
            .unwrap();
        assert_eq!(seg.object(), "Process");
        assert_eq!(seg.instance(), "chrome#3");
    }

    #[test]
    fn test_object_segment_without_instance() {
        let seg = ObjectSegment::from_counter_path(r"\\HOST\Memory\Available MBytes").unwrap();
        assert_eq!(
            seg,
            ObjectSegment::ObjectOnly {
                object: "Memory".to_string()
            }
        );
        assert_eq!(seg.instance(), "");
    }

    #[test]
    fn test_object_segment_nested_parentheses() {
        let seg = ObjectSegment::parse("Process(svchost (netsvcs))");
        assert_eq!(seg.object(), "Process");
        assert_eq!(seg.instance(), "svchost (netsvcs)");
    }

    #[test]
    fn test_parse_header_full_row() {
        let row = header(&[
            TAG,
            r"\\HOST\Process(_Total)\% Processor Time",
            r"\\HOST\Process(Idle)\% Processor Time",
            r"\\HOST\Process(chrome)\% Processor Time",
            r"\\HOST\Process(chrome#1)\% Processor Time",
        ]);
        let mut anomalies = AnomalyLog::new();
        let columns = parse_header(&row, false, &mut anomalies).unwrap();

        assert_eq!(columns.len(), 5);
        assert_eq!(columns[0].kind, ColumnKind::Timestamp);
        assert!(columns[1..].iter().all(|c| c.kind == ColumnKind::Metric));
        assert_eq!(columns[1].group_name, "_Total");
        assert_eq!(columns[3].group_name, "chrome");
        assert!(!columns[3].is_grouped);
        assert_eq!(columns[4].group_name, "chrome");
        assert!(columns[4].is_grouped);
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_parse_header_records_instance_anomaly() {
        let row = header(&[TAG, r"\\HOST\Process(svc#x)\% Processor Time"]);
        let mut anomalies = AnomalyLog::new();
        let columns = parse_header(&row, false, &mut anomalies).unwrap();

        assert_eq!(columns[1].group_name, "svc#x");
        assert_eq!(anomalies.count(AnomalyKind::InstanceName), 1);
        assert_eq!(anomalies.entries()[0].column, Some(1));
    }

    #[test]
    fn test_parse_header_invalid_tag() {
        let row = header(&["Time", r"\\HOST\Process(a)\% Processor Time"]);
        let mut anomalies = AnomalyLog::new();
        let err = parse_header(&row, false, &mut anomalies).unwrap_err();
        assert!(matches!(err, PcpuvisError::InvalidFormat { .. }));
    }

    #[test]
    fn test_parse_header_malformed_path() {
        let row = header(&[TAG, "Process(a)"]);
        let mut anomalies = AnomalyLog::new();
        let err = parse_header(&row, false, &mut anomalies).unwrap_err();
        assert!(matches!(
            err,
            PcpuvisError::MalformedCounterPath { column: 1, .. }
        ));
    }
}
