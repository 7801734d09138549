//! CSV output format for the ranked table and the top-N time series

use crate::pipeline::PipelineReport;
use crate::summary::format_percent;
use crate::top_n::{TopSelection, OTHER_LABEL};

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// `process,percent_of_total` rows, heaviest first
pub fn percent_table_csv(report: &PipelineReport) -> String {
    let mut output = String::from("process,percent_of_total\n");
    for entry in &report.percent_table {
        output.push_str(&escape_field(&entry.name));
        output.push(',');
        output.push_str(&format_percent(entry.percent_of_total));
        output.push('\n');
    }
    output
}

/// `timestamp,unix,<top names...>,Other` rows, one per sample
///
/// `dates` supplies the timestamp strings as logged, index-aligned with
/// the selection's series.
pub fn series_csv(selection: &TopSelection, dates: &[&str]) -> String {
    let mut headers = vec!["timestamp".to_string(), "unix".to_string()];
    headers.extend(selection.top_names.iter().map(|n| escape_field(n)));
    headers.push(OTHER_LABEL.to_string());

    let mut output = headers.join(",");
    output.push('\n');

    let stacked = selection.stacked();
    for (i, unix) in selection.timestamps.iter().enumerate() {
        let mut fields = vec![
            escape_field(dates.get(i).copied().unwrap_or("")),
            unix.to_string(),
        ];
        fields.extend(
            stacked
                .iter()
                .map(|(_, series)| series.get(i).map(u8::to_string).unwrap_or_default()),
        );
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// Ranked table followed by a blank line and the time series
pub fn to_csv(report: &PipelineReport) -> String {
    let dates: Vec<&str> = report.rows.iter().map(|r| r.date.as_str()).collect();
    format!(
        "{}\n{}",
        percent_table_csv(report),
        series_csv(&report.selection, &dates)
    )
}
