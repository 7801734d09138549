//! Text rendering of the percent-of-total table
//!
//! ```text
//! +--------------+-------------------+
//! | Process name | % Total CPU Usage |
//! +--------------+-------------------+
//! | _Total       |             100.0 |
//! | chrome       |            41.257 |
//! +--------------+-------------------+
//! ```

use crate::pipeline::PipelineReport;
use crate::top_n::PercentEntry;

const NAME_HEADER: &str = "Process name";
const PERCENT_HEADER: &str = "% Total CPU Usage";

/// Format a percentage the way the table prints it: `100.0`, `33.333`
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Render the ranked table with a left-aligned name and right-aligned percent column
pub fn render_table(entries: &[PercentEntry]) -> String {
    let cells: Vec<(&str, String)> = entries
        .iter()
        .map(|e| (e.name.as_str(), format_percent(e.percent_of_total)))
        .collect();

    let name_width = cells
        .iter()
        .map(|(n, _)| n.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(0);
    let percent_width = cells
        .iter()
        .map(|(_, p)| p.len())
        .chain(std::iter::once(PERCENT_HEADER.len()))
        .max()
        .unwrap_or(0);

    let rule = format!("+{}+{}+", "-".repeat(name_width + 2), "-".repeat(percent_width + 2));
    let mut lines = vec![
        rule.clone(),
        format!(
            "| {:<nw$} | {:^pw$} |",
            NAME_HEADER,
            PERCENT_HEADER,
            nw = name_width,
            pw = percent_width
        ),
        rule.clone(),
    ];
    for (name, percent) in &cells {
        lines.push(format!(
            "| {:<nw$} | {:>pw$} |",
            name,
            percent,
            nw = name_width,
            pw = percent_width
        ));
    }
    lines.push(rule);

    lines.join("\n")
}

/// `Number of process groups: G (U unique processes)`
pub fn count_line(report: &PipelineReport) -> String {
    format!(
        "Number of process groups: {} ({} unique processes)",
        report.group_count(),
        report.instance_count()
    )
}

/// Legend of the charted series, one label per line
pub fn render_legend(report: &PipelineReport) -> String {
    report.selection.legend_labels().join("\n")
}
