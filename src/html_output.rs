//! HTML chart report
//!
//! Embeds the SVG stacked-area chart from [`crate::chart`] and follows it
//! with the ranked percent-of-total table. The output is a single
//! self-contained file.

use crate::chart;
use crate::error::Result;
use crate::pipeline::PipelineReport;
use crate::summary::{count_line, format_percent};

/// HTML report formatter
#[derive(Debug, Clone)]
pub struct HtmlOutput {
    title: String,
}

impl HtmlOutput {
    /// Create a formatter; `title` is shown above the chart
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        svg {
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        table {
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 6px 12px;
        }
        th {
            background-color: #4a90d9;
            color: white;
        }
        td.percent {
            text-align: right;
            font-family: monospace;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Render the percent-of-total table
    fn render_table(&self, report: &PipelineReport) -> String {
        let mut html = String::new();
        html.push_str("    <h2>CPU Usage Summary</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Process name</th><th>% Total CPU Usage</th></tr>\n");
        for entry in &report.percent_table {
            html.push_str(&format!(
                "        <tr><td>{}</td><td class=\"percent\">{}</td></tr>\n",
                Self::escape_html(&entry.name),
                format_percent(entry.percent_of_total)
            ));
        }
        html.push_str("    </table>\n");
        html.push_str(&format!("    <p>{}</p>\n", Self::escape_html(&count_line(report))));
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self, report: &PipelineReport) -> Result<String> {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str(&format!(
            "    <title>{}</title>\n",
            Self::escape_html(self.page_title())
        ));
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str(&format!("    <h1>{}</h1>\n", Self::escape_html(self.page_title())));
        html.push_str(&chart::render_svg(&report.selection, "")?);
        html.push('\n');
        html.push_str(&self.render_table(report));

        html.push_str("    <div class=\"footer\">\n");
        html.push_str(&format!(
            "        Generated by pcpuvis {}\n",
            env!("CARGO_PKG_VERSION")
        ));
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        Ok(html)
    }

    fn page_title(&self) -> &str {
        if self.title.is_empty() {
            "Process CPU Usage"
        } else {
            &self.title
        }
    }
}
