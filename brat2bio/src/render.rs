//! Summary rendering for CLI output

use std::str::FromStr;

use brat2biolib::ConvertReport;
use console::Style;

/// How the batch summary is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            _ => Err(format!("Unknown output mode: {}", s)),
        }
    }
}

/// Render the batch summary.
pub fn render_report(report: &ConvertReport, mode: OutputMode) -> Result<String, anyhow::Error> {
    match mode {
        OutputMode::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
        OutputMode::Text => Ok(render_text(report.converted_count())),
    }
}

/// Plain summary line: the number of written files, or a notice when none were.
pub fn render_text(count: usize) -> String {
    if count == 0 {
        "No files found to convert.\n".to_string()
    } else {
        let bold = Style::new().bold();
        format!("Converted files: {}\n", bold.apply_to(count))
    }
}
