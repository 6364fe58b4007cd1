//! Report output in human-readable or JSON form.

use crate::report::{format_report, FinalReport};

/// Output mode for CLI results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Writes the final report and top-level errors
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub mode: OutputMode,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self {
            mode: if json { OutputMode::Json } else { OutputMode::Human },
        }
    }

    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Render the final report for stdout
    pub fn render_report(&self, report: &FinalReport) -> String {
        match self.mode {
            OutputMode::Json => serde_json::to_string_pretty(&report.document())
                .map(|mut json| {
                    json.push('\n');
                    json
                })
                .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}\n", e)),
            OutputMode::Human => format_report(report),
        }
    }

    /// Print the final report
    pub fn report(&self, report: &FinalReport) {
        print!("{}", self.render_report(report));
    }

    /// Print an error message to stderr
    pub fn error(&self, msg: &str) {
        match self.mode {
            OutputMode::Json => {
                let doc = serde_json::json!({ "error": sanitize_error(msg) });
                eprintln!("{}", doc);
            }
            OutputMode::Human => {
                eprintln!("Error: {}", sanitize_error(msg));
            }
        }
    }
}

/// Sanitize error messages by collapsing whitespace
pub fn sanitize_error(msg: &str) -> String {
    msg.split_whitespace().collect::<Vec<&str>>().join(" ")
}
