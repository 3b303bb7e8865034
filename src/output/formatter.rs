//! Output formatters for run summaries
//!
//! Provides the console summary block plus JSON and one-line formats.

use crate::models::{CriticalStatus, RunSummary};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format the final run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
            OutputFormat::Summary => self.format_summary_brief(summary),
        }
    }

    fn paint(&self, text: String, code: &str) -> String {
        if self.colorize {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let rule = "=".repeat(60);
        let mut output = String::new();

        output.push_str(&format!("\n{rule}\n🏁 TEST SUMMARY\n{rule}\n"));
        output.push_str(&format!("Total Tests: {}\n", summary.total));
        output.push_str(&format!(
            "Passed: {} ✅\n",
            self.paint(summary.passed.to_string(), "32")
        ));

        let failed = if summary.failed > 0 {
            self.paint(summary.failed.to_string(), "31")
        } else {
            summary.failed.to_string()
        };
        output.push_str(&format!("Failed: {failed} ❌\n"));
        if summary.skipped > 0 {
            output.push_str(&format!("Skipped: {} ⏭️\n", summary.skipped));
        }
        output.push_str(&format!("Success Rate: {:.1}%\n", summary.success_rate()));
        output.push_str(&format!("Duration: {}ms\n", summary.duration_ms));

        if !summary.failures.is_empty() {
            output.push_str("\n❌ FAILED TESTS:\n");
            for failure in &summary.failures {
                output.push_str(&format!("  - {}: {}\n", failure.name, failure.message));
            }
        }

        if !summary.skips.is_empty() {
            output.push_str("\n⏭️  SKIPPED TESTS:\n");
            for skip in &summary.skips {
                output.push_str(&format!("  - {}: {}\n", skip.name, skip.reason));
            }
        }

        output.push_str("\n🎯 CRITICAL FUNCTIONALITY STATUS:\n");
        for check in &summary.critical {
            match check.status {
                CriticalStatus::NotRun => output.push_str(&format!(
                    "  {} {} (Not tested)\n",
                    check.status.symbol(),
                    check.name
                )),
                _ => output.push_str(&format!("  {} {}\n", check.status.symbol(), check.name)),
            }
        }

        output
    }

    fn format_summary_brief(&self, summary: &RunSummary) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%), {} skipped in {}ms",
            summary.base_url,
            summary.passed,
            summary.total,
            summary.success_rate(),
            summary.skipped,
            summary.duration_ms
        )
    }
}
