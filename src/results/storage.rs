//! Report export
//!
//! Writes a finished run to disk as JSON, YAML or CSV.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::models::RunSummary;

/// Stored report wrapping a run summary with tool metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredReport {
    /// Tool version that produced the report
    pub tool_version: String,

    /// Operating system
    pub os: String,

    /// Success rate in percent
    pub success_rate: f64,

    #[serde(flatten)]
    pub summary: RunSummary,
}

impl StoredReport {
    pub fn new(summary: &RunSummary) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            success_rate: summary.success_rate(),
            summary: summary.clone(),
        }
    }
}

/// Export format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

/// Writes run reports to files
pub struct ReportWriter;

impl ReportWriter {
    /// Export using the format implied by the file extension (JSON by default)
    pub fn save(summary: &RunSummary, path: &Path) -> Result<()> {
        let format = ExportFormat::from_extension(path).unwrap_or(ExportFormat::Json);
        Self::export(summary, path, format)
    }

    pub fn export(summary: &RunSummary, path: &Path, format: ExportFormat) -> Result<()> {
        let report = StoredReport::new(summary);

        match format {
            ExportFormat::Json => {
                let file = File::create(path).context("Failed to create report file")?;
                let writer = BufWriter::new(file);
                serde_json::to_writer_pretty(writer, &report).context("Failed to write report")?;
            }
            ExportFormat::Yaml => {
                let file = File::create(path).context("Failed to create report file")?;
                let writer = BufWriter::new(file);
                serde_yaml::to_writer(writer, &report).context("Failed to write report")?;
            }
            ExportFormat::Csv => {
                let mut writer =
                    csv::Writer::from_path(path).context("Failed to create report file")?;

                writer.write_record(["test", "passed", "message", "timestamp", "details"])?;

                for outcome in &summary.outcomes {
                    writer.write_record([
                        outcome.name.clone(),
                        outcome.passed.to_string(),
                        outcome.message.clone(),
                        outcome.timestamp.to_rfc3339(),
                        outcome.details.to_string(),
                    ])?;
                }
                writer.flush()?;
            }
        }

        info!("Exported report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultRecorder;
    use serde_json::json;

    fn sample_summary() -> RunSummary {
        let mut recorder = ResultRecorder::new();
        recorder.record("Admin Login", true, "Admin login successful", Some(json!({"user_role": "admin"})));
        recorder.fail("Get Admin Stats", "Admin stats missing required fields");
        recorder.skip("Update Order Status", "no order was created");
        recorder.summarize("http://localhost/api", 42)
    }

    #[test]
    fn test_export_format() {
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("YML"), Some(ExportFormat::Yaml));
        assert_eq!(ExportFormat::from_str("csv"), Some(ExportFormat::Csv));
        assert!(ExportFormat::from_str("xml").is_none());
        assert_eq!(
            ExportFormat::from_extension(Path::new("out/report.yaml")),
            Some(ExportFormat::Yaml)
        );
    }

    #[test]
    fn test_save_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        ReportWriter::save(&sample_summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["success_rate"], 50.0);
        assert_eq!(value["outcomes"][0]["name"], "Admin Login");
        assert_eq!(value["skips"][0]["name"], "Update Order Status");
    }

    #[test]
    fn test_save_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        ReportWriter::save(&sample_summary(), &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Admin Login");
        assert_eq!(&rows[1][1], "false");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.out");

        ReportWriter::save(&sample_summary(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
    }
}
