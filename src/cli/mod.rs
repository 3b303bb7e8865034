//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use std::path::PathBuf;

use clap::Parser;

/// Integration checks for the local-produce marketplace API
#[derive(Parser, Debug)]
#[command(name = "market-api-check")]
#[command(version)]
#[command(about = "Run end-to-end checks against a deployed marketplace API")]
#[command(long_about = None)]
pub struct Args {
    /// API base URL, including the `/api` prefix
    #[arg(short, long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Configuration file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Summary format (table, json, json-pretty, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save the full report (format from extension: json, yaml, csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Run only these suites (auth, products, orders, admin, gps)
    #[arg(short, long = "suite")]
    pub suites: Vec<String>,

    /// Write the resolved configuration to this file and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Leave created products in place
    #[arg(long)]
    pub no_cleanup: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_without_flags() {
        let args = Args::try_parse_from(["market-api-check"]).unwrap();
        assert!(args.base_url.is_none());
        assert!(args.suites.is_empty());
        assert!(!args.no_cleanup);
    }

    #[test]
    fn test_parse_repeated_suites() {
        let args = Args::try_parse_from([
            "market-api-check",
            "--suite",
            "auth",
            "-s",
            "gps",
            "--base-url",
            "http://localhost:8001/api",
            "--no-cleanup",
        ])
        .unwrap();
        assert_eq!(args.suites, vec!["auth", "gps"]);
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:8001/api"));
        assert!(args.no_cleanup);
    }
}
