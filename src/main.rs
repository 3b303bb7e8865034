//! Market API Check - Marketplace Backend Integration Tester
//!
//! A CLI tool that drives a deployed local-produce marketplace API through
//! its authentication, product, order, admin and GPS flows, then prints a
//! pass/fail summary.
//!
//! ## Features
//!
//! - Sequential scenarios sharing session tokens and created resources
//! - Skipped scenarios reported separately from failures
//! - Critical functionality status in the summary
//! - Report export (JSON, YAML, CSV)
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite against the default deployment
//! market-api-check
//!
//! # Run against a local server
//! market-api-check --base-url http://localhost:8001/api
//!
//! # Run selected suites and keep the created products
//! market-api-check --suite auth --suite products --no-cleanup
//!
//! # Save the full report
//! market-api-check --output report.json
//!
//! # Write a starter configuration file
//! market-api-check --write-config market-api-check.yaml
//! ```

use std::io::{self, IsTerminal};
use std::process;

use anyhow::{bail, Result};
use clap::{CommandFactory, FromArgMatches};
use tracing::info;

mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod results;
mod scenarios;
mod utils;

use cli::Args;
use config::{env_help, AppConfig, EnvConfig};
use executor::SuiteRunner;
use output::{OutputFormat, ResultFormatter};
use results::ReportWriter;
use scenarios::Suite;
use utils::{init_logger, log_level};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let env = EnvConfig::load();

    let matches = Args::command().after_help(env_help()).get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    init_logger(log_level(args.verbose, env.log_level.as_deref()));

    match run(args, env).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            println!("\n💥 TESTING FAILED WITH ERROR: {e:?}");
            process::exit(1);
        }
    }
}

async fn run(args: Args, env: EnvConfig) -> Result<i32> {
    let mut config = AppConfig::resolve(args.config.as_deref(), &env)?;
    if let Some(url) = args.base_url {
        config.base_url = url;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    if args.no_cleanup {
        config.cleanup = false;
    }
    config.validate()?;

    if let Some(path) = args.write_config {
        config.save(&path)?;
        println!("Configuration written to {}", path.display());
        return Ok(0);
    }

    let format_name = args
        .format
        .or(env.format)
        .unwrap_or_else(|| "table".to_string());
    let Some(format) = OutputFormat::from_str(&format_name) else {
        bail!("Unknown output format: {format_name}");
    };

    let suites = parse_suites(&args.suites)?;

    info!("Testing {} with {}s timeout", config.base_url, config.timeout_secs);

    let summary = SuiteRunner::new(config)?
        .with_suites(&suites)
        .run()
        .await;

    println!("{}", summary_formatter(format).format_summary(&summary));

    if let Some(path) = args.output {
        ReportWriter::save(&summary, &path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(summary.exit_code())
}

/// ANSI colors only when stdout is a terminal
fn summary_formatter(format: OutputFormat) -> ResultFormatter {
    let formatter = ResultFormatter::new(format);
    if io::stdout().is_terminal() {
        formatter
    } else {
        formatter.no_color()
    }
}

fn parse_suites(names: &[String]) -> Result<Vec<Suite>> {
    names
        .iter()
        .map(|name| match Suite::from_str(name) {
            Some(suite) => Ok(suite),
            None => bail!("Unknown suite: {name} (expected auth, products, orders, admin or gps)"),
        })
        .collect()
}
