//! Logging setup
//!
//! The console carries the human-readable report, so tracing output stays at
//! warn unless `--verbose` or `MARKET_API_CHECK_LOG` asks for more.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::EnvFilter;

const CRATE_TARGET: &str = "market_api_check";

/// Level for this run: `--verbose` wins, then the environment, then warn
pub fn log_level(verbose: bool, env_level: Option<&str>) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    env_level
        .and_then(|s| Level::from_str(s.trim()).ok())
        .unwrap_or(Level::WARN)
}

/// Install the global subscriber, filtered to this crate
pub fn init_logger(level: Level) {
    let filter = EnvFilter::new(format!("{CRATE_TARGET}={level}"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
