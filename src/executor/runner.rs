//! Test execution runner
//!
//! Runs the selected suites in order, then cleanup, then summarizes.

use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::models::RunSummary;
use crate::scenarios::{cleanup_test_data, RunContext, Suite};

/// Sequential runner for marketplace API suites
pub struct SuiteRunner {
    ctx: RunContext,
    suites: Vec<Suite>,
    cleanup: bool,
}

impl SuiteRunner {
    /// Create a runner for all suites
    pub fn new(config: AppConfig) -> Result<Self> {
        let cleanup = config.cleanup;
        Ok(Self {
            ctx: RunContext::new(config)?,
            suites: Suite::all(),
            cleanup,
        })
    }

    /// Restrict the run to `suites`, kept in canonical order
    pub fn with_suites(mut self, suites: &[Suite]) -> Self {
        if !suites.is_empty() {
            self.suites = Suite::all()
                .into_iter()
                .filter(|s| suites.contains(s))
                .collect();
        }
        self
    }

    #[cfg(test)]
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Run every selected suite and return the summary
    pub async fn run(mut self) -> RunSummary {
        let base_url = self.ctx.client.base_url().to_string();

        println!("🚀 Starting Comprehensive Backend API Testing");
        println!("Base URL: {base_url}");
        println!("{}", "=".repeat(60));

        let start = Instant::now();

        for suite in &self.suites {
            println!("\n=== Testing {suite} ===");
            info!("Starting suite: {}", suite);
            suite.run(&mut self.ctx).await;
        }

        if self.cleanup {
            println!("\n=== Cleaning Up Test Data ===");
            cleanup_test_data(&mut self.ctx).await;
        } else {
            info!("Cleanup disabled, leaving created resources in place");
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let summary = self.ctx.recorder.summarize(&base_url, duration_ms);

        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            summary.duration_ms,
            summary.passed,
            summary.total,
            summary.success_rate()
        );

        summary
    }
}
