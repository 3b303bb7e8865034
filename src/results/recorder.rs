//! Result recorder
//!
//! Accumulates outcomes in insertion order, echoes each one to the console
//! and builds the final [`RunSummary`].

use chrono::{DateTime, Local};
use serde_json::Value;
use tracing::debug;

use crate::models::{
    CriticalCheck, CriticalStatus, FailedCheck, RunSummary, SkippedScenario, TestOutcome,
};

/// Scenarios whose status is always reported in the summary checklist
pub const CRITICAL_TESTS: &[&str] = &[
    "Admin Login",
    "Farmer Login",
    "Buyer Login with GPS",
    "Get Products with GPS",
    "Create Product (Farmer)",
    "Create Order (COD)",
    "Get Admin Stats",
    "GPS Distance Filtering",
];

/// Ordered store of recorded outcomes and skips
#[derive(Debug)]
pub struct ResultRecorder {
    outcomes: Vec<TestOutcome>,
    skips: Vec<SkippedScenario>,
    critical: Vec<String>,
    started_at: DateTime<Local>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self::with_critical(CRITICAL_TESTS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_critical(critical: Vec<String>) -> Self {
        Self {
            outcomes: Vec::new(),
            skips: Vec::new(),
            critical,
            started_at: Local::now(),
        }
    }

    /// Append an outcome and print it
    pub fn record(
        &mut self,
        name: impl Into<String>,
        passed: bool,
        message: impl Into<String>,
        details: Option<Value>,
    ) {
        let outcome = TestOutcome::new(name, passed, message, details);
        debug!(test = %outcome.name, passed = outcome.passed, "Recorded outcome");

        println!("{outcome}");
        if !outcome.passed && outcome.has_details() {
            println!("   Details: {}", outcome.details);
        }

        self.outcomes.push(outcome);
    }

    pub fn pass(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.record(name, true, message, None);
    }

    pub fn fail(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.record(name, false, message, None);
    }

    /// Note a scenario that could not run
    pub fn skip(&mut self, name: impl Into<String>, reason: impl Into<String>) {
        let skipped = SkippedScenario::new(name, reason);
        debug!(test = %skipped.name, "Skipped scenario");
        println!("{skipped}");
        self.skips.push(skipped);
    }

    #[cfg(test)]
    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    #[cfg(test)]
    pub fn skips(&self) -> &[SkippedScenario] {
        &self.skips
    }

    /// First outcome recorded under `name`
    pub fn find(&self, name: &str) -> Option<&TestOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    pub fn summarize(&self, base_url: &str, duration_ms: u64) -> RunSummary {
        let total = self.outcomes.len();
        let passed = self.outcomes.iter().filter(|o| o.passed).count();

        let failures = self
            .outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| FailedCheck {
                name: o.name.clone(),
                message: o.message.clone(),
            })
            .collect();

        let critical = self
            .critical
            .iter()
            .map(|name| CriticalCheck {
                name: name.clone(),
                status: match self.find(name) {
                    Some(o) if o.passed => CriticalStatus::Passed,
                    Some(_) => CriticalStatus::Failed,
                    None => CriticalStatus::NotRun,
                },
            })
            .collect();

        RunSummary {
            base_url: base_url.to_string(),
            started_at: self.started_at,
            duration_ms,
            total,
            passed,
            failed: total - passed,
            skipped: self.skips.len(),
            failures,
            critical,
            skips: self.skips.clone(),
            outcomes: self.outcomes.clone(),
        }
    }
}

impl Default for ResultRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_summary_has_zero_rate() {
        let recorder = ResultRecorder::new();
        let summary = recorder.summarize("http://localhost/api", 0);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate(), 0.0);
        assert_eq!(summary.exit_code(), 0);
        assert!(summary
            .critical
            .iter()
            .all(|c| c.status == CriticalStatus::NotRun));
    }

    #[test]
    fn test_success_rate_matches_recount() {
        let mut recorder = ResultRecorder::new();
        recorder.pass("Admin Login", "ok");
        recorder.pass("Farmer Login", "ok");
        recorder.fail("Buyer Login with GPS", "Login failed with status 500");

        let summary = recorder.summarize("http://localhost/api", 12);
        let recount = summary.outcomes.iter().filter(|o| o.passed).count();

        assert_eq!(summary.passed, recount);
        assert_eq!(summary.failed, 1);
        assert!((summary.success_rate() - 66.666).abs() < 0.01);
        assert_eq!(format!("{:.1}", summary.success_rate()), "66.7");
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_failures_keep_insertion_order() {
        let mut recorder = ResultRecorder::new();
        recorder.fail("Update Product", "a");
        recorder.pass("Get All Products", "b");
        recorder.fail("Category Filtering", "c");

        let summary = recorder.summarize("", 0);
        let names: Vec<_> = summary.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Update Product", "Category Filtering"]);

        let all: Vec<_> = summary.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(all, ["Update Product", "Get All Products", "Category Filtering"]);
    }

    #[test]
    fn test_critical_checklist_statuses() {
        let mut recorder = ResultRecorder::new();
        recorder.record("Admin Login", true, "ok", Some(json!({"user_role": "admin"})));
        recorder.fail("Farmer Login", "Missing token in response");

        let summary = recorder.summarize("", 0);
        let status_of = |name: &str| {
            summary
                .critical
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.status)
        };

        assert_eq!(summary.critical.len(), CRITICAL_TESTS.len());
        assert_eq!(status_of("Admin Login"), Some(CriticalStatus::Passed));
        assert_eq!(status_of("Farmer Login"), Some(CriticalStatus::Failed));
        assert_eq!(status_of("Get Admin Stats"), Some(CriticalStatus::NotRun));
    }

    #[test]
    fn test_skips_are_not_counted() {
        let mut recorder = ResultRecorder::new();
        recorder.pass("Get All Products", "ok");
        recorder.skip("Update Product", "no product was created");

        let summary = recorder.summarize("", 0);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.skips[0].name, "Update Product");
        assert!(summary.is_all_passed());
    }

    #[test]
    fn test_custom_critical_list() {
        let mut recorder = ResultRecorder::with_critical(vec!["Get All Users".to_string()]);
        recorder.pass("Get All Users", "Retrieved 4 total users");

        let summary = recorder.summarize("", 0);
        assert_eq!(summary.critical.len(), 1);
        assert_eq!(summary.critical[0].status, CriticalStatus::Passed);
    }
}
