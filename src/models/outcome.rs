//! Test outcome models
//!
//! Defines recorded outcomes, visible skips and the run summary.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One recorded pass/fail judgment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub details: Value,
}

impl TestOutcome {
    pub fn new(
        name: impl Into<String>,
        passed: bool,
        message: impl Into<String>,
        details: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
            timestamp: Local::now(),
            details: details.unwrap_or_else(|| Value::Object(Default::default())),
        }
    }

    /// True when details carry at least one entry
    pub fn has_details(&self) -> bool {
        match &self.details {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    pub fn symbol(&self) -> &'static str {
        if self.passed {
            "✅"
        } else {
            "❌"
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "{} {}: {} - {}", self.symbol(), status, self.name, self.message)
    }
}

/// A scenario that did not run because a prerequisite was missing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkippedScenario {
    pub name: String,
    pub reason: String,
    pub timestamp: DateTime<Local>,
}

impl SkippedScenario {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            timestamp: Local::now(),
        }
    }
}

impl fmt::Display for SkippedScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⏭️  SKIP: {} - {}", self.name, self.reason)
    }
}

/// Status of a critical check in the final checklist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalStatus {
    Passed,
    Failed,
    NotRun,
}

impl CriticalStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            CriticalStatus::Passed => "✅",
            CriticalStatus::Failed => "❌",
            CriticalStatus::NotRun => "⚠️ ",
        }
    }
}

/// One entry of the critical functionality checklist
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalCheck {
    pub name: String,
    pub status: CriticalStatus,
}

/// Failed outcome reference used in the summary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FailedCheck {
    pub name: String,
    pub message: String,
}

/// Summary of a complete run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub base_url: String,
    pub started_at: DateTime<Local>,
    pub duration_ms: u64,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<FailedCheck>,
    pub critical: Vec<CriticalCheck>,
    pub skips: Vec<SkippedScenario>,
    pub outcomes: Vec<TestOutcome>,
}

impl RunSummary {
    /// Percentage of passed outcomes; 0.0 when nothing was recorded
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_all_passed() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_defaults_to_empty_details() {
        let outcome = TestOutcome::new("Admin Login", true, "ok", None);
        assert!(!outcome.has_details());
        assert_eq!(outcome.details, json!({}));
    }

    #[test]
    fn test_outcome_display() {
        let outcome = TestOutcome::new(
            "Unauthorized Access",
            false,
            "Should have returned 401, got 200",
            None,
        );
        assert_eq!(
            outcome.to_string(),
            "❌ FAIL: Unauthorized Access - Should have returned 401, got 200"
        );
    }

    #[test]
    fn test_outcome_with_details() {
        let outcome = TestOutcome::new(
            "Get Admin Stats",
            true,
            "ok",
            Some(json!({"totalFarmers": 3})),
        );
        assert!(outcome.has_details());
        assert_eq!(outcome.details["totalFarmers"], 3);
    }

    #[test]
    fn test_exit_code() {
        let summary = RunSummary {
            base_url: "http://localhost/api".to_string(),
            started_at: Local::now(),
            duration_ms: 0,
            total: 2,
            passed: 1,
            failed: 1,
            skipped: 0,
            failures: Vec::new(),
            critical: Vec::new(),
            skips: Vec::new(),
            outcomes: Vec::new(),
        };
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.success_rate(), 50.0);
    }
}
