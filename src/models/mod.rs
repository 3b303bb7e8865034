//! Data models for marketplace API checks
//!
//! This module contains all data structures used throughout the application.

mod fixtures;
mod outcome;
mod session;

pub use fixtures::{CredentialSet, GeoPoint, Locations};
pub use outcome::{
    CriticalCheck, CriticalStatus, FailedCheck, RunSummary, SkippedScenario, TestOutcome,
};
pub use session::{ResourceKind, ResourceRegistry, Role, SessionState};
