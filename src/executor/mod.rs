//! Test execution engine
//!
//! Provides sequential suite execution.

mod runner;

pub use runner::SuiteRunner;
