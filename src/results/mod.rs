//! Results recording and export module
//!
//! Collects outcomes during a run and writes the final report.

mod recorder;
mod storage;

pub use recorder::{ResultRecorder, CRITICAL_TESTS};
pub use storage::ReportWriter;
