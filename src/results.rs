use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome of a test step.
///
/// The report derives a CSS class from the lower-cased display form, so
/// `Other` carries any status a caller wants to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Pass,
    Fail,
    Running,
    Other(String),
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => f.write_str("PASS"),
            TestStatus::Fail => f.write_str("FAIL"),
            TestStatus::Running => f.write_str("RUNNING"),
            TestStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Record of one test step and its nested sub-tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub logs: Vec<String>,
    pub timestamp: DateTime<Local>,
    pub duration: Duration,
    pub sub_tests: Vec<TestResult>,
}

impl TestResult {
    /// Create a running result stamped with the current time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Running,
            logs: Vec::new(),
            timestamp: Local::now(),
            duration: Duration::ZERO,
            sub_tests: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == TestStatus::Pass
    }
}
