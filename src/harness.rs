//! Step recording for the end-to-end suites.
//!
//! A [`StepRecorder`] is the logging context for one test step: every line it
//! receives goes to the `log` facade under the suite's target and into the
//! step's [`TestResult`], so the rendered report and the log file tell the
//! same story. Assertion helpers record failures instead of returning early.

use crate::results::{TestResult, TestStatus};
use std::fmt::{Debug, Display};
use std::time::Instant;

pub struct StepRecorder {
    target: &'static str,
    result: TestResult,
    started: Instant,
    failed: bool,
}

impl StepRecorder {
    pub fn new(target: &'static str, name: impl Into<String>) -> Self {
        let result = TestResult::new(name);
        ::log::info!(target: target, "Starting {}", result.name);
        Self {
            target,
            result,
            started: Instant::now(),
            failed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.result.name
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Emits `line` and appends it to the step's logs
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        ::log::info!(target: self.target, "{}", line);
        self.result.logs.push(line);
    }

    fn record_failure(&mut self, line: String) {
        ::log::error!(target: self.target, "{}", line);
        self.result.logs.push(line);
        self.failed = true;
    }

    /// Records a failure when `found` differs from `expected`
    pub fn check_eq<T: PartialEq + Debug + ?Sized>(
        &mut self,
        what: &str,
        expected: &T,
        found: &T,
    ) -> bool {
        if expected == found {
            return true;
        }
        self.record_failure(format!(
            "{what} does not match: expected {expected:?}, found {found:?}"
        ));
        false
    }

    pub fn check_len(&mut self, what: &str, expected: usize, found: usize) -> bool {
        if expected == found {
            return true;
        }
        self.record_failure(format!(
            "Number of {what} does not match: expected {expected}, found {found}"
        ));
        false
    }

    pub fn check(&mut self, condition: bool, message: &str) -> bool {
        if !condition {
            self.record_failure(message.to_string());
        }
        condition
    }

    /// Records an error that stopped the step
    pub fn fail(&mut self, err: impl Display) {
        self.record_failure(format!("Error: {err}"));
    }

    /// Stamps status and duration and hands back the result
    pub fn finish(mut self) -> TestResult {
        self.result.duration = self.started.elapsed();
        self.result.status = if self.failed {
            TestStatus::Fail
        } else {
            TestStatus::Pass
        };

        let secs = self.result.duration.as_secs_f64();
        if self.failed {
            ::log::warn!(target: self.target, "{} failed after {:.2} seconds", self.result.name, secs);
        } else {
            let line = format!("{} completed in {:.2} seconds", self.result.name, secs);
            self.log(line);
        }
        self.result
    }
}

/// Groups steps as the sub-tests of one result
pub struct Suite {
    target: &'static str,
    result: TestResult,
    started: Instant,
}

impl Suite {
    pub fn new(target: &'static str, name: impl Into<String>) -> Self {
        let result = TestResult::new(name);
        ::log::info!(target: target, "Running suite {}", result.name);
        Self {
            target,
            result,
            started: Instant::now(),
        }
    }

    /// A recorder logging under this suite's target
    pub fn step(&self, name: impl Into<String>) -> StepRecorder {
        StepRecorder::new(self.target, name)
    }

    pub fn record(&mut self, step: TestResult) {
        self.result.sub_tests.push(step);
    }

    /// Fails the suite if any recorded step failed
    pub fn finish(mut self) -> TestResult {
        self.result.duration = self.started.elapsed();
        let failures = self
            .result
            .sub_tests
            .iter()
            .filter(|sub| !sub.passed())
            .count();

        self.result.status = if failures == 0 {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        };
        let summary = format!(
            "{} of {} steps passed",
            self.result.sub_tests.len() - failures,
            self.result.sub_tests.len()
        );
        ::log::info!(target: self.target, "Suite {}: {}", self.result.name, summary);
        self.result.logs.push(summary);
        self.result
    }
}
