// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of finished tests into passed, failed or skipped.

use crate::events::{ReportedState, TestError, TestInfo};
use camino::Utf8PathBuf;
use sonar_execution::{TestCase, TestCaseStatus};
use std::{fmt, time::Duration};

/// The message and description written for every skipped test.
pub static SKIPPED_MESSAGE: &str = "skipped";

/// The outcome of a finished test.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TestOutcome {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was pending, or its state could not be determined.
    Skipped,
}

impl TestOutcome {
    /// Classifies a finished test from its reported state and pending flag.
    ///
    /// A test with neither a reported state nor a pending flag is classified as skipped; see
    /// [`anomaly`].
    pub fn of(test: &TestInfo) -> Self {
        match test.state {
            Some(ReportedState::Failed) => TestOutcome::Failed,
            Some(ReportedState::Passed) => TestOutcome::Passed,
            Some(ReportedState::Pending) | None => TestOutcome::Skipped,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestOutcome::Passed => write!(f, "passed"),
            TestOutcome::Failed => write!(f, "failed"),
            TestOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Returns a description of why this test's reported state is inconsistent, if it is.
///
/// Such tests are still classified (as skipped), but the engine broke its own invariants.
pub fn anomaly(test: &TestInfo) -> Option<&'static str> {
    match (test.state, test.pending) {
        (None, false) => Some("finished without a state and is not pending"),
        (Some(ReportedState::Pending), false) => Some("is pending but was not marked as pending"),
        _ => None,
    }
}

/// The classified state of a test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestState {
    /// The test passed.
    Passed,

    /// The test failed with this error, which is empty if none was reported.
    Failed(TestError),

    /// The test was skipped.
    Skipped,
}

impl TestState {
    /// Classifies a finished test, attaching the most recent failure reported for it.
    ///
    /// A failure is only attached to failed tests. A test reported as failed without a failure
    /// event gets an empty error.
    pub fn classify(test: &TestInfo, failure: Option<TestError>) -> Self {
        match TestOutcome::of(test) {
            TestOutcome::Passed => TestState::Passed,
            TestOutcome::Failed => TestState::Failed(failure.unwrap_or_default()),
            TestOutcome::Skipped => TestState::Skipped,
        }
    }

    /// Returns the outcome without failure details.
    pub fn outcome(&self) -> TestOutcome {
        match self {
            TestState::Passed => TestOutcome::Passed,
            TestState::Failed(_) => TestOutcome::Failed,
            TestState::Skipped => TestOutcome::Skipped,
        }
    }
}

/// One executed or skipped test, normalized for the report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestRecord {
    /// The fully-qualified title.
    pub name: String,

    /// The path to the declaring file, relative to the working directory.
    pub file: Utf8PathBuf,

    /// The time taken, zero if the engine did not report it.
    pub duration: Duration,

    /// The classified state.
    pub state: TestState,
}

impl TestRecord {
    /// Builds a record for a finished test.
    pub fn new(
        test: &TestInfo,
        name: String,
        file: Utf8PathBuf,
        failure: Option<TestError>,
    ) -> Self {
        Self {
            name,
            file,
            duration: test.duration.unwrap_or_default(),
            state: TestState::classify(test, failure),
        }
    }

    /// Converts this record into a test case for the report.
    pub fn to_test_case(&self) -> TestCase {
        let status = match &self.state {
            TestState::Passed => TestCaseStatus::success(),
            TestState::Failed(error) => {
                let mut status = TestCaseStatus::failure();
                status.set_message(error.summary());
                if let Some(stack) = &error.stack {
                    status.set_description(stack.as_str());
                }
                status
            }
            TestState::Skipped => {
                let mut status = TestCaseStatus::skipped();
                status
                    .set_message(SKIPPED_MESSAGE)
                    .set_description(SKIPPED_MESSAGE);
                status
            }
        };

        let mut test_case = TestCase::new(self.name.as_str(), status);
        test_case.set_duration(self.duration);
        test_case
    }
}
