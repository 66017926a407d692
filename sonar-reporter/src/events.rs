// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events produced by a test engine.

use camino::Utf8PathBuf;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, de::Error as _};
use std::time::Duration;

/// A test as reported by the test engine.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TestInfo {
    /// The test's own title.
    pub title: String,

    /// The titles of the suites containing this test, outermost first.
    ///
    /// Root suites are typically untitled.
    #[serde(default)]
    pub parents: Vec<Option<String>>,

    /// The absolute path to the file declaring this test.
    pub file: Utf8PathBuf,

    /// Whether the test was marked as pending by its author.
    #[serde(default)]
    pub pending: bool,

    /// The terminal state reported by the engine, if any.
    #[serde(default)]
    pub state: Option<ReportedState>,

    /// The time taken by the test.
    ///
    /// Deserialized from a number of milliseconds.
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub duration: Option<Duration>,
}

impl TestInfo {
    /// Creates a new test in the given file, with no parents and no reported state.
    pub fn new(title: impl Into<String>, file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            title: title.into(),
            parents: vec![],
            file: file.into(),
            pending: false,
            state: None,
            duration: None,
        }
    }

    /// Sets the chain of suites containing this test, outermost first.
    pub fn set_parents<I, S>(&mut self, parents: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(|title| Some(title.into())).collect();
        self
    }

    /// Sets the reported state.
    pub fn set_state(&mut self, state: ReportedState) -> &mut Self {
        self.state = Some(state);
        self
    }

    /// Marks the test as pending.
    pub fn set_pending(&mut self, pending: bool) -> &mut Self {
        self.pending = pending;
        self
    }

    /// Sets the time taken by the test.
    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration = Some(duration);
        self
    }
}

/// The terminal state of a test, as reported by the engine.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ReportedState {
    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was not run.
    Pending,
}

/// Information about a test failure, delivered with [`TestEvent::TestFailed`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct TestError {
    /// The error's type name, for example `AssertionError`.
    #[serde(default)]
    pub name: Option<String>,

    /// The error message.
    #[serde(default)]
    pub message: Option<String>,

    /// The raw stack trace.
    #[serde(default)]
    pub stack: Option<String>,
}

impl TestError {
    /// Creates a new error with the given name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            stack: None,
        }
    }

    /// Sets the stack trace.
    pub fn set_stack(&mut self, stack: impl Into<String>) -> &mut Self {
        self.stack = Some(stack.into());
        self
    }

    /// Returns the name and the message joined by `": "`.
    ///
    /// Absent or empty parts are left out, along with their separator.
    pub fn summary(&self) -> String {
        [self.name.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .join(": ")
    }
}

/// A lifecycle event.
///
/// Events are produced by the test engine and consumed by a
/// [`SonarReporter`](crate::reporter::SonarReporter) and its console reporter.
#[derive(Clone, Copy, Debug)]
pub enum TestEvent<'a> {
    /// A test failed. The engine sends this before the matching [`Self::TestFinished`].
    TestFailed {
        /// The test that failed.
        test: &'a TestInfo,

        /// The failure.
        error: &'a TestError,
    },

    /// A test finished running, or was skipped.
    TestFinished {
        /// The test that finished.
        test: &'a TestInfo,
    },

    /// The run finished. No further events are expected.
    RunFinished,
}

/// An owned [`TestEvent`], as recorded in a JSON-lines event stream.
///
/// ```json
/// {"type": "test-finished", "test": {"title": "adds", "file": "/p/test/a.js", "state": "passed"}}
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RecordedEvent {
    /// See [`TestEvent::TestFailed`].
    TestFailed {
        /// The test that failed.
        test: TestInfo,
        /// The failure.
        #[serde(default)]
        error: TestError,
    },

    /// See [`TestEvent::TestFinished`].
    TestFinished {
        /// The test that finished.
        test: TestInfo,
    },

    /// See [`TestEvent::RunFinished`].
    RunFinished,
}

impl RecordedEvent {
    /// Borrows this recorded event as a [`TestEvent`].
    pub fn as_event(&self) -> TestEvent<'_> {
        match self {
            RecordedEvent::TestFailed { test, error } => TestEvent::TestFailed { test, error },
            RecordedEvent::TestFinished { test } => TestEvent::TestFinished { test },
            RecordedEvent::RunFinished => TestEvent::RunFinished,
        }
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(millis) if millis.is_finite() && millis >= 0.0 => {
            Ok(Some(Duration::from_micros((millis * 1000.0).round() as u64)))
        }
        Some(millis) => Err(D::Error::custom(format!(
            "invalid duration {millis}: expected a non-negative number of milliseconds"
        ))),
        None => Ok(None),
    }
}
