// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::SerializeError, serialize::serialize_report};
use std::{io, time::Duration};

/// The version of the generic execution format produced by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// The default indentation width, in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// The root element of a generic execution report.
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// The files in this report, in serialization order.
    pub files: Vec<FileReport>,

    /// The total number of test cases across all files.
    pub tests: usize,

    /// The total number of failed test cases across all files.
    pub failures: usize,

    /// The total number of skipped test cases across all files.
    pub skipped: usize,
}

impl Report {
    /// Creates a new, empty `Report`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new file and updates the `tests`, `failures` and `skipped` counts.
    ///
    /// When generating a new report, use of this method is recommended over adding to
    /// `self.files` directly.
    pub fn add_file(&mut self, file: FileReport) -> &mut Self {
        self.tests += file.tests;
        self.failures += file.failures;
        self.skipped += file.skipped;
        self.files.push(file);
        self
    }

    /// Adds several files and updates the counts.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = FileReport>) -> &mut Self {
        for file in files {
            self.add_file(file);
        }
        self
    }

    /// Serializes this report to the given writer.
    ///
    /// `indent` is the number of spaces used per nesting level. An indent of 0 writes the whole
    /// document without line breaks.
    pub fn serialize(&self, writer: impl io::Write, indent: usize) -> Result<(), SerializeError> {
        serialize_report(self, writer, indent)?;
        Ok(())
    }

    /// Serializes this report to a string.
    pub fn to_string(&self, indent: usize) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf, indent)?;
        Ok(String::from_utf8(buf)?)
    }
}

/// The test cases declared by a single source file.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct FileReport {
    /// The path to the file, usually relative to the project root.
    pub path: String,

    /// The total number of test cases in this file.
    pub tests: usize,

    /// The number of failed test cases in this file.
    pub failures: usize,

    /// The number of skipped test cases in this file.
    pub skipped: usize,

    /// The test cases, in serialization order.
    pub test_cases: Vec<TestCase>,
}

impl FileReport {
    /// Creates a new `FileReport` for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            tests: 0,
            failures: 0,
            skipped: 0,
            test_cases: vec![],
        }
    }

    /// Adds a test case to this file and updates the counts.
    ///
    /// When generating a new report, use of this method is recommended over adding to
    /// `self.test_cases` directly.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.tests += 1;
        match &test_case.status {
            TestCaseStatus::Success => {}
            TestCaseStatus::Failure { .. } => self.failures += 1,
            TestCaseStatus::Skipped { .. } => self.skipped += 1,
        }
        self.test_cases.push(test_case);
        self
    }

    /// Adds several test cases and updates the counts.
    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        for test_case in test_cases {
            self.add_test_case(test_case);
        }
        self
    }
}

/// Represents a single test case.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TestCase {
    /// The fully-qualified name of the test case.
    pub name: String,

    /// The time it took to execute this test case.
    ///
    /// This is serialized as a whole number of milliseconds.
    pub duration: Duration,

    /// The outcome of this test case.
    pub status: TestCaseStatus,
}

impl TestCase {
    /// Creates a new test case with a zero duration.
    pub fn new(name: impl Into<String>, status: TestCaseStatus) -> Self {
        Self {
            name: name.into(),
            duration: Duration::ZERO,
            status,
        }
    }

    /// Sets the time taken for the test case.
    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration = duration;
        self
    }
}

/// Represents the outcome of a test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestCaseStatus {
    /// This test case passed. Serialized as a bare `testCase` element.
    Success,

    /// This test case failed.
    Failure {
        /// The short failure message, serialized as the `message` attribute.
        message: Option<String>,

        /// The stack trace, serialized as the text node of the `failure` element.
        stack_trace: Option<String>,
    },

    /// This test case was not run.
    Skipped {
        /// The skip message, serialized as the `message` attribute.
        message: Option<String>,

        /// The description of the skip, serialized as the text node of the `skipped` element.
        description: Option<String>,
    },
}

impl TestCaseStatus {
    /// Creates a new `TestCaseStatus` that represents a successful test.
    pub fn success() -> Self {
        TestCaseStatus::Success
    }

    /// Creates a new `TestCaseStatus` that represents a failed test.
    pub fn failure() -> Self {
        TestCaseStatus::Failure {
            message: None,
            stack_trace: None,
        }
    }

    /// Creates a new `TestCaseStatus` that represents a skipped test.
    pub fn skipped() -> Self {
        TestCaseStatus::Skipped {
            message: None,
            description: None,
        }
    }

    /// Sets the message. No-op if this is a success case.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        let message_mut = match self {
            TestCaseStatus::Success => return self,
            TestCaseStatus::Failure { message, .. } => message,
            TestCaseStatus::Skipped { message, .. } => message,
        };
        *message_mut = Some(message.into());
        self
    }

    /// Sets the text node: the stack trace for failures, the description for skips. No-op if this
    /// is a success case.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        let description_mut = match self {
            TestCaseStatus::Success => return self,
            TestCaseStatus::Failure { stack_trace, .. } => stack_trace,
            TestCaseStatus::Skipped { description, .. } => description,
        };
        *description_mut = Some(description.into());
        self
    }

    /// Returns true if this is a success case.
    pub fn is_success(&self) -> bool {
        matches!(self, TestCaseStatus::Success)
    }
}
