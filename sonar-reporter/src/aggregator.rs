// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregation of finished tests, grouped by the file that declares them.

use crate::classify::{TestOutcome, TestRecord};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use sonar_execution::{FileReport, Report};
use tracing::debug;

/// Finished tests grouped by file.
///
/// Files iterate in the order they were first seen, and tests within a file in the order they
/// finished. No file maps to an empty list.
#[derive(Clone, Debug, Default)]
pub struct ResultIndex {
    files: IndexMap<Utf8PathBuf, Vec<TestRecord>>,
}

impl ResultIndex {
    /// Creates a new, empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the list for its file.
    pub fn record(&mut self, record: TestRecord) {
        self.files
            .entry(record.file.clone())
            .or_default()
            .push(record);
    }

    /// Returns the records for `file`, if any were recorded.
    pub fn get(&self, file: &Utf8Path) -> Option<&[TestRecord]> {
        self.files.get(file).map(Vec::as_slice)
    }

    /// Iterates over files and their records, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &[TestRecord])> + '_ {
        self.files
            .iter()
            .map(|(file, records)| (file.as_path(), records.as_slice()))
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if no tests were recorded.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Returns the number of tests across all files.
    pub fn test_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Counts tests by outcome.
    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for record in self.files.values().flatten() {
            stats.add(record.state.outcome());
        }
        stats
    }

    /// Builds the execution report for everything recorded so far.
    pub fn to_report(&self) -> Report {
        let mut report = Report::new();
        report.add_files(self.files.iter().map(|(file, records)| {
            let mut file_report = FileReport::new(file.as_str());
            file_report.add_test_cases(records.iter().map(TestRecord::to_test_case));
            file_report
        }));
        report
    }
}

/// Test counts by outcome.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of tests that passed.
    pub passed: usize,

    /// The number of tests that failed.
    pub failed: usize,

    /// The number of tests that were skipped.
    pub skipped: usize,
}

impl RunStats {
    /// Returns the total number of tests.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Counts one more test with the given outcome.
    pub fn add(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Returns `file` relative to `cwd`.
///
/// Files outside `cwd` are returned unchanged.
pub fn relative_file(cwd: &Utf8Path, file: &Utf8Path) -> Utf8PathBuf {
    match file.strip_prefix(cwd) {
        Ok(relative) => relative.to_owned(),
        Err(_) => {
            debug!("test file {file} is outside {cwd}, reporting its path unchanged");
            file.to_owned()
        }
    }
}
