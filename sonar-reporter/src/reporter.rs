// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The execution reporter.
//!
//! A [`SonarReporter`] is created once per run. It consumes lifecycle events, passes them through
//! to a console reporter, and writes the execution report when the run finishes.

use crate::{
    aggregator::{ResultIndex, RunStats, relative_file},
    classify::{TestRecord, anomaly},
    config::ReporterConfig,
    console::{ConsoleOutput, ConsoleReporter, ConsoleReporterKind},
    errors::{DisplayErrorChain, WriteReportError},
    events::{TestError, TestEvent, TestInfo},
    helpers::plural,
    title::full_title,
    write::write_report,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::{collections::HashMap, fmt};
use tracing::{debug, error, info, warn};

/// Identifies a test across its failure and finished events.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct TestKey {
    file: Utf8PathBuf,
    parents: Vec<Option<String>>,
    title: String,
}

impl TestKey {
    fn new(test: &TestInfo) -> Self {
        Self {
            file: test.file.clone(),
            parents: test.parents.clone(),
            title: test.title.clone(),
        }
    }
}

/// Collects the results of a run and writes them out as a generic execution report.
pub struct SonarReporter {
    config: ReporterConfig,
    results: ResultIndex,
    pending_failures: HashMap<TestKey, TestError>,
    console: Box<dyn ConsoleReporter>,
    summary: Option<RunSummary>,
}

impl SonarReporter {
    /// Creates a new reporter that passes events through to a console reporter on standard
    /// output.
    pub fn new(config: ReporterConfig) -> Self {
        Self::with_console(config, ConsoleOutput::stdout(false))
    }

    /// Creates a new reporter whose console reporter writes to `output`.
    ///
    /// No console reporter is used if the configuration is silent. An unknown console reporter
    /// name is not an error: a warning is logged and console output is disabled.
    pub fn with_console(config: ReporterConfig, output: ConsoleOutput) -> Self {
        let kind = if config.silent() {
            ConsoleReporterKind::Base
        } else {
            match ConsoleReporterKind::from_name(config.reporter()) {
                Some(kind) => kind,
                None => {
                    warn!(
                        "unknown console reporter `{}`, disabling console output",
                        config.reporter()
                    );
                    ConsoleReporterKind::Base
                }
            }
        };
        debug!("using console reporter `{kind}`");
        let console = kind.build(config.delimiter(), output);

        Self {
            config,
            results: ResultIndex::new(),
            pending_failures: HashMap::new(),
            console,
            summary: None,
        }
    }

    /// Returns the configuration this reporter was created with.
    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// Returns the results recorded so far.
    pub fn results(&self) -> &ResultIndex {
        &self.results
    }

    /// Returns the summary of the run, once it has finished.
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    /// Handles a lifecycle event.
    ///
    /// Events that arrive after the run has finished are ignored.
    pub fn report_event(&mut self, event: TestEvent<'_>) {
        if self.summary.is_some() {
            debug!("ignoring event received after the run finished: {event:?}");
            return;
        }

        if let Err(error) = self.console.write_event(&event) {
            debug!("error writing to the console: {error}");
        }

        match event {
            TestEvent::TestFailed { test, error } => {
                // The most recent failure for a test wins.
                self.pending_failures
                    .insert(TestKey::new(test), error.clone());
            }
            TestEvent::TestFinished { test } => self.test_finished(test),
            TestEvent::RunFinished => {
                let summary = self.finish_run();
                self.summary = Some(summary);
            }
        }
    }

    /// Finishes the run if that hasn't happened already, and returns its summary.
    ///
    /// Failing to write the report is logged rather than returned.
    pub fn finish(mut self) -> RunSummary {
        match self.summary.take() {
            Some(summary) => summary,
            None => {
                self.report_event(TestEvent::RunFinished);
                self.summary.take().unwrap_or_else(|| self.make_summary(false))
            }
        }
    }

    fn test_finished(&mut self, test: &TestInfo) {
        let failure = self.pending_failures.remove(&TestKey::new(test));
        let name = full_title(test, self.config.delimiter());
        if let Some(anomaly) = anomaly(test) {
            warn!("test `{name}` {anomaly}, reporting it as skipped");
        }

        let file = relative_file(self.config.cwd(), &test.file);
        self.results
            .record(TestRecord::new(test, name, file, failure));
    }

    fn finish_run(&mut self) -> RunSummary {
        if !self.pending_failures.is_empty() {
            debug!(
                "discarding {} {} that never finished",
                self.pending_failures.len(),
                if self.pending_failures.len() == 1 {
                    "failure for a test"
                } else {
                    "failures for tests"
                }
            );
            self.pending_failures.clear();
        }

        let output = self.config.output();
        let written = match self.write() {
            Ok(()) => {
                let stats = self.results.stats();
                info!(
                    "execution report written to {output} ({} {}: {} passed, {} failed, {} skipped)",
                    stats.total(),
                    plural(stats.total()),
                    stats.passed,
                    stats.failed,
                    stats.skipped,
                );
                true
            }
            Err(err) => {
                error!("{}", DisplayErrorChain::new(err));
                false
            }
        };

        self.make_summary(written)
    }

    fn write(&self) -> Result<(), WriteReportError> {
        let output = self.config.output();
        let mut contents = Vec::new();
        self.results
            .to_report()
            .serialize(&mut contents, self.config.spaces())
            .map_err(|error| WriteReportError::Serialize {
                file: output.to_owned(),
                error,
            })?;
        write_report(output, &contents)
    }

    fn make_summary(&self, written: bool) -> RunSummary {
        RunSummary {
            output: self.config.output().to_owned(),
            written,
            stats: self.results.stats(),
            files: self.results.len(),
        }
    }
}

impl fmt::Debug for SonarReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonarReporter")
            .field("config", &self.config)
            .field("results", &self.results)
            .field("pending_failures", &self.pending_failures.len())
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

/// What happened at the end of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    /// The path the report was written to, or would have been.
    pub output: Utf8PathBuf,

    /// Whether the report was written successfully.
    pub written: bool,

    /// Test counts by outcome.
    pub stats: RunStats,

    /// The number of files in the report.
    pub files: usize,
}

impl RunSummary {
    /// Returns the path the report was written to, or would have been.
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }
}
