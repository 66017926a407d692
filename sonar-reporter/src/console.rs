// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console reporters that events are passed through to.
//!
//! Writing the execution report produces no console output of its own, so a console reporter
//! shows progress while the run is going on. Errors writing to the console never affect the
//! report.

use crate::{
    classify::TestOutcome,
    events::{TestError, TestEvent, TestInfo},
    title::full_title,
};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt,
    io::{self, Write},
};

/// Receives every lifecycle event along with the execution reporter.
pub trait ConsoleReporter: Send {
    /// Handles a single event.
    fn write_event(&mut self, event: &TestEvent<'_>) -> io::Result<()>;
}

/// The console reporters that can be selected by name.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConsoleReporterKind {
    /// No console output.
    Base,

    /// One character per test.
    Dot,

    /// One line per test.
    #[default]
    List,
}

impl ConsoleReporterKind {
    /// Looks up a console reporter by name.
    ///
    /// `none` is accepted as an alias for `base`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "base" | "none" => Some(Self::Base),
            "dot" => Some(Self::Dot),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// Builds a console reporter of this kind.
    pub fn build(self, delimiter: &str, output: ConsoleOutput) -> Box<dyn ConsoleReporter> {
        match self {
            Self::Base => Box::new(BaseReporter),
            Self::Dot => Box::new(DotReporter::new(delimiter, output)),
            Self::List => Box::new(ListReporter::new(delimiter, output)),
        }
    }
}

impl fmt::Display for ConsoleReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Dot => write!(f, "dot"),
            Self::List => write!(f, "list"),
        }
    }
}

/// Where console output goes, and whether it is colorized.
pub struct ConsoleOutput {
    writer: Box<dyn Write + Send>,
    colorize: bool,
}

impl ConsoleOutput {
    /// Writes to the given writer.
    pub fn new(writer: impl Write + Send + 'static, colorize: bool) -> Self {
        Self {
            writer: Box::new(writer),
            colorize,
        }
    }

    /// Writes to standard output.
    pub fn stdout(colorize: bool) -> Self {
        Self::new(io::stdout(), colorize)
    }
}

impl fmt::Debug for ConsoleOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleOutput")
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
    duration: Style,
}

impl Styles {
    fn new(colorize: bool) -> Self {
        let mut styles = Self::default();
        if colorize {
            styles.colorize();
        }
        styles
    }

    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
        self.duration = Style::new().dimmed();
    }
}

/// Produces no output.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseReporter;

impl ConsoleReporter for BaseReporter {
    fn write_event(&mut self, _event: &TestEvent<'_>) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct Failure {
    title: String,
    error: TestError,
}

/// Counts and failures shown once the run finishes.
#[derive(Debug, Default)]
struct Tally {
    passed: usize,
    pending: usize,
    failures: Vec<Failure>,
}

impl Tally {
    /// Records a failure and returns its 1-based number.
    fn add_failure(&mut self, title: String, error: &TestError) -> usize {
        self.failures.push(Failure {
            title,
            error: error.clone(),
        });
        self.failures.len()
    }

    fn add_finished(&mut self, test: &TestInfo) -> TestOutcome {
        let outcome = TestOutcome::of(test);
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Skipped => self.pending += 1,
            // Failures are counted when the failure event arrives.
            TestOutcome::Failed => {}
        }
        outcome
    }

    fn write_epilogue(&self, styles: &Styles, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(
            writer,
            "  {} passing",
            self.passed.style(styles.pass)
        )?;
        if self.pending > 0 {
            writeln!(writer, "  {} pending", self.pending.style(styles.skip))?;
        }
        if !self.failures.is_empty() {
            writeln!(
                writer,
                "  {} failing",
                self.failures.len().style(styles.fail)
            )?;
        }

        for (n, failure) in self.failures.iter().enumerate() {
            writeln!(writer)?;
            writeln!(
                writer,
                "  {}) {}:",
                (n + 1).style(styles.count),
                failure.title
            )?;
            let details = match &failure.error.stack {
                Some(stack) if !stack.is_empty() => stack.clone(),
                _ => failure.error.summary(),
            };
            for line in details.lines() {
                writeln!(writer, "     {}", line.style(styles.fail))?;
            }
        }
        writeln!(writer)?;
        writer.flush()
    }
}

/// Writes one line per finished test, followed by a summary.
pub struct ListReporter {
    delimiter: String,
    writer: Box<dyn Write + Send>,
    styles: Styles,
    tally: Tally,
}

impl ListReporter {
    /// Creates a new list reporter.
    pub fn new(delimiter: impl Into<String>, output: ConsoleOutput) -> Self {
        Self {
            delimiter: delimiter.into(),
            writer: output.writer,
            styles: Styles::new(output.colorize),
            tally: Tally::default(),
        }
    }
}

impl ConsoleReporter for ListReporter {
    fn write_event(&mut self, event: &TestEvent<'_>) -> io::Result<()> {
        match event {
            TestEvent::TestFailed { test, error } => {
                let title = full_title(test, &self.delimiter);
                writeln!(
                    self.writer,
                    "  {}) {}",
                    self.tally.add_failure(title.clone(), error).style(self.styles.fail),
                    title.style(self.styles.fail)
                )
            }
            TestEvent::TestFinished { test } => match self.tally.add_finished(test) {
                TestOutcome::Passed => writeln!(
                    self.writer,
                    "  {} {}: {}",
                    "✓".style(self.styles.pass),
                    full_title(test, &self.delimiter),
                    format!("{}ms", test.duration.unwrap_or_default().as_millis())
                        .style(self.styles.duration)
                ),
                TestOutcome::Skipped => writeln!(
                    self.writer,
                    "  {} {}",
                    "-".style(self.styles.skip),
                    full_title(test, &self.delimiter).style(self.styles.skip)
                ),
                // Already written when the failure was reported.
                TestOutcome::Failed => Ok(()),
            },
            TestEvent::RunFinished => self.tally.write_epilogue(&self.styles, &mut self.writer),
        }
    }
}

/// The number of dots written before wrapping.
const DOT_WIDTH: usize = 80;

/// Writes one character per test, followed by a summary.
pub struct DotReporter {
    delimiter: String,
    writer: Box<dyn Write + Send>,
    styles: Styles,
    tally: Tally,
    column: usize,
}

impl DotReporter {
    /// Creates a new dot reporter.
    pub fn new(delimiter: impl Into<String>, output: ConsoleOutput) -> Self {
        Self {
            delimiter: delimiter.into(),
            writer: output.writer,
            styles: Styles::new(output.colorize),
            tally: Tally::default(),
            column: 0,
        }
    }

    fn write_dot(&mut self, dot: &str, style: Style) -> io::Result<()> {
        if self.column == 0 {
            write!(self.writer, "  ")?;
        }
        write!(self.writer, "{}", dot.style(style))?;
        self.column += 1;
        if self.column == DOT_WIDTH {
            writeln!(self.writer)?;
            self.column = 0;
        }
        self.writer.flush()
    }
}

impl ConsoleReporter for DotReporter {
    fn write_event(&mut self, event: &TestEvent<'_>) -> io::Result<()> {
        match event {
            TestEvent::TestFailed { test, error } => {
                self.tally
                    .add_failure(full_title(test, &self.delimiter), error);
                self.write_dot("!", self.styles.fail)
            }
            TestEvent::TestFinished { test } => match self.tally.add_finished(test) {
                TestOutcome::Passed => self.write_dot(".", self.styles.pass),
                TestOutcome::Skipped => self.write_dot(",", self.styles.skip),
                TestOutcome::Failed => Ok(()),
            },
            TestEvent::RunFinished => {
                if self.column > 0 {
                    writeln!(self.writer)?;
                    self.column = 0;
                }
                self.tally.write_epilogue(&self.styles, &mut self.writer)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::{
        io::{self, Write},
        sync::{Arc, Mutex},
    };

    /// A writer whose contents can be read back after it has been handed off.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct SharedBuffer {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            let buf = self.buf.lock().expect("lock not poisoned");
            String::from_utf8(buf.clone()).expect("console output is UTF-8")
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf
                .lock()
                .expect("lock not poisoned")
                .extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_helpers::SharedBuffer, *};
    use crate::events::ReportedState;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_case::test_case;

    #[test_case("list", Some(ConsoleReporterKind::List) ; "list")]
    #[test_case("dot", Some(ConsoleReporterKind::Dot) ; "dot")]
    #[test_case("base", Some(ConsoleReporterKind::Base) ; "base")]
    #[test_case("none", Some(ConsoleReporterKind::Base) ; "none alias")]
    #[test_case("spec", None ; "unknown")]
    fn kind_from_name(name: &str, expected: Option<ConsoleReporterKind>) {
        assert_eq!(ConsoleReporterKind::from_name(name), expected);
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [
            ConsoleReporterKind::Base,
            ConsoleReporterKind::Dot,
            ConsoleReporterKind::List,
        ] {
            assert_eq!(
                ConsoleReporterKind::from_name(&kind.to_string()),
                Some(kind)
            );
        }
    }

    fn sample_tests() -> (TestInfo, TestInfo, TestError, TestInfo) {
        let mut passed = TestInfo::new("adds", "/p/math.js");
        passed
            .set_parents(["Math"])
            .set_state(ReportedState::Passed)
            .set_duration(Duration::from_millis(5));

        let mut failed = TestInfo::new("divides", "/p/math.js");
        failed
            .set_parents(["Math"])
            .set_state(ReportedState::Failed);
        let mut error = TestError::new("AssertionError", "expected true");
        error.set_stack("AssertionError: expected true\n    at math.js:3:7");

        let mut pending = TestInfo::new("pow", "/p/math.js");
        pending.set_parents(["Math"]).set_pending(true);

        (passed, failed, error, pending)
    }

    fn drive(reporter: &mut dyn ConsoleReporter) {
        let (passed, failed, error, pending) = sample_tests();
        let events = [
            TestEvent::TestFinished { test: &passed },
            TestEvent::TestFailed {
                test: &failed,
                error: &error,
            },
            TestEvent::TestFinished { test: &failed },
            TestEvent::TestFinished { test: &pending },
            TestEvent::RunFinished,
        ];
        for event in &events {
            reporter.write_event(event).expect("writing to a buffer succeeds");
        }
    }

    #[test]
    fn list_output() {
        let buffer = SharedBuffer::default();
        let mut reporter = ListReporter::new(" ", ConsoleOutput::new(buffer.clone(), false));
        drive(&mut reporter);

        assert_eq!(
            buffer.contents(),
            concat!(
                "  ✓ Math adds: 5ms\n",
                "  1) Math divides\n",
                "  - Math pow\n",
                "\n",
                "  1 passing\n",
                "  1 pending\n",
                "  1 failing\n",
                "\n",
                "  1) Math divides:\n",
                "     AssertionError: expected true\n",
                "         at math.js:3:7\n",
                "\n",
            )
        );
    }

    #[test]
    fn dot_output() {
        let buffer = SharedBuffer::default();
        let mut reporter = DotReporter::new(" ", ConsoleOutput::new(buffer.clone(), false));
        drive(&mut reporter);

        assert_eq!(
            buffer.contents(),
            concat!(
                "  .!,\n",
                "\n",
                "  1 passing\n",
                "  1 pending\n",
                "  1 failing\n",
                "\n",
                "  1) Math divides:\n",
                "     AssertionError: expected true\n",
                "         at math.js:3:7\n",
                "\n",
            )
        );
    }

    #[test]
    fn dots_wrap() {
        let buffer = SharedBuffer::default();
        let mut reporter = DotReporter::new(" ", ConsoleOutput::new(buffer.clone(), false));
        let mut test = TestInfo::new("t", "/p/t.js");
        test.set_state(ReportedState::Passed);
        for _ in 0..DOT_WIDTH + 1 {
            reporter
                .write_event(&TestEvent::TestFinished { test: &test })
                .expect("writing to a buffer succeeds");
        }

        let contents = buffer.contents();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), DOT_WIDTH + 2);
        assert_eq!(lines[1], "  .");
    }

    #[test]
    fn base_reporter_is_silent() {
        let buffer = SharedBuffer::default();
        let mut reporter =
            ConsoleReporterKind::Base.build(" ", ConsoleOutput::new(buffer.clone(), false));
        drive(reporter.as_mut());
        assert_eq!(buffer.contents(), "");
    }

    #[test]
    fn failure_without_stack_shows_summary() {
        let buffer = SharedBuffer::default();
        let mut reporter = ListReporter::new(" > ", ConsoleOutput::new(buffer.clone(), false));
        let mut test = TestInfo::new("times out", "/p/net.js");
        test.set_parents(["Net"]).set_state(ReportedState::Failed);
        let error = TestError::new("Error", "timeout of 2000ms exceeded");

        for event in [
            TestEvent::TestFailed {
                test: &test,
                error: &error,
            },
            TestEvent::TestFinished { test: &test },
            TestEvent::RunFinished,
        ] {
            reporter.write_event(&event).expect("writing to a buffer succeeds");
        }

        assert_eq!(
            buffer.contents(),
            concat!(
                "  1) Net > times out\n",
                "\n",
                "  0 passing\n",
                "  1 failing\n",
                "\n",
                "  1) Net > times out:\n",
                "     Error: timeout of 2000ms exceeded\n",
                "\n",
            )
        );
    }
}
