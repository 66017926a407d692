// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{OutputContext, OutputOpts};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use sonar_reporter::{
    config::ReporterOptions,
    console::ConsoleOutput,
    events::RecordedEvent,
    reporter::{RunSummary, SonarReporter},
};
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
};
use tracing::debug;

/// Writes generic execution reports for test runs.
#[derive(Debug, Parser)]
#[command(version, name = "sonar-report", styles = crate::output::clap_styles())]
pub struct SonarReportApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(subcommand)]
    command: Command,
}

impl SonarReportApp {
    /// Executes the app.
    pub fn exec(self) -> Result<()> {
        let output = self.output.init();

        match self.command {
            Command::Replay(opts) => {
                opts.exec(output)?;
                Ok(())
            }
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay recorded test events and write the execution report
    ///
    /// Events are read one JSON object per line, for example:
    ///
    /// {"type": "test-failed", "test": {...}, "error": {"name": "Error", "message": "..."}}
    /// {"type": "test-finished", "test": {"title": "...", "file": "/abs/path.js", "state": "passed"}}
    /// {"type": "run-finished"}
    ///
    /// The report is written when `run-finished` is read, or at the end of input.
    Replay(ReplayOpts),
}

#[derive(Debug, Args)]
struct ReplayOpts {
    /// File to read events from, or `-` for standard input
    #[arg(long, value_name = "FILE", default_value = "-")]
    events: Utf8PathBuf,

    /// Reporter option as `key=value` (can be repeated)
    #[arg(short = 'O', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    /// Path to write the report to [default: ./coverage/sonar.xml]
    #[arg(long, value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    /// Directory that test file paths are reported relative to [default: current directory]
    #[arg(long, value_name = "DIR")]
    cwd: Option<Utf8PathBuf>,

    /// Delimiter between suite and test titles [default: " "]
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    delimiter: Option<String>,

    /// Console reporter to pass events through to: list, dot, base [default: list]
    #[arg(long, value_name = "NAME")]
    reporter: Option<String>,

    /// Suppress console reporter output
    #[arg(long)]
    silent: bool,

    /// XML indentation width, 0 for no indentation [default: 4]
    #[arg(long, value_name = "N")]
    spaces: Option<usize>,
}

impl ReplayOpts {
    /// Combines `--option` pairs with the dedicated flags. Flags take precedence.
    fn reporter_options(&self) -> Result<ReporterOptions> {
        let pairs =
            ReporterOptions::from_pairs(&self.options).wrap_err("error parsing --option")?;
        let flags = ReporterOptions {
            cwd: self.cwd.clone(),
            output: self.output.clone(),
            delimiter: self.delimiter.clone(),
            reporter: self.reporter.clone(),
            silent: self.silent.then_some(true),
            spaces: self.spaces,
        };
        Ok(pairs.merge(flags))
    }

    fn exec(self, output: OutputContext) -> Result<RunSummary> {
        let config = self
            .reporter_options()?
            .resolve()
            .wrap_err("error resolving reporter options")?;
        let mut reporter = SonarReporter::with_console(
            config,
            ConsoleOutput::stdout(output.colorize_stdout()),
        );

        if self.events == "-" {
            replay_events(io::stdin().lock(), &mut reporter)?;
        } else {
            let file = File::open(&self.events)
                .wrap_err_with(|| format!("error opening events file {}", self.events))?;
            replay_events(BufReader::new(file), &mut reporter)?;
        }

        Ok(reporter.finish())
    }
}

/// Feeds every event in `reader` to `reporter`, stopping after `run-finished`.
fn replay_events(reader: impl BufRead, reporter: &mut SonarReporter) -> Result<()> {
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.wrap_err_with(|| format!("error reading events at line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let event: RecordedEvent = serde_json::from_str(&line)
            .wrap_err_with(|| format!("error parsing event at line {line_number}"))?;
        reporter.report_event(event.as_event());

        if event == RecordedEvent::RunFinished {
            debug!("run finished at line {line_number}, ignoring any further input");
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn parse_replay(args: &[&str]) -> ReplayOpts {
        let app = SonarReportApp::try_parse_from(
            ["sonar-report", "replay"].iter().chain(args.iter()),
        )
        .unwrap_or_else(|error| panic!("args {args:?} should parse: {error}"));
        let Command::Replay(opts) = app.command;
        opts
    }

    #[test]
    fn argument_parsing() {
        let valid: &[&[&str]] = &[
            &[],
            &["--events", "events.jsonl"],
            &["--events", "-"],
            &["-O", "spaces=2", "-O", "silent=true"],
            &["--option", "reporter=dot", "--output", "out.xml"],
            &["--delimiter", " > ", "--cwd", "/project"],
            &["--delimiter", "-"],
            &["--silent", "--reporter", "dot", "--spaces", "0"],
            &["--color", "never", "-v"],
        ];
        for args in valid {
            parse_replay(args);
        }

        let invalid: &[&[&str]] = &[
            &["--spaces", "-1"],
            &["--spaces", "four"],
            &["--color", "sometimes"],
            &["--silent=false"],
            &["--unknown"],
        ];
        for args in invalid {
            let result =
                SonarReportApp::try_parse_from(["sonar-report", "replay"].iter().chain(args.iter()));
            assert!(result.is_err(), "args {args:?} should fail to parse");
        }
    }

    #[test]
    fn flags_override_options() {
        let opts = parse_replay(&[
            "-O",
            "spaces=2",
            "-O",
            "output=a.xml",
            "-O",
            "reporter=dot",
            "--output",
            "b.xml",
        ]);
        let options = opts.reporter_options().expect("options are valid");
        assert_eq!(
            options,
            ReporterOptions {
                cwd: None,
                output: Some("b.xml".into()),
                delimiter: None,
                reporter: Some("dot".to_owned()),
                silent: None,
                spaces: Some(2),
            }
        );

        let opts = parse_replay(&["-O", "colour=never"]);
        let error = opts
            .reporter_options()
            .expect_err("unknown option keys are rejected");
        assert_eq!(error.to_string(), "error parsing --option");
        assert!(
            error
                .chain()
                .any(|cause| cause.to_string().contains("`colour`")),
            "error names the unknown key: {error:?}"
        );
    }

    fn event_lines(dir: &Utf8TempDir) -> String {
        let file = dir.path().join("test/math.spec.js");
        let file = file.as_str();
        [
            serde_json::json!({
                "type": "test-finished",
                "test": {
                    "title": "adds",
                    "parents": [null, "Math"],
                    "file": file,
                    "state": "passed",
                    "duration": 5,
                },
            }),
            serde_json::json!({
                "type": "test-failed",
                "test": {"title": "divides", "parents": [null, "Math"], "file": file},
                "error": {"name": "AssertionError", "message": "expected true"},
            }),
            serde_json::json!({
                "type": "test-finished",
                "test": {
                    "title": "divides",
                    "parents": [null, "Math"],
                    "file": file,
                    "state": "failed",
                    "duration": 3,
                },
            }),
            serde_json::json!({"type": "run-finished"}),
        ]
        .iter()
        .map(|event| format!("{event}\n"))
        .collect()
    }

    #[test]
    fn replay_writes_report() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let events = dir.path().join("events.jsonl");
        // Blank lines are skipped, and nothing after run-finished is read.
        let contents = format!("\n{}\nthis line is never parsed\n", event_lines(&dir));
        std::fs::write(&events, contents).expect("events written");
        let output = dir.path().join("reports/sonar.xml");

        let opts = parse_replay(&[
            "--events",
            events.as_str(),
            "--output",
            output.as_str(),
            "--cwd",
            dir.path().as_str(),
            "--silent",
            "--spaces",
            "2",
        ]);
        let summary = opts
            .exec(OutputContext {
                color: crate::output::Color::Never,
            })
            .expect("replay succeeds");

        assert!(summary.written);
        assert_eq!(summary.output, output);
        assert_eq!(
            std::fs::read_to_string(&output).expect("report read"),
            indoc! {r#"
                <?xml version="1.0" encoding="utf-8"?>
                <testExecutions version="1">
                  <file path="test/math.spec.js">
                    <testCase name="Math adds" duration="5"/>
                    <testCase name="Math divides" duration="3">
                      <failure message="AssertionError: expected true"/>
                    </testCase>
                  </file>
                </testExecutions>
            "#}
        );
    }

    #[test]
    fn malformed_event_is_an_error() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let events = dir.path().join("events.jsonl");
        std::fs::write(&events, "{\"type\": \"test-started\"}\n").expect("events written");
        let output = dir.path().join("sonar.xml");

        let opts = parse_replay(&[
            "--events",
            events.as_str(),
            "--output",
            output.as_str(),
            "--silent",
        ]);
        let error = opts
            .exec(OutputContext {
                color: crate::output::Color::Never,
            })
            .expect_err("unknown event types are rejected");
        assert_eq!(error.to_string(), "error parsing event at line 1");
        assert!(!output.exists(), "no report is written");
    }
}
