// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.
//!
//! Hosts pass [`ReporterOptions`], either deserialized from their own configuration or parsed from
//! `key=value` strings. Options are resolved once into an immutable [`ReporterConfig`], with
//! defaults filled in for anything left unset.

use crate::{errors::ConfigError, helpers::absolutize};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use sonar_execution::DEFAULT_INDENT;

/// The default report path, relative to the current directory.
pub static DEFAULT_OUTPUT: &str = "./coverage/sonar.xml";

/// The default delimiter between suite and test titles.
pub static DEFAULT_DELIMITER: &str = " ";

/// The default console reporter.
pub static DEFAULT_REPORTER: &str = "list";

/// The option keys accepted by [`ReporterOptions::set`].
pub static KNOWN_OPTIONS: &[&str] = &["cwd", "output", "delimiter", "reporter", "silent", "spaces"];

/// Reporter options as supplied by the host. Every option is optional.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReporterOptions {
    /// The directory that test file paths are reported relative to.
    #[serde(default)]
    pub cwd: Option<Utf8PathBuf>,

    /// The path to write the report to.
    #[serde(default)]
    pub output: Option<Utf8PathBuf>,

    /// The delimiter between suite and test titles.
    #[serde(default)]
    pub delimiter: Option<String>,

    /// The name of the console reporter to pass events through to.
    #[serde(default)]
    pub reporter: Option<String>,

    /// Whether to suppress console output entirely.
    #[serde(default)]
    pub silent: Option<bool>,

    /// The XML indentation width.
    #[serde(default)]
    pub spaces: Option<usize>,
}

impl ReporterOptions {
    /// Parses options from `key=value` strings.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for pair in pairs {
            let pair = pair.as_ref();
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| ConfigError::MissingValue {
                    input: pair.to_owned(),
                })?;
            options.set(key.trim(), value)?;
        }
        Ok(options)
    }

    /// Sets a single option from its string form.
    ///
    /// `silent` is enabled only by the literal `true`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<&mut Self, ConfigError> {
        match key {
            "cwd" => self.cwd = Some(value.into()),
            "output" => self.output = Some(value.into()),
            "delimiter" => self.delimiter = Some(value.to_owned()),
            "reporter" => self.reporter = Some(value.to_owned()),
            "silent" => self.silent = Some(value.trim() == "true"),
            "spaces" => {
                let spaces =
                    value
                        .trim()
                        .parse::<usize>()
                        .map_err(|error| ConfigError::InvalidSpaces {
                            value: value.to_owned(),
                            error,
                        })?;
                self.spaces = Some(spaces);
            }
            _ => {
                return Err(ConfigError::UnknownOption {
                    key: key.to_owned(),
                });
            }
        }
        Ok(self)
    }

    /// Overlays `other` on top of `self`: options set in `other` win.
    pub fn merge(self, other: ReporterOptions) -> Self {
        Self {
            cwd: other.cwd.or(self.cwd),
            output: other.output.or(self.output),
            delimiter: other.delimiter.or(self.delimiter),
            reporter: other.reporter.or(self.reporter),
            silent: other.silent.or(self.silent),
            spaces: other.spaces.or(self.spaces),
        }
    }

    /// Resolves these options against the process's current directory.
    pub fn resolve(self) -> Result<ReporterConfig, ConfigError> {
        let current_dir = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        let current_dir =
            Utf8PathBuf::try_from(current_dir).map_err(ConfigError::NonUtf8CurrentDir)?;
        Ok(self.resolve_in(&current_dir))
    }

    /// Resolves these options, treating `current_dir` as the process's current directory.
    ///
    /// Both `cwd` and `output` are made absolute relative to `current_dir`.
    pub fn resolve_in(self, current_dir: &Utf8Path) -> ReporterConfig {
        let cwd = match &self.cwd {
            Some(cwd) => absolutize(current_dir, cwd),
            None => absolutize(current_dir, Utf8Path::new(".")),
        };
        let output = absolutize(
            current_dir,
            self.output
                .as_deref()
                .unwrap_or(Utf8Path::new(DEFAULT_OUTPUT)),
        );

        ReporterConfig {
            cwd,
            output,
            delimiter: self
                .delimiter
                .unwrap_or_else(|| DEFAULT_DELIMITER.to_owned()),
            reporter: self.reporter.unwrap_or_else(|| DEFAULT_REPORTER.to_owned()),
            silent: self.silent.unwrap_or(false),
            spaces: self.spaces.unwrap_or(DEFAULT_INDENT),
        }
    }
}

/// Resolved reporter configuration.
///
/// Returned by [`ReporterOptions::resolve`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReporterConfig {
    cwd: Utf8PathBuf,
    output: Utf8PathBuf,
    delimiter: String,
    reporter: String,
    silent: bool,
    spaces: usize,
}

impl ReporterConfig {
    /// Returns the absolute directory that test file paths are reported relative to.
    pub fn cwd(&self) -> &Utf8Path {
        &self.cwd
    }

    /// Returns the absolute path to the report.
    pub fn output(&self) -> &Utf8Path {
        &self.output
    }

    /// Returns the delimiter between suite and test titles.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Returns the name of the console reporter.
    pub fn reporter(&self) -> &str {
        &self.reporter
    }

    /// Returns true if console output is suppressed.
    pub fn silent(&self) -> bool {
        self.silent
    }

    /// Returns the XML indentation width.
    pub fn spaces(&self) -> usize {
        self.spaces
    }
}
