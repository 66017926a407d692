// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the reporter.

use camino::{FromPathBufError, Utf8PathBuf};
use sonar_execution::SerializeError;
use std::{error, fmt, io, num::ParseIntError};
use thiserror::Error;

/// An error that occurred while resolving reporter options.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// An option was passed that the reporter does not know about.
    #[error("unknown reporter option `{key}` (known options: {})", crate::config::KNOWN_OPTIONS.join(", "))]
    UnknownOption {
        /// The unknown key.
        key: String,
    },

    /// An option string was not of the form `key=value`.
    #[error("reporter option `{input}` is not of the form `key=value`")]
    MissingValue {
        /// The option string as passed in.
        input: String,
    },

    /// The `spaces` option was not a non-negative integer.
    #[error("invalid value `{value}` for reporter option `spaces`")]
    InvalidSpaces {
        /// The value as passed in.
        value: String,

        /// The underlying parse error.
        #[source]
        error: ParseIntError,
    },

    /// The current directory could not be determined.
    #[error("error determining the current directory")]
    CurrentDir(#[source] io::Error),

    /// The current directory is not valid UTF-8.
    #[error("current directory is not valid UTF-8")]
    NonUtf8CurrentDir(#[source] FromPathBufError),
}

/// An error that occurred while writing the execution report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The path being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// An error occurred while producing the XML.
    #[error("error serializing execution report for {file}")]
    Serialize {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },
}

/// Displays an error along with every error in its source chain.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Wraps `error` for display.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let Some(mut cause) = self.error.source() else {
            return Ok(());
        };

        write!(f, "\n  caused by:")?;
        loop {
            write!(f, "\n  - {cause}")?;
            match cause.source() {
                Some(next) => cause = next,
                None => return Ok(()),
            }
        }
    }
}
