// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line frontend for `sonar-reporter`.
//!
//! `sonar-report replay` reads lifecycle events recorded as JSON lines, feeds them to a
//! [`SonarReporter`](sonar_reporter::reporter::SonarReporter), and writes the generic execution
//! report.

#![warn(missing_docs)]

mod dispatch;
mod output;

#[doc(hidden)]
pub use dispatch::*;
