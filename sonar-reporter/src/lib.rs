// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collects test lifecycle events from a test engine and writes a generic execution report.
//!
//! The entry point is [`SonarReporter`](reporter::SonarReporter): build one per run from a
//! [`ReporterConfig`](config::ReporterConfig), feed it [`TestEvent`](events::TestEvent)s as they
//! arrive, and the report is written when the run finishes.

#![warn(missing_docs)]

pub mod aggregator;
pub mod classify;
pub mod config;
pub mod console;
pub mod errors;
pub mod events;
mod helpers;
pub mod reporter;
pub mod title;
pub mod write;
