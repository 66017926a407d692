// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use sonar_report_cli::SonarReportApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    SonarReportApp::parse().exec()
}
