// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use goldenfile::Mint;
use sonar_execution::{DEFAULT_INDENT, FileReport, Report, TestCase, TestCaseStatus};
use std::time::Duration;

#[test]
fn fixtures() {
    let mut mint = Mint::new("tests/fixtures");

    let f = mint
        .new_goldenfile("basic_report.xml")
        .expect("creating new goldenfile succeeds");

    let basic_report = basic_report();
    basic_report
        .serialize(f, DEFAULT_INDENT)
        .expect("serializing basic_report succeeds");
}

fn basic_report() -> Report {
    let mut report = Report::new();

    let mut file = FileReport::new("test/unit/math.spec.js");

    let mut test_case = TestCase::new("Math add sums two numbers", TestCaseStatus::success());
    test_case.set_duration(Duration::from_millis(5));
    file.add_test_case(test_case);

    let mut status = TestCaseStatus::failure();
    status
        .set_message("AssertionError: expected true")
        .set_description(
            "AssertionError: expected true\n    at Context.<anonymous> (test/unit/math.spec.js:14:12)",
        );
    let mut test_case = TestCase::new("Math divide rejects zero", status);
    test_case.set_duration(Duration::from_micros(12_400));
    file.add_test_case(test_case);

    let mut status = TestCaseStatus::skipped();
    status.set_message("skipped").set_description("skipped");
    file.add_test_case(TestCase::new("Math pow is not implemented yet", status));

    report.add_file(file);

    let mut file = FileReport::new("test/unit/string.spec.js");

    let mut test_case = TestCase::new("String <trim> & \"pad\"", TestCaseStatus::success());
    test_case.set_duration(Duration::from_millis(1));
    file.add_test_case(test_case);

    // A failure without a stack trace.
    let mut status = TestCaseStatus::failure();
    status.set_message("Error");
    let mut test_case = TestCase::new("String network retries", status);
    test_case.set_duration(Duration::from_millis(250));
    file.add_test_case(test_case);

    report.add_file(file);

    assert_eq!(
        (report.tests, report.failures, report.skipped),
        (5, 2, 1),
        "counts are tracked"
    );

    report
}
