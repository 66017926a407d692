// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{FORMAT_VERSION, FileReport, Report, TestCase, TestCaseStatus};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{borrow::Cow, io};

static TEST_EXECUTIONS_TAG: &str = "testExecutions";
static FILE_TAG: &str = "file";
static TEST_CASE_TAG: &str = "testCase";
static FAILURE_TAG: &str = "failure";
static SKIPPED_TAG: &str = "skipped";

pub(crate) fn serialize_report(
    report: &Report,
    writer: impl io::Write,
    indent: usize,
) -> quick_xml::Result<()> {
    let mut writer = if indent > 0 {
        Writer::new_with_indent(writer, b' ', indent)
    } else {
        Writer::new(writer)
    };

    let decl = BytesDecl::new("1.0", Some("utf-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline. This is a no-op without indentation.
    writer.write_indent()
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // The counts are not part of the format.
    let Report { files, .. } = report;

    let mut root_tag = BytesStart::new(TEST_EXECUTIONS_TAG);
    root_tag.push_attribute(("version", FORMAT_VERSION.to_string().as_str()));

    if files.is_empty() {
        writer.write_event(Event::Empty(root_tag))?;
    } else {
        writer.write_event(Event::Start(root_tag))?;
        for file in files {
            serialize_file(file, writer)?;
        }
        serialize_end_tag(TEST_EXECUTIONS_TAG, writer)?;
    }
    writer.write_event(Event::Eof)?;

    Ok(())
}

fn serialize_file(file: &FileReport, writer: &mut Writer<impl io::Write>) -> quick_xml::Result<()> {
    let FileReport {
        path, test_cases, ..
    } = file;

    let path = strip_invalid_chars(path);
    let mut file_tag = BytesStart::new(FILE_TAG);
    file_tag.push_attribute(("path", &*path));

    if test_cases.is_empty() {
        return writer.write_event(Event::Empty(file_tag));
    }

    writer.write_event(Event::Start(file_tag))?;
    for test_case in test_cases {
        serialize_test_case(test_case, writer)?;
    }
    serialize_end_tag(FILE_TAG, writer)
}

fn serialize_test_case(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestCase {
        name,
        duration,
        status,
    } = test_case;

    let name = strip_invalid_chars(name);
    let mut test_case_tag = BytesStart::new(TEST_CASE_TAG);
    test_case_tag.extend_attributes([
        ("name", &*name),
        ("duration", duration.as_millis().to_string().as_str()),
    ]);

    match status {
        TestCaseStatus::Success => writer.write_event(Event::Empty(test_case_tag)),
        TestCaseStatus::Failure {
            message,
            stack_trace,
        } => {
            writer.write_event(Event::Start(test_case_tag))?;
            serialize_status(
                message.as_deref(),
                stack_trace.as_deref(),
                FAILURE_TAG,
                writer,
            )?;
            serialize_end_tag(TEST_CASE_TAG, writer)
        }
        TestCaseStatus::Skipped {
            message,
            description,
        } => {
            writer.write_event(Event::Start(test_case_tag))?;
            serialize_status(
                message.as_deref(),
                description.as_deref(),
                SKIPPED_TAG,
                writer,
            )?;
            serialize_end_tag(TEST_CASE_TAG, writer)
        }
    }
}

fn serialize_status(
    message: Option<&str>,
    description: Option<&str>,
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(tag_name);
    // The format requires a message attribute on both failures and skips.
    let message = strip_invalid_chars(message.unwrap_or_default());
    tag.push_attribute(("message", &*message));

    match description {
        Some(description) if !description.is_empty() => {
            let description = strip_invalid_chars(description);
            writer.write_event(Event::Start(tag))?;
            writer.write_event(Event::Text(BytesText::new(&*description)))?;
            serialize_end_tag(tag_name, writer)
        }
        _ => writer.write_event(Event::Empty(tag)),
    }
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

/// Removes characters that cannot appear in an XML 1.0 document, even escaped.
///
/// Stack traces captured from terminals often contain ANSI escape sequences.
fn strip_invalid_chars(s: &str) -> Cow<'_, str> {
    if s.contains(is_invalid_xml_char) {
        Cow::Owned(s.replace(is_invalid_xml_char, ""))
    } else {
        Cow::Borrowed(s)
    }
}

fn is_invalid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f' | '\u{FFFE}' | '\u{FFFF}'
    )
}
