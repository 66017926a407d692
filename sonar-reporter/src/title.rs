// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full test titles.

use crate::events::TestInfo;
use itertools::Itertools;
use std::iter;

/// Returns the fully-qualified title of a test: every non-empty title from the outermost suite
/// down to the test itself, joined with `delimiter`.
///
/// Untitled suites are skipped rather than contributing an empty segment. The result is not
/// escaped; escaping happens when the title is written out as XML.
pub fn full_title(test: &TestInfo, delimiter: &str) -> String {
    test.parents
        .iter()
        .map(Option::as_deref)
        .chain(iter::once(Some(test.title.as_str())))
        .flatten()
        .filter(|title| !title.is_empty())
        .join(delimiter)
}
