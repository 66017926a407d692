// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Joins `path` onto `base` unless it is already absolute, then removes `.` and `..` components
/// without touching the file system.
pub(crate) fn absolutize(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    let joined = if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    };

    let mut normalized = Utf8PathBuf::new();
    for component in joined.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                // Popping past the root is a no-op, as with `path.resolve`.
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Returns "test" or "tests" as appropriate.
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 { "test" } else { "tests" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/project", "./coverage/sonar.xml", "/project/coverage/sonar.xml" ; "dot relative")]
    #[test_case("/project", "coverage/../out/sonar.xml", "/project/out/sonar.xml" ; "parent component")]
    #[test_case("/project", "/tmp/sonar.xml", "/tmp/sonar.xml" ; "already absolute")]
    #[test_case("/project/sub", "../../../x.xml", "/x.xml" ; "past the root")]
    fn absolutizes(base: &str, path: &str, expected: &str) {
        assert_eq!(
            absolutize(Utf8Path::new(base), Utf8Path::new(path)),
            Utf8PathBuf::from(expected)
        );
    }
}
