// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing the report to disk.

use crate::errors::WriteReportError;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use std::io::Write;

/// Writes `contents` to `path`, creating any missing parent directories and replacing an existing
/// file.
///
/// The file is replaced atomically: readers see either the old contents or the new ones.
pub fn write_report(path: &Utf8Path, contents: &[u8]) -> Result<(), WriteReportError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|error| WriteReportError::Fs {
            file: parent.to_owned(),
            error,
        })?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| file.write_all(contents))
        .map_err(|error| WriteReportError::Fs {
            file: path.to_owned(),
            error: match error {
                atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => error,
            },
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;

    #[test]
    fn creates_missing_directories() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let path = dir.path().join("coverage/nested/sonar.xml");

        write_report(&path, b"<first/>").expect("report written");
        assert_eq!(
            std::fs::read_to_string(&path).expect("report read"),
            "<first/>"
        );

        write_report(&path, b"<second/>").expect("report overwritten");
        assert_eq!(
            std::fs::read_to_string(&path).expect("report read"),
            "<second/>"
        );
    }

    #[test]
    fn parent_is_a_file() {
        let dir = Utf8TempDir::new().expect("temp dir created");
        let blocker = dir.path().join("coverage");
        std::fs::write(&blocker, "not a directory").expect("blocker written");

        let error = write_report(&blocker.join("sonar.xml"), b"<report/>")
            .expect_err("parent is not a directory");
        let WriteReportError::Fs { file, .. } = error else {
            panic!("expected a file system error, found {error:?}");
        };
        assert_eq!(file, blocker);
    }
}
