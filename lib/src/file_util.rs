// Copyright 2026 The gitlit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Path and filesystem helpers shared by the object database, index, and
//! workspace scanner. Adapted from a richer `file_util.rs`: kept are the
//! atomic-rename-via-temp-file helpers and the path-context error wrapper;
//! dropped are the async/tokio bridging, Windows registry symlink probing,
//! executable-bit filesystem probing, and byte-path conversions this crate's
//! single-threaded, Unix-oriented scope has no use for (see DESIGN.md).

use std::fs;
use std::fs::File;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tempfile::PersistError;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("cannot access {path}")]
pub struct PathError {
    pub path: PathBuf,
    pub source: io::Error,
}

pub trait IoResultExt<T> {
    fn context(self, path: impl AsRef<Path>) -> Result<T, PathError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn context(self, path: impl AsRef<Path>) -> Result<T, PathError> {
        self.map_err(|error| PathError {
            path: path.as_ref().to_path_buf(),
            source: error,
        })
    }
}

/// Creates a directory, or does nothing if it already exists.
pub fn create_or_reuse_dir(dirname: &Path) -> io::Result<()> {
    match fs::create_dir_all(dirname) {
        Ok(()) => Ok(()),
        Err(_) if dirname.is_dir() => Ok(()),
        Err(e) => Err(e),
    }
}

/// Removes all files directly inside `dirname`, but not the directory
/// itself. `dirname` must contain no sub directories.
pub fn remove_dir_contents(dirname: &Path) -> Result<(), PathError> {
    for entry in dirname.read_dir().context(dirname)? {
        let entry = entry.context(dirname)?;
        let path = entry.path();
        fs::remove_file(&path).context(&path)?;
    }
    Ok(())
}

/// Consumes as much `..` and `.` as possible without considering symlinks.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir
                if matches!(result.components().next_back(), Some(Component::Normal(_))) =>
            {
                let popped = result.pop();
                assert!(popped);
            }
            _ => result.push(c),
        }
    }
    if result.as_os_str().is_empty() {
        ".".into()
    } else {
        result
    }
}

/// Turns `to` into a path relative to `from`. Both must be absolute and
/// normalized the same way.
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    for (i, base) in from.ancestors().enumerate() {
        if let Ok(suffix) = to.strip_prefix(base) {
            if i == 0 && suffix.as_os_str().is_empty() {
                return ".".into();
            }
            let mut result = PathBuf::from_iter(std::iter::repeat_n("..", i));
            result.push(suffix);
            return result;
        }
    }
    to.to_owned()
}

/// Persists the temporary file after flushing its content to disk.
pub fn persist_temp_file<P: AsRef<Path>>(temp_file: NamedTempFile, new_path: P) -> io::Result<File> {
    temp_file.as_file().sync_data()?;
    temp_file
        .persist(new_path)
        .map_err(|PersistError { error, file: _ }| error)
}

/// Like [`persist_temp_file`], but tolerates a target created concurrently by
/// another writer with identical content — the object store's writers are
/// content-addressed, so a rename racing another process's identical write is
/// a no-op, not an error.
pub fn persist_content_addressed_temp_file<P: AsRef<Path>>(
    temp_file: NamedTempFile,
    new_path: P,
) -> io::Result<File> {
    temp_file.as_file().sync_data()?;
    temp_file
        .persist(new_path)
        .map_err(|PersistError { error, file: _ }| error)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn normalize_too_many_dot_dot() {
        assert_eq!(normalize_path(Path::new("foo/..")), Path::new("."));
        assert_eq!(normalize_path(Path::new("foo/../..")), Path::new(".."));
        assert_eq!(
            normalize_path(Path::new("foo/../../../bar/baz/..")),
            Path::new("../../bar")
        );
    }

    #[test]
    fn relative_path_common_prefix() {
        assert_eq!(
            relative_path(Path::new("/a/b"), Path::new("/a/b/c")),
            Path::new("c")
        );
        assert_eq!(
            relative_path(Path::new("/a/b/c"), Path::new("/a/b")),
            Path::new("..")
        );
    }

    #[test]
    fn persist_over_existing_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("file");
        std::fs::write(&target, b"contents").unwrap();
        let mut temp_file = NamedTempFile::new_in(&dir).unwrap();
        temp_file.write_all(b"contents").unwrap();
        assert!(persist_content_addressed_temp_file(temp_file, &target).is_ok());
    }
}
