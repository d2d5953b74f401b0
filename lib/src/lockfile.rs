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

//! Mutex-as-a-file: exclusive-create a `<path>.lock` sibling, then either
//! commit (atomic rename over `path`) or roll back (unlink). Grounded on
//! `app/lockfile.go`'s `HoldForUpdate`/`Commit`/`Rollback`.
//!
//! There is intentionally no retry/timeout: a held lock aborts the caller
//! immediately and a crash leaves `.lock` behind for manual cleanup.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::instrument;

pub struct LockFile {
    target_path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
}

impl LockFile {
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        let target_path = target_path.into();
        let mut lock_path = target_path.clone().into_os_string();
        lock_path.push(".lock");
        Self {
            target_path,
            lock_path: lock_path.into(),
            file: None,
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Attempts exclusive creation of the `.lock` sibling. Returns `false`
    /// (without erroring) if it already exists — the caller's signal to
    /// report "repository busy" and abort without mutating anything.
    #[instrument(skip(self))]
    pub fn hold_for_update(&mut self) -> io::Result<bool> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.lock_path)
        {
            Ok(file) => {
                debug!(path = %self.lock_path.display(), "acquired lock");
                self.file = Some(file);
                Ok(true)
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn write(&mut self, contents: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other(format!("not holding lock on {}", self.lock_path.display())))?;
        file.write_all(contents)
    }

    /// Closes the handle and atomically renames `.lock` onto the real path.
    #[instrument(skip(self))]
    pub fn commit(&mut self) -> io::Result<()> {
        let file = self
            .file
            .take()
            .ok_or_else(|| io::Error::other(format!("not holding lock on {}", self.lock_path.display())))?;
        drop(file);
        std::fs::rename(&self.lock_path, &self.target_path)?;
        debug!(path = %self.target_path.display(), "committed lock");
        Ok(())
    }

    /// Closes the handle and unlinks the `.lock` sibling without touching
    /// the target path.
    #[instrument(skip(self))]
    pub fn rollback(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.take() {
            drop(file);
            std::fs::remove_file(&self.lock_path)?;
        }
        Ok(())
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if self.file.is_some() {
            let _ = self.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_write_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        let mut lock = LockFile::new(&target);
        assert!(lock.hold_for_update().unwrap());
        lock.write(b"contents").unwrap();
        lock.commit().unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"contents");
        assert!(!lock.lock_path().exists());
    }

    #[test]
    fn second_hold_fails_while_first_is_live() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        let mut first = LockFile::new(&target);
        assert!(first.hold_for_update().unwrap());

        let mut second = LockFile::new(&target);
        assert!(!second.hold_for_update().unwrap());
    }

    #[test]
    fn rollback_removes_lock_without_touching_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index");
        std::fs::write(&target, b"original").unwrap();
        let mut lock = LockFile::new(&target);
        lock.hold_for_update().unwrap();
        lock.write(b"garbage").unwrap();
        lock.rollback().unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"original");
        assert!(!lock.lock_path().exists());
    }
}
