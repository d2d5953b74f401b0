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

//! The single `HEAD` pointer. Grounded on `app/ref.go`'s `UpdateHead`/
//! `ReadHead`; this stores a bare OID rather than a symbolic ref, with
//! branch support intentionally out of scope.

use std::path::Path;
use std::path::PathBuf;

use tracing::instrument;

use crate::error::RefsError;
use crate::lockfile::LockFile;
use crate::oid::Oid;

pub struct Refs {
    git_dir: PathBuf,
}

impl Refs {
    pub fn new(git_dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: git_dir.into(),
        }
    }

    fn head_path(&self) -> PathBuf {
        self.git_dir.join("HEAD")
    }

    /// `None` before the first commit (the "root-commit" state, not an
    /// error).
    #[instrument(skip(self))]
    pub fn read_head(&self) -> Result<Option<Oid>, RefsError> {
        let path = self.head_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Oid::from_hex(trimmed)
            .map(Some)
            .map_err(|_| RefsError::Corrupt {
                reason: format!("HEAD contains invalid oid {trimmed:?}"),
            })
    }

    /// Atomically rewrites `HEAD` via its own `HEAD.lock`.
    #[instrument(skip(self))]
    pub fn update_head(&self, oid: Oid) -> Result<(), RefsError> {
        let mut lockfile = LockFile::new(self.head_path());
        if !lockfile.hold_for_update()? {
            return Err(RefsError::Busy);
        }
        lockfile.write(format!("{oid}\n").as_bytes())?;
        lockfile.commit()?;
        Ok(())
    }

    pub fn head_dir(&self) -> &Path {
        &self.git_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_head_before_first_commit_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let refs = Refs::new(dir.path());
        assert_eq!(refs.read_head().unwrap(), None);
    }

    #[test]
    fn update_then_read_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let refs = Refs::new(dir.path());
        let oid = Oid::from_hex("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0").unwrap();
        refs.update_head(oid).unwrap();
        assert_eq!(refs.read_head().unwrap(), Some(oid));
    }
}
