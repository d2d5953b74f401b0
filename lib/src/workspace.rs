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

//! Working-tree enumeration, stat, and read. Grounded on `app/workspace.go`'s
//! `GetFiles`/`ListDirectories`/`ReadFile`/`StatFile`.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::instrument;

use crate::error::WorkspaceError;
use crate::repo_path::RepoPath;
use crate::timestamp::FileStat;

/// Directory names the scanner and `add` never descend into.
pub const IGNORED_DIR_NAMES: [&str; 2] = [".git", ".idea"];

pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` (file or directory, absolute or workspace-relative)
    /// to the list of regular files it names, recursively expanding
    /// directories and skipping [`IGNORED_DIR_NAMES`].
    #[instrument(skip(self))]
    pub fn list_files(&self, path: &Path) -> Result<Vec<RepoPath>, WorkspaceError> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let metadata = fs::metadata(&absolute).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                WorkspaceError::NotFound {
                    path: absolute.clone(),
                }
            } else {
                WorkspaceError::Io(source)
            }
        })?;

        if !metadata.is_dir() {
            let relative = absolute.strip_prefix(&self.root).unwrap_or(&absolute);
            return Ok(vec![RepoPath::from_relative_path(relative)]);
        }

        let mut files = Vec::new();
        self.walk_dir(&absolute, &mut files)?;
        Ok(files)
    }

    fn walk_dir(&self, dir: &Path, out: &mut Vec<RepoPath>) -> Result<(), WorkspaceError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let name = entry.file_name();
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if IGNORED_DIR_NAMES.iter().any(|ignored| name == *ignored) {
                    continue;
                }
                self.walk_dir(&entry.path(), out)?;
            } else {
                let relative = entry.path().strip_prefix(&self.root).unwrap().to_path_buf();
                out.push(RepoPath::from_relative_path(&relative));
            }
        }
        Ok(())
    }

    /// A single directory level's entries, skipping [`IGNORED_DIR_NAMES`],
    /// used by the status scanner to decide whether to recurse.
    pub fn list_directory(&self, dir: &RepoPath) -> Result<Vec<(String, bool)>, WorkspaceError> {
        let absolute = dir.to_fs_path(&self.root);
        let mut result = Vec::new();
        for entry in fs::read_dir(&absolute)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if IGNORED_DIR_NAMES.contains(&name.as_str()) {
                continue;
            }
            result.push((name, entry.file_type()?.is_dir()));
        }
        result.sort();
        Ok(result)
    }

    pub fn read_file(&self, path: &RepoPath) -> Result<Vec<u8>, WorkspaceError> {
        Ok(fs::read(path.to_fs_path(&self.root))?)
    }

    pub fn stat_file(&self, path: &RepoPath) -> Result<Option<FileStat>, WorkspaceError> {
        match fs::symlink_metadata(path.to_fs_path(&self.root)) {
            Ok(metadata) => Ok(Some(FileStat::from_metadata(&metadata))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
