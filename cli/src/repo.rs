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

//! Ties the four core subsystems to one repository root. Grounded on
//! `app/repository/repository.go`'s `NewRepository`: a thin struct handing
//! out a `Workspace`, `ObjectDatabase`, `Index`, and `Refs` all rooted under
//! one `.git` directory.

use std::path::Path;
use std::path::PathBuf;

use gitlit_lib::index::Index;
use gitlit_lib::object_database::ObjectDatabase;
use gitlit_lib::refs::Refs;
use gitlit_lib::workspace::Workspace;

pub struct Repo {
    pub workspace: Workspace,
    pub database: ObjectDatabase,
    pub index: Index,
    pub refs: Refs,
    git_dir: PathBuf,
}

impl Repo {
    /// `init`'s target: no assumption that `.git` already exists.
    pub fn git_dir_for(root: &Path) -> PathBuf {
        root.join(".git")
    }

    /// Opens a repository rooted at `root`. Does not require `.git` to
    /// exist yet — callers that need an initialized repository should check
    /// separately; there is no dedicated "not a repository" error kind
    /// distinct from the I/O errors that would naturally occur.
    pub fn open(root: &Path) -> Self {
        let git_dir = Self::git_dir_for(root);
        Self {
            workspace: Workspace::new(root),
            database: ObjectDatabase::new(git_dir.join("objects")),
            index: Index::new(git_dir.join("index")),
            refs: Refs::new(&git_dir),
            git_dir,
        }
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }
}
