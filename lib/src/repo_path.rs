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

//! A slash-separated path relative to the repository root. Adapted from a
//! richer `repo_path.rs`: dropped are `ContentHash`/`serde` derives, the
//! `RepoPathTree`/`RepoPathUiConverter` machinery built for copy-detection
//! and fileset matching, and the borrowed/owned component split — this crate
//! has no rename detection and no fileset language, so a single owned
//! newtype over `String` is enough.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

/// A path relative to the repository root, using `/` as the component
/// separator regardless of host platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoPath(String);

impl RepoPath {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        debug_assert!(!value.contains('\\'), "repo paths use forward slashes");
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// All proper ancestor directories, root-to-leaf, e.g. `a/b/c.txt` ->
    /// `["a", "a/b"]`. Used to resolve index path-shadowing.
    pub fn ancestor_directories(&self) -> Vec<String> {
        let mut result = Vec::new();
        let mut prefix = String::new();
        let components: Vec<&str> = self.components().collect();
        for component in &components[..components.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);
            result.push(prefix.clone());
        }
        result
    }

    pub fn base_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<RepoPath> {
        self.0.rsplit_once('/').map(|(dir, _)| RepoPath(dir.to_owned()))
    }

    pub fn join(&self, child: &str) -> RepoPath {
        if self.0.is_empty() {
            RepoPath(child.to_owned())
        } else {
            RepoPath(format!("{}/{}", self.0, child))
        }
    }

    pub fn is_ancestor_of(&self, other: &RepoPath) -> bool {
        other.0.len() > self.0.len()
            && other.0.starts_with(self.0.as_str())
            && other.0.as_bytes()[self.0.len()] == b'/'
    }

    pub fn to_fs_path(&self, workspace_root: &Path) -> PathBuf {
        workspace_root.join(&self.0)
    }

    /// Builds a [`RepoPath`] from a filesystem path relative to the
    /// workspace root, normalizing `\` to `/` so paths are portable in the
    /// index file.
    pub fn from_relative_path(path: &Path) -> Self {
        let value = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Self(value)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
