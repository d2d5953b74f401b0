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

//! Three-way reconciliation between the HEAD tree, the index, and the
//! working tree. Grounded on `app/repository/status.go`'s `NewStatus`/
//! `scanWorkspace`/`checkIndexEntries`/`isTrackableFile`.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::instrument;

use crate::error::Error;
use crate::index::Index;
use crate::object_database::ObjectDatabase;
use crate::objects::Object;
use crate::oid::Oid;
use crate::refs::Refs;
use crate::repo_path::RepoPath;
use crate::timestamp::FileStat;
use crate::timestamp::TREE_MODE;
use crate::workspace::Workspace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexChange {
    Added,
    Modified,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceChange {
    Modified,
    Deleted,
}

/// A path's entry in the flattened HEAD tree: enough to compare against an
/// index entry without re-walking trees.
struct HeadEntry {
    mode: u32,
    oid: Oid,
}

/// The result of one status computation pass.
pub struct Status {
    pub index_changes: BTreeMap<String, IndexChange>,
    pub workspace_changes: BTreeMap<String, WorkspaceChange>,
    /// Ordered (workspace scan order happens depth-first per directory,
    /// but callers want lexicographic output, so this is kept sorted).
    pub untracked: BTreeSet<String>,
}

impl Status {
    /// No staged changes relative to HEAD — backs the CLI's closing message
    /// (`examples/original_source/app/cmd/jit/status.go`'s
    /// `printCommitStatus`).
    pub fn is_index_empty(&self) -> bool {
        self.index_changes.is_empty()
    }

    /// No unstaged workspace changes against the index.
    pub fn is_workspace_clean(&self) -> bool {
        self.workspace_changes.is_empty()
    }
}

/// Computes [`Status`] against one repository snapshot, opportunistically
/// refreshing stale stat-cache entries on `index` as it goes so later runs
/// can skip the rehash.
#[instrument(skip_all)]
pub fn compute(
    workspace: &Workspace,
    index: &mut Index,
    database: &ObjectDatabase,
    refs: &Refs,
) -> Result<Status, Error> {
    let mut stats: BTreeMap<String, FileStat> = BTreeMap::new();
    let mut untracked: BTreeSet<String> = BTreeSet::new();
    scan_workspace(workspace, index, &RepoPath::new(""), &mut stats, &mut untracked)?;

    let mut head_tree: BTreeMap<String, HeadEntry> = BTreeMap::new();
    if let Some(head_oid) = refs.read_head()? {
        let commit_obj = database.load(head_oid)?;
        let Object::Commit(commit) = commit_obj.as_ref() else {
            return Err(Error::InvalidArgs(format!("HEAD {head_oid} is not a commit")));
        };
        read_tree(database, commit.tree, "", &mut head_tree)?;
    }

    let mut index_changes = BTreeMap::new();
    let mut workspace_changes = BTreeMap::new();

    let paths: Vec<String> = index.sorted_entries().map(|e| e.path.clone()).collect();
    for path in &paths {
        check_against_workspace(index, workspace, path, &stats, &mut workspace_changes)?;
        check_against_head(index, path, &head_tree, &mut index_changes);
    }
    for path in head_tree.keys() {
        if !index.is_tracked(path) {
            index_changes.insert(path.clone(), IndexChange::Deleted);
        }
    }

    Ok(Status {
        index_changes,
        workspace_changes,
        untracked,
    })
}

/// Recursively walks the working tree from `prefix`, filling `stats` with
/// every stat'd path already tracked by the index and `untracked` with
/// workspace paths that aren't.
fn scan_workspace(
    workspace: &Workspace,
    index: &Index,
    prefix: &RepoPath,
    stats: &mut BTreeMap<String, FileStat>,
    untracked: &mut BTreeSet<String>,
) -> Result<(), Error> {
    for (name, is_dir) in workspace.list_directory(prefix)? {
        let path = prefix.join(&name);
        let path_str = path.as_str().to_owned();

        if index.is_tracked(&path_str) {
            if let Some(stat) = workspace.stat_file(&path)? {
                stats.insert(path_str.clone(), stat);
            }
            if is_dir {
                scan_workspace(workspace, index, &path, stats, untracked)?;
            }
        } else if is_trackable(workspace, index, &path, is_dir)? {
            if is_dir {
                untracked.insert(format!("{path_str}/"));
            } else {
                untracked.insert(path_str);
            }
        }
    }
    Ok(())
}

/// True if `path` (or something beneath it, when it's a directory) has no
/// index entry — i.e. `add`ing it would stage something new. Grounded on
/// `isTrackableFile`.
fn is_trackable(workspace: &Workspace, index: &Index, path: &RepoPath, is_dir: bool) -> Result<bool, Error> {
    if !is_dir {
        return Ok(!index.is_tracked_file(path.as_str()));
    }
    for (name, child_is_dir) in workspace.list_directory(path)? {
        if is_trackable(workspace, index, &path.join(&name), child_is_dir)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Flattens a tree object into `head_tree`, recursing into subtrees (mode
/// `040000`) and keyed by file leaves only.
fn read_tree(
    database: &ObjectDatabase,
    tree_oid: Oid,
    prefix: &str,
    head_tree: &mut BTreeMap<String, HeadEntry>,
) -> Result<(), Error> {
    let obj = database.load(tree_oid)?;
    let Object::Tree(tree) = obj.as_ref() else {
        return Err(Error::InvalidArgs(format!("{tree_oid} is not a tree")));
    };
    for entry in &tree.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        if entry.mode == TREE_MODE {
            read_tree(database, entry.oid, &path, head_tree)?;
        } else {
            head_tree.insert(
                path,
                HeadEntry {
                    mode: entry.mode,
                    oid: entry.oid,
                },
            );
        }
    }
    Ok(())
}

/// Index-vs-workspace reconciliation for one entry. Trusts a matching
/// stat-cache timestamp; otherwise re-hashes the file and
/// refreshes the entry's cached stat on a match so the next run can trust
/// the cache again.
fn check_against_workspace(
    index: &mut Index,
    workspace: &Workspace,
    path: &str,
    stats: &BTreeMap<String, FileStat>,
    workspace_changes: &mut BTreeMap<String, WorkspaceChange>,
) -> Result<(), Error> {
    let Some(stat) = stats.get(path) else {
        workspace_changes.insert(path.to_owned(), WorkspaceChange::Deleted);
        return Ok(());
    };

    let entry = index.entry_for_path(path).expect("path came from index").clone();
    if !entry.stat_matches(stat) {
        workspace_changes.insert(path.to_owned(), WorkspaceChange::Modified);
        return Ok(());
    }
    if entry.times_match(stat) {
        return Ok(());
    }

    let data = workspace.read_file(&RepoPath::new(path))?;
    let blob = Object::Blob(crate::objects::Blob { data });
    let oid = blob.hash();
    if oid == entry.oid {
        index.refresh_entry_stat(path, *stat);
    } else {
        workspace_changes.insert(path.to_owned(), WorkspaceChange::Modified);
    }
    Ok(())
}

/// Index-vs-HEAD reconciliation for one entry.
fn check_against_head(
    index: &Index,
    path: &str,
    head_tree: &BTreeMap<String, HeadEntry>,
    index_changes: &mut BTreeMap<String, IndexChange>,
) {
    let entry = index.entry_for_path(path).expect("path came from index");
    match head_tree.get(path) {
        None => {
            index_changes.insert(path.to_owned(), IndexChange::Added);
        }
        Some(head_entry) => {
            if head_entry.mode != entry.mode || head_entry.oid != entry.oid {
                index_changes.insert(path.to_owned(), IndexChange::Modified);
            }
        }
    }
}
