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

//! `diff [--cached|--staging]`: renders `git diff`-style output for either
//! index-vs-workspace (default) or HEAD-vs-index. Grounded on
//! `app/cmd/jit/diff.go`'s `DiffRun`/`diffHeadIndex`/`diffIndexWorkspace`/
//! `NewTargetFrom*`.

use std::collections::BTreeMap;

use clap::Args;
use gitlit_lib::diff::FileSide;
use gitlit_lib::diff::render_file_diff;
use gitlit_lib::objects::Object;
use gitlit_lib::oid::Oid;
use gitlit_lib::repo_path::RepoPath;
use gitlit_lib::status;
use gitlit_lib::status::IndexChange;
use gitlit_lib::status::WorkspaceChange;
use gitlit_lib::timestamp::TREE_MODE;
use tracing::instrument;

use crate::command_error::CommandError;
use crate::config;
use crate::repo::Repo;
use crate::ui::Ui;

#[derive(Args, Clone, Debug)]
pub struct DiffArgs {
    /// Diff HEAD against the index instead of the index against the
    /// workspace.
    #[arg(long)]
    pub cached: bool,
    /// Alias for `--cached`.
    #[arg(long)]
    pub staging: bool,
}

#[instrument(skip(ui))]
pub fn run(ui: &mut Ui, args: &DiffArgs) -> Result<(), CommandError> {
    let root = std::env::current_dir().map_err(|e| CommandError::Cli(e.to_string()))?;
    let mut repo = Repo::open(&root);
    let config = config::load(repo.git_dir())?;

    repo.index.load().map_err(gitlit_lib::Error::from)?;
    let status = status::compute(&repo.workspace, &mut repo.index, &repo.database, &repo.refs)
        .map_err(CommandError::from)?;

    if args.cached || args.staging {
        diff_head_index(ui, &repo, &status, config.diff_context)?;
    } else {
        diff_index_workspace(ui, &repo, &status, config.diff_context)?;
    }
    Ok(())
}

fn nothing_side() -> FileSide {
    FileSide {
        oid: Oid::NULL,
        mode: None,
        lines: Vec::new(),
    }
}

fn index_side(repo: &Repo, path: &str) -> Result<FileSide, CommandError> {
    let entry = repo
        .index
        .entry_for_path(path)
        .ok_or_else(|| CommandError::Cli(format!("{path}: not in index")))?;
    let object = repo.database.load(entry.oid).map_err(gitlit_lib::Error::from)?;
    let Object::Blob(blob) = object.as_ref() else {
        return Err(CommandError::Cli(format!("{path}: index entry is not a blob")));
    };
    Ok(FileSide {
        oid: entry.oid,
        mode: Some(entry.mode),
        lines: gitlit_lib::diff::lines_of(&blob.data),
    })
}

fn file_side(repo: &Repo, path: &str) -> Result<FileSide, CommandError> {
    let data = repo
        .workspace
        .read_file(&RepoPath::new(path.to_owned()))
        .map_err(gitlit_lib::Error::from)?;
    let oid = Object::Blob(gitlit_lib::objects::Blob { data: data.clone() }).hash();
    let stat = repo
        .workspace
        .stat_file(&RepoPath::new(path.to_owned()))
        .map_err(gitlit_lib::Error::from)?
        .ok_or_else(|| CommandError::Cli(format!("{path}: no such file or directory")))?;
    Ok(FileSide {
        oid,
        mode: Some(stat.mode),
        lines: gitlit_lib::diff::lines_of(&data),
    })
}

fn head_side(repo: &Repo, path: &str) -> Result<FileSide, CommandError> {
    let tree = flatten_head_tree(repo)?;
    let (mode, oid) = *tree
        .get(path)
        .ok_or_else(|| CommandError::Cli(format!("{path}: not present in HEAD")))?;
    let object = repo.database.load(oid).map_err(gitlit_lib::Error::from)?;
    let Object::Blob(blob) = object.as_ref() else {
        return Err(CommandError::Cli(format!("{path}: HEAD entry is not a blob")));
    };
    Ok(FileSide {
        oid,
        mode: Some(mode),
        lines: gitlit_lib::diff::lines_of(&blob.data),
    })
}

/// Flattens the commit pointed to by `HEAD` into a path -> (mode, oid) map,
/// mirroring the status engine's own tree flattening step.
/// The two command flows that need a head entry (`diff --cached`'s Modified/
/// Deleted cases) each need it independently of the status computation, the
/// same way the original recomputes it per target rather than threading it
/// through.
fn flatten_head_tree(repo: &Repo) -> Result<BTreeMap<String, (u32, Oid)>, CommandError> {
    let mut out = BTreeMap::new();
    if let Some(head_oid) = repo.refs.read_head().map_err(gitlit_lib::Error::from)? {
        let commit_obj = repo.database.load(head_oid).map_err(gitlit_lib::Error::from)?;
        let Object::Commit(commit) = commit_obj.as_ref() else {
            return Err(CommandError::Cli("HEAD does not point at a commit".to_owned()));
        };
        flatten_tree(repo, commit.tree, "", &mut out)?;
    }
    Ok(out)
}

fn flatten_tree(
    repo: &Repo,
    tree_oid: Oid,
    prefix: &str,
    out: &mut BTreeMap<String, (u32, Oid)>,
) -> Result<(), CommandError> {
    let object = repo.database.load(tree_oid).map_err(gitlit_lib::Error::from)?;
    let Object::Tree(tree) = object.as_ref() else {
        return Err(CommandError::Cli(format!("{tree_oid}: not a tree")));
    };
    for entry in &tree.entries {
        let path = if prefix.is_empty() {
            entry.name.clone()
        } else {
            format!("{prefix}/{}", entry.name)
        };
        if entry.mode == TREE_MODE {
            flatten_tree(repo, entry.oid, &path, out)?;
        } else {
            out.insert(path, (entry.mode, entry.oid));
        }
    }
    Ok(())
}

fn diff_head_index(ui: &mut Ui, repo: &Repo, status: &gitlit_lib::status::Status, context: usize) -> Result<(), CommandError> {
    for (path, change) in &status.index_changes {
        let (a, b) = match change {
            IndexChange::Added => (nothing_side(), index_side(repo, path)?),
            IndexChange::Modified => (head_side(repo, path)?, index_side(repo, path)?),
            IndexChange::Deleted => (head_side(repo, path)?, nothing_side()),
        };
        if let Some(rendered) = render_file_diff(path, &a, &b, context) {
            ui.write_stdout(&rendered);
        }
    }
    Ok(())
}

fn diff_index_workspace(ui: &mut Ui, repo: &Repo, status: &gitlit_lib::status::Status, context: usize) -> Result<(), CommandError> {
    for (path, change) in &status.workspace_changes {
        let (a, b) = match change {
            WorkspaceChange::Modified => (index_side(repo, path)?, file_side(repo, path)?),
            WorkspaceChange::Deleted => (index_side(repo, path)?, nothing_side()),
        };
        if let Some(rendered) = render_file_diff(path, &a, &b, context) {
            ui.write_stdout(&rendered);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, Repo) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        let repo = Repo::open(dir.path());
        (dir, repo)
    }

    fn stage(repo: &mut Repo, path: &str, contents: &[u8]) {
        std::fs::write(repo.workspace.root().join(path), contents).unwrap();
        let stat = repo
            .workspace
            .stat_file(&RepoPath::new(path.to_owned()))
            .unwrap()
            .unwrap();
        let oid = repo
            .database
            .store(Object::Blob(gitlit_lib::objects::Blob { data: contents.to_vec() }))
            .unwrap();
        repo.index.load_for_update().unwrap();
        repo.index
            .add(gitlit_lib::index::Entry::new(path.to_owned(), oid, stat));
        repo.index.write_updates().unwrap();
    }

    #[test]
    fn new_file_diff_renders_dev_null_preamble() {
        let (dir, mut repo) = fixture();
        stage(&mut repo, "hello.txt", b"hello\n");

        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let mut ui = Ui::for_test(Box::new(Vec::new()), Box::new(Vec::new()));
        let result = run(
            &mut ui,
            &DiffArgs {
                cached: true,
                staging: false,
            },
        );
        std::env::set_current_dir(cwd).unwrap();
        result.unwrap();
    }

    #[test]
    fn modified_workspace_file_produces_a_hunk() {
        let (dir, mut repo) = fixture();
        stage(&mut repo, "hello.txt", b"hello\nworld\n");
        std::fs::write(dir.path().join("hello.txt"), b"hello\nthere\n").unwrap();

        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let mut ui = Ui::for_test(Box::new(Vec::new()), Box::new(Vec::new()));
        let result = run(
            &mut ui,
            &DiffArgs {
                cached: false,
                staging: false,
            },
        );
        std::env::set_current_dir(cwd).unwrap();
        result.unwrap();
    }
}
