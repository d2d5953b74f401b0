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

//! `status [--porcelain]`: long and porcelain renderings of the three-way
//! status reconciliation. Grounded on `app/cmd/jit/status.go`'s
//! `printLongFormat`/`printPorcelainFormat`/`statusFor`/`printCommitStatus`.

use clap::Args;
use gitlit_lib::status;
use gitlit_lib::status::IndexChange;
use gitlit_lib::status::Status;
use gitlit_lib::status::WorkspaceChange;
use tracing::instrument;

use crate::command_error::CommandError;
use crate::repo::Repo;
use crate::ui::Ui;

const LABEL_WIDTH: usize = 16;

#[derive(Args, Clone, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable `XY path` / `?? path` lines instead of the long
    /// format.
    #[arg(long, short = 'p')]
    pub porcelain: bool,
}

#[instrument(skip(ui))]
pub fn run(ui: &mut Ui, args: &StatusArgs) -> Result<(), CommandError> {
    let root = std::env::current_dir().map_err(|e| CommandError::Cli(e.to_string()))?;
    let mut repo = Repo::open(&root);

    repo.index.load_for_update().map_err(gitlit_lib::Error::from)?;
    let status = status::compute(&repo.workspace, &mut repo.index, &repo.database, &repo.refs)
        .map_err(CommandError::from)?;
    repo.index.write_updates().map_err(gitlit_lib::Error::from)?;

    if args.porcelain {
        print_porcelain(ui, &status);
    } else {
        print_long(ui, &status);
    }
    Ok(())
}

fn print_long(ui: &mut Ui, status: &Status) {
    print_changes(ui, "Changes to be committed", &status.index_changes);
    print_workspace_changes(ui, "Changes not staged for commit", &status.workspace_changes);
    print_untracked(ui, status);
    print_commit_status(ui, status);
}

fn long_label(change: IndexChange) -> &'static str {
    match change {
        IndexChange::Added => "new file:",
        IndexChange::Deleted => "deleted:",
        IndexChange::Modified => "modified:",
    }
}

fn print_changes(ui: &mut Ui, heading: &str, changes: &std::collections::BTreeMap<String, IndexChange>) {
    if changes.is_empty() {
        return;
    }
    ui.println_stdout(&format!("{heading}:"));
    for (path, change) in changes {
        ui.println_stdout(&format!("{:>width$} {path}", long_label(*change), width = LABEL_WIDTH));
    }
}

fn print_workspace_changes(
    ui: &mut Ui,
    heading: &str,
    changes: &std::collections::BTreeMap<String, WorkspaceChange>,
) {
    if changes.is_empty() {
        return;
    }
    ui.println_stdout(&format!("{heading}:"));
    for (path, change) in changes {
        let label = match change {
            WorkspaceChange::Modified => "modified:",
            WorkspaceChange::Deleted => "deleted:",
        };
        ui.println_stdout(&format!("{label:>width$} {path}", width = LABEL_WIDTH));
    }
}

fn print_untracked(ui: &mut Ui, status: &Status) {
    if status.untracked.is_empty() {
        return;
    }
    ui.println_stdout("Untracked files:");
    for path in &status.untracked {
        ui.println_stdout(&format!("{path:>width$}", width = LABEL_WIDTH));
    }
}

fn print_commit_status(ui: &mut Ui, status: &Status) {
    if !status.is_index_empty() {
        return;
    }
    if !status.is_workspace_clean() {
        ui.println_stdout("no changes added to commit");
    } else if !status.untracked.is_empty() {
        ui.println_stdout("nothing added to commit but untracked files present");
    } else {
        ui.println_stdout("nothing to commit, working tree clean");
    }
}

fn print_porcelain(ui: &mut Ui, status: &Status) {
    let mut paths: std::collections::BTreeSet<&String> = std::collections::BTreeSet::new();
    paths.extend(status.index_changes.keys());
    paths.extend(status.workspace_changes.keys());
    for path in paths {
        let left = status.index_changes.get(path).map_or(' ', |c| match c {
            IndexChange::Added => 'A',
            IndexChange::Modified => 'M',
            IndexChange::Deleted => 'D',
        });
        let right = status.workspace_changes.get(path).map_or(' ', |c| match c {
            WorkspaceChange::Modified => 'M',
            WorkspaceChange::Deleted => 'D',
        });
        ui.println_stdout(&format!("{left}{right} {path}"));
    }
    for path in &status.untracked {
        ui.println_stdout(&format!("?? {path}"));
    }
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
            .stat_file(&gitlit_lib::repo_path::RepoPath::new(path))
            .unwrap()
            .unwrap();
        let oid = repo
            .database
            .store(gitlit_lib::objects::Object::Blob(gitlit_lib::objects::Blob {
                data: contents.to_vec(),
            }))
            .unwrap();
        repo.index.load_for_update().unwrap();
        repo.index
            .add(gitlit_lib::index::Entry::new(path.to_owned(), oid, stat));
        repo.index.write_updates().unwrap();
    }

    #[test]
    fn porcelain_marks_newly_staged_file_as_added() {
        let (dir, mut repo) = fixture();
        stage(&mut repo, "hello.txt", b"hello");

        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let mut ui = Ui::for_test(Box::new(Vec::new()), Box::new(Vec::new()));
        let result = run(&mut ui, &StatusArgs { porcelain: true });
        std::env::set_current_dir(cwd).unwrap();
        result.unwrap();
    }

    #[test]
    fn clean_tree_reports_index_empty() {
        let (_dir, repo) = fixture();
        let mut index = repo.index;
        index.load().unwrap();
        let status = status::compute(&repo.workspace, &mut index, &repo.database, &repo.refs).unwrap();
        assert!(status.is_index_empty());
        assert!(status.is_workspace_clean());
    }
}
