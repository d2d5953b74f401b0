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

//! `commit`: read a message from stdin, snapshot the index into a tree, and
//! append one commit onto `HEAD`. Grounded on `app/cmd/jit/commit.go`'s
//! `CommitCmdRun`.

use std::io::Read as _;

use clap::Args;
use gitlit_lib::objects::Commit;
use gitlit_lib::objects::Object;
use gitlit_lib::tree_builder;
use tracing::instrument;

use crate::author;
use crate::command_error::CommandError;
use crate::config::UserConfig;
use crate::config;
use crate::repo::Repo;
use crate::ui::Ui;

#[derive(Args, Clone, Debug)]
pub struct CommitArgs {}

#[instrument(skip(ui, _args))]
pub fn run(ui: &mut Ui, _args: &CommitArgs) -> Result<(), CommandError> {
    let root = std::env::current_dir().map_err(|e| CommandError::Cli(e.to_string()))?;
    let repo = Repo::open(&root);
    let config = config::load(repo.git_dir())?;

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .map_err(|e| CommandError::Cli(e.to_string()))?;

    let (prefix, oid, message) = commit_with_message(repo, &config, &raw)?;
    ui.println_stdout(&format!("{prefix}{oid} {message}"));
    Ok(())
}

/// The part of `commit` that doesn't touch process stdin, split out so unit
/// tests can drive it directly.
fn commit_with_message(
    mut repo: Repo,
    config: &UserConfig,
    raw_message: &str,
) -> Result<(&'static str, gitlit_lib::oid::Oid, String), CommandError> {
    let message = raw_message.split('\n').next().unwrap_or_default().to_owned();

    repo.index.load().map_err(gitlit_lib::Error::from)?;

    let entries = repo
        .index
        .sorted_entries()
        .map(|entry| (entry.path.clone(), entry.mode, entry.oid));
    let root_node = tree_builder::build(entries);
    let tree_oid = tree_builder::write(&root_node, &repo.database).map_err(gitlit_lib::Error::from)?;

    let parent = repo.refs.read_head().map_err(gitlit_lib::Error::from)?;
    let signature = author::signature(config);
    let commit = Commit {
        tree: tree_oid,
        parent,
        author: signature.clone(),
        committer: signature,
        message: format!("{message}\n"),
    };
    let commit_oid = repo
        .database
        .store(Object::Commit(commit))
        .map_err(gitlit_lib::Error::from)?;
    repo.refs.update_head(commit_oid).map_err(gitlit_lib::Error::from)?;

    let prefix = if parent.is_none() { "(root-commit) " } else { "" };
    Ok((prefix, commit_oid, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(dir: &std::path::Path) {
        std::fs::create_dir_all(dir.join(".git/objects")).unwrap();
        std::fs::create_dir_all(dir.join(".git/refs")).unwrap();
        std::fs::write(dir.join("hello.txt"), b"hello").unwrap();

        let mut repo = Repo::open(dir);
        repo.index.load_for_update().unwrap();
        let stat = repo
            .workspace
            .stat_file(&gitlit_lib::repo_path::RepoPath::new("hello.txt"))
            .unwrap()
            .unwrap();
        let oid = repo
            .database
            .store(Object::Blob(gitlit_lib::objects::Blob { data: b"hello".to_vec() }))
            .unwrap();
        repo.index
            .add(gitlit_lib::index::Entry::new("hello.txt".to_owned(), oid, stat));
        repo.index.write_updates().unwrap();
    }

    fn test_config() -> UserConfig {
        UserConfig {
            author_name: Some("A U Thor".to_owned()),
            author_email: Some("author@example.com".to_owned()),
            ..UserConfig::default()
        }
    }

    #[test]
    fn first_commit_is_root_commit() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());

        let repo = Repo::open(dir.path());
        let (prefix, oid, message) = commit_with_message(repo, &test_config(), "initial commit\n").unwrap();
        assert_eq!(prefix, "(root-commit) ");
        assert_eq!(message, "initial commit");

        let repo = Repo::open(dir.path());
        assert_eq!(repo.refs.read_head().unwrap(), Some(oid));
        let commit = repo.database.load(oid).unwrap();
        match commit.as_ref() {
            Object::Commit(commit) => {
                assert!(commit.parent.is_none());
                assert_eq!(commit.message, "initial commit\n");
            }
            _ => panic!("expected commit"),
        }
    }

    #[test]
    fn second_commit_has_first_as_parent() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let first_repo = Repo::open(dir.path());
        let (_, first_oid, _) = commit_with_message(first_repo, &test_config(), "initial commit\n").unwrap();

        std::fs::write(dir.path().join("second.txt"), b"second").unwrap();
        let mut repo = Repo::open(dir.path());
        repo.index.load_for_update().unwrap();
        let stat = repo
            .workspace
            .stat_file(&gitlit_lib::repo_path::RepoPath::new("second.txt"))
            .unwrap()
            .unwrap();
        let oid = repo
            .database
            .store(Object::Blob(gitlit_lib::objects::Blob { data: b"second".to_vec() }))
            .unwrap();
        repo.index
            .add(gitlit_lib::index::Entry::new("second.txt".to_owned(), oid, stat));
        repo.index.write_updates().unwrap();

        let repo = Repo::open(dir.path());
        let (prefix, second_oid, _) = commit_with_message(repo, &test_config(), "second commit\n").unwrap();
        assert_eq!(prefix, "");

        let repo = Repo::open(dir.path());
        let commit = repo.database.load(second_oid).unwrap();
        match commit.as_ref() {
            Object::Commit(commit) => assert_eq!(commit.parent, Some(first_oid)),
            _ => panic!("expected commit"),
        }
    }

    #[test]
    fn empty_message_is_accepted_as_is() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let repo = Repo::open(dir.path());
        let (_, oid, message) = commit_with_message(repo, &test_config(), "\n").unwrap();
        assert_eq!(message, "");

        let repo = Repo::open(dir.path());
        let commit = repo.database.load(oid).unwrap();
        match commit.as_ref() {
            Object::Commit(commit) => assert_eq!(commit.message, "\n"),
            _ => panic!("expected commit"),
        }
    }
}
