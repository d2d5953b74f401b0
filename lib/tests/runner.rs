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

//! End-to-end coverage of the object database, index, workspace scanner,
//! and status engine working together against a real temp directory,
//! calling the library API directly rather than through a command-line
//! frontend.

use std::path::Path;

use chrono::Local;
use gitlit_lib::index::Entry;
use gitlit_lib::index::Index;
use gitlit_lib::object_database::ObjectDatabase;
use gitlit_lib::objects::Blob;
use gitlit_lib::objects::Commit;
use gitlit_lib::objects::Object;
use gitlit_lib::objects::Signature;
use gitlit_lib::refs::Refs;
use gitlit_lib::status;
use gitlit_lib::status::IndexChange;
use gitlit_lib::status::WorkspaceChange;
use gitlit_lib::tree_builder;
use gitlit_lib::workspace::Workspace;

struct Fixture {
    _dir: tempfile::TempDir,
    workspace: Workspace,
    database: ObjectDatabase,
    index: Index,
    refs: Refs,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let git_dir = dir.path().join(".git");
        std::fs::create_dir_all(git_dir.join("objects")).unwrap();
        Self {
            workspace: Workspace::new(dir.path()),
            database: ObjectDatabase::new(git_dir.join("objects")),
            index: Index::new(git_dir.join("index")),
            refs: Refs::new(&git_dir),
            _dir: dir,
        }
    }

    fn write(&self, relative: &str, contents: &[u8]) {
        let path = self.workspace.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    /// Stages every file under `arg` the way the `add` command would.
    fn add(&mut self, arg: &str) {
        self.index.load_for_update().unwrap();
        for repo_path in self.workspace.list_files(Path::new(arg)).unwrap() {
            let data = self.workspace.read_file(&repo_path).unwrap();
            let stat = self.workspace.stat_file(&repo_path).unwrap().unwrap();
            let oid = self.database.store(Object::Blob(Blob { data })).unwrap();
            self.index.add(Entry::new(repo_path.as_str().to_owned(), oid, stat));
        }
        self.index.write_updates().unwrap();
    }

    /// Snapshots the index into a tree and appends a commit onto HEAD.
    fn commit(&mut self, message: &str) -> gitlit_lib::oid::Oid {
        self.index.load().unwrap();
        let entries = self
            .index
            .sorted_entries()
            .map(|entry| (entry.path.clone(), entry.mode, entry.oid));
        let root_node = tree_builder::build(entries);
        let tree_oid = tree_builder::write(&root_node, &self.database).unwrap();
        let parent = self.refs.read_head().unwrap();
        let signature = Signature {
            name: "A U Thor".to_owned(),
            email: "author@example.com".to_owned(),
            timestamp: Local::now().fixed_offset(),
        };
        let commit = Commit {
            tree: tree_oid,
            parent,
            author: signature.clone(),
            committer: signature,
            message: format!("{message}\n"),
        };
        let oid = self.database.store(Object::Commit(commit)).unwrap();
        self.refs.update_head(oid).unwrap();
        oid
    }
}

#[test]
fn add_then_commit_then_status_reports_a_clean_tree() {
    let mut fx = Fixture::new();
    fx.write("hello.txt", b"hello");
    fx.add("hello.txt");
    fx.commit("initial commit");

    fx.index.load_for_update().unwrap();
    let status = status::compute(&fx.workspace, &mut fx.index, &fx.database, &fx.refs).unwrap();
    fx.index.write_updates().unwrap();

    assert!(status.is_index_empty());
    assert!(status.is_workspace_clean());
    assert!(status.untracked.is_empty());
}

#[test]
fn committed_file_absent_from_workspace_is_untracked_as_deleted() {
    let mut fx = Fixture::new();
    fx.write("hello.txt", b"hello");
    fx.add("hello.txt");
    fx.commit("initial commit");

    std::fs::remove_file(fx.workspace.root().join("hello.txt")).unwrap();

    fx.index.load_for_update().unwrap();
    let status = status::compute(&fx.workspace, &mut fx.index, &fx.database, &fx.refs).unwrap();
    fx.index.write_updates().unwrap();

    assert_eq!(status.workspace_changes.get("hello.txt"), Some(&WorkspaceChange::Deleted));
}

#[test]
fn staging_a_directory_recursively_adds_every_file_beneath_it() {
    let mut fx = Fixture::new();
    fx.write("a-dir/hello.txt", b"hello");
    fx.add("a-dir/hello.txt");

    fx.index.load().unwrap();
    assert_eq!(fx.index.file_count(), 1);
    assert!(fx.index.entry_for_path("a-dir/hello.txt").is_some());
}

#[test]
fn staging_the_repository_root_walks_nested_directories() {
    let mut fx = Fixture::new();
    fx.write("a/b/c/x.txt", b"ex");
    fx.add(".");

    fx.index.load().unwrap();
    assert!(fx.index.entry_for_path("a/b/c/x.txt").is_some());
}

#[test]
fn incrementally_adding_files_preserves_earlier_entries() {
    let mut fx = Fixture::new();
    fx.write("hello.txt", b"hello");
    fx.add("hello.txt");
    fx.index.load().unwrap();
    assert_eq!(fx.index.file_count(), 1);

    fx.write("hello2.txt", b"hello2");
    fx.add("hello2.txt");
    fx.index.load().unwrap();
    assert_eq!(fx.index.file_count(), 2);
    assert!(fx.index.entry_for_path("hello.txt").is_some());
    assert!(fx.index.entry_for_path("hello2.txt").is_some());
}

#[test]
fn an_untracked_file_is_reported_by_status_until_staged() {
    let mut fx = Fixture::new();
    fx.write("fileA.txt", b"a");
    fx.write("fileB.txt", b"b");

    fx.index.load_for_update().unwrap();
    let status = status::compute(&fx.workspace, &mut fx.index, &fx.database, &fx.refs).unwrap();
    fx.index.write_updates().unwrap();

    assert!(status.untracked.contains("fileA.txt"));
    assert!(status.untracked.contains("fileB.txt"));

    fx.add("fileA.txt");
    fx.index.load_for_update().unwrap();
    let status = status::compute(&fx.workspace, &mut fx.index, &fx.database, &fx.refs).unwrap();
    fx.index.write_updates().unwrap();

    assert!(!status.untracked.contains("fileA.txt"));
    assert!(status.untracked.contains("fileB.txt"));
    assert_eq!(status.index_changes.get("fileA.txt"), Some(&IndexChange::Added));
}

#[test]
fn modifying_contents_without_changing_length_is_caught_by_rehash() {
    let mut fx = Fixture::new();
    fx.write("hello.txt", b"hello");
    fx.add("hello.txt");
    fx.commit("initial commit");

    std::thread::sleep(std::time::Duration::from_millis(10));
    fx.write("hello.txt", b"olleh");

    fx.index.load_for_update().unwrap();
    let status = status::compute(&fx.workspace, &mut fx.index, &fx.database, &fx.refs).unwrap();
    fx.index.write_updates().unwrap();

    assert_eq!(status.workspace_changes.get("hello.txt"), Some(&WorkspaceChange::Modified));
}

#[test]
fn second_commit_chains_onto_the_first_as_its_parent() {
    let mut fx = Fixture::new();
    fx.write("hello.txt", b"hello");
    fx.add("hello.txt");
    let first = fx.commit("initial commit");

    fx.write("second.txt", b"second");
    fx.add("second.txt");
    let second = fx.commit("second commit");

    let commit_obj = fx.database.load(second).unwrap();
    let Object::Commit(commit) = commit_obj.as_ref() else {
        panic!("expected a commit object");
    };
    assert_eq!(commit.parent, Some(first));
}

#[test]
fn shadowing_across_nested_directory_adds_keeps_only_the_leaf_paths() {
    let mut fx = Fixture::new();
    fx.write("nested/inner/c.txt", b"c");
    fx.write("nested/b.txt", b"b");
    fx.write("a.txt", b"a");
    fx.add(".");

    fx.index.load().unwrap();
    let mut paths: Vec<_> = fx.index.sorted_entries().map(|e| e.path.clone()).collect();
    paths.sort();
    assert_eq!(paths, vec!["a.txt", "nested/b.txt", "nested/inner/c.txt"]);
}
