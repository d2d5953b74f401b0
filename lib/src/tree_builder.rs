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

//! Flat index entries -> nested tree objects. Grounded on `app/tree.go`'s
//! `addEntry`/`Traverse`/`BuildTree` (recursive build, post-order write), in
//! the idiom of writing children before parents so a parent's entry can
//! reference an already-persisted oid. Builds a complete tree from the full
//! flat entry set on every commit rather than applying incremental overrides
//! onto a reused base tree: each commit snapshots the whole index, so there
//! is no base tree to diff against.

use std::collections::BTreeMap;

use crate::error::ObjectDatabaseError;
use crate::object_database::ObjectDatabase;
use crate::objects::Object;
use crate::objects::Tree;
use crate::objects::TreeEntry;
use crate::oid::Oid;
use crate::timestamp::TREE_MODE;

enum Node {
    File { mode: u32, oid: Oid },
    Dir(TreeNode),
}

#[derive(Default)]
struct TreeNode {
    children: BTreeMap<String, Node>,
}

impl TreeNode {
    fn insert(&mut self, parent_dirs: &[&str], name: &str, mode: u32, oid: Oid) {
        match parent_dirs.split_first() {
            None => {
                self.children.insert(name.to_owned(), Node::File { mode, oid });
            }
            Some((head, tail)) => {
                let base_name = head.rsplit('/').next().unwrap_or(head);
                let entry = self
                    .children
                    .entry(base_name.to_owned())
                    .or_insert_with(|| Node::Dir(TreeNode::default()));
                match entry {
                    Node::Dir(subtree) => subtree.insert(tail, name, mode, oid),
                    Node::File { .. } => unreachable!("index shadowing guarantees no file/dir collision"),
                }
            }
        }
    }
}

/// Builds the root tree node from a flat, sorted sequence of
/// `(path, mode, oid)` index entries.
pub fn build(entries: impl Iterator<Item = (String, u32, Oid)>) -> TreeNode {
    let mut root = TreeNode::default();
    for (path, mode, oid) in entries {
        let components: Vec<&str> = path.split('/').collect();
        let (name, parent_dirs) = components.split_last().expect("path has at least one component");
        root.insert(parent_dirs, name, mode, oid);
    }
    root
}

/// Stores every subtree bottom-up (post-order, mirroring `Tree.Traverse`),
/// then the root, returning the root's oid.
pub fn write(node: &TreeNode, db: &ObjectDatabase) -> Result<Oid, ObjectDatabaseError> {
    let mut entries = Vec::with_capacity(node.children.len());
    for (name, child) in &node.children {
        let (mode, oid) = match child {
            Node::File { mode, oid } => (*mode, *oid),
            Node::Dir(subtree) => (TREE_MODE, write(subtree, db)?),
        };
        entries.push(TreeEntry {
            mode,
            name: name.clone(),
            oid,
        });
    }
    let tree = Tree::from_sorted_entries(entries);
    db.store(Object::Tree(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Blob;
    use crate::timestamp::REGULAR_MODE;

    #[test]
    fn nested_entries_produce_matching_directory_structure() {
        let dir = tempfile::tempdir().unwrap();
        let db = ObjectDatabase::new(dir.path());
        let blob_oid = db
            .store(Object::Blob(Blob {
                data: b"hello".to_vec(),
            }))
            .unwrap();

        let entries = vec![
            ("a.txt".to_owned(), REGULAR_MODE, blob_oid),
            ("nested/b.txt".to_owned(), REGULAR_MODE, blob_oid),
            ("nested/inner/c.txt".to_owned(), REGULAR_MODE, blob_oid),
        ];
        let root = build(entries.into_iter());
        let root_oid = write(&root, &db).unwrap();

        let root_tree = db.load(root_oid).unwrap();
        let Object::Tree(root_tree) = root_tree.as_ref() else {
            panic!("expected tree");
        };
        assert_eq!(root_tree.entries.len(), 2);
        assert_eq!(root_tree.entries[0].name, "a.txt");
        assert_eq!(root_tree.entries[1].name, "nested");
        assert_eq!(root_tree.entries[1].mode, TREE_MODE);

        let nested_tree = db.load(root_tree.entries[1].oid).unwrap();
        let Object::Tree(nested_tree) = nested_tree.as_ref() else {
            panic!("expected tree");
        };
        assert_eq!(nested_tree.entries.len(), 2);
        assert_eq!(nested_tree.entries[0].name, "b.txt");
        assert_eq!(nested_tree.entries[1].name, "inner");
    }
}
