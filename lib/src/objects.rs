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

//! The three object variants and their canonical, content-addressed
//! serialization. Grounded on `app/blob.go`, `app/tree.go`, and
//! `app/commit.go`: a tagged variant with one shared method set rather than
//! per-type inheritance.

use chrono::DateTime;
use chrono::FixedOffset;

use crate::error::ObjectDatabaseError;
use crate::oid::Oid;
use crate::timestamp::TREE_MODE;

/// An author/committer identity plus the instant it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl Signature {
    fn render(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    fn parse(s: &str) -> Option<Self> {
        let (rest, tz) = s.rsplit_once(' ')?;
        let (rest, ts) = rest.rsplit_once(' ')?;
        let (name, email) = rest.rsplit_once(" <")?;
        let email = email.strip_suffix('>')?;
        let ts: i64 = ts.parse().ok()?;
        let offset = parse_offset(tz)?;
        let timestamp = DateTime::from_timestamp(ts, 0)?.with_timezone(&offset);
        Some(Self {
            name: name.to_owned(),
            email: email.to_owned(),
            timestamp,
        })
    }
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = tz.split_at(1);
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[0..2].parse().ok()?;
    let minutes: i32 = digits[2..4].parse().ok()?;
    let total_seconds = hours * 3600 + minutes * 60;
    match sign {
        "+" => FixedOffset::east_opt(total_seconds),
        "-" => FixedOffset::west_opt(total_seconds),
        _ => None,
    }
}

/// Raw file content. No internal structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

/// One entry of a [`Tree`]: a mode, a base name, and the oid it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: u32,
    pub name: String,
    pub oid: Oid,
}

/// A directory listing. Entries are always kept sorted by name so
/// serialization never has to re-sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn from_sorted_entries(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: Oid,
    pub parent: Option<Oid>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Blob(_) => "blob",
            Self::Tree(_) => "tree",
            Self::Commit(_) => "commit",
        }
    }

    fn payload(&self) -> Vec<u8> {
        match self {
            Self::Blob(blob) => blob.data.clone(),
            Self::Tree(tree) => {
                let mut out = Vec::new();
                for entry in &tree.entries {
                    out.extend_from_slice(format!("{:o} {}", entry.mode, entry.name).as_bytes());
                    out.push(0);
                    out.extend_from_slice(entry.oid.as_bytes());
                }
                out
            }
            Self::Commit(commit) => {
                let mut lines = vec![format!("tree {}", commit.tree)];
                if let Some(parent) = commit.parent {
                    lines.push(format!("parent {parent}"));
                }
                lines.push(format!("author {}", commit.author.render()));
                lines.push(format!("committer {}", commit.committer.render()));
                lines.push(String::new());
                lines.push(commit.message.clone());
                lines.join("\n").into_bytes()
            }
        }
    }

    /// `"<type> <payload-len>\0<payload>"`, the bytes that get hashed and,
    /// deflate-compressed, persisted.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let payload = self.payload();
        let mut out = format!("{} {}\0", self.type_tag(), payload.len()).into_bytes();
        out.extend_from_slice(&payload);
        out
    }

    pub fn hash(&self) -> Oid {
        use sha1::Digest as _;
        let mut hasher = sha1::Sha1::new();
        hasher.update(self.canonical_bytes());
        Oid::from_bytes(hasher.finalize().into())
    }

    pub fn parse(oid: Oid, type_tag: &str, payload: &[u8]) -> Result<Self, ObjectDatabaseError> {
        match type_tag {
            "blob" => Ok(Self::Blob(Blob {
                data: payload.to_vec(),
            })),
            "tree" => Ok(Self::Tree(parse_tree(oid, payload)?)),
            "commit" => Ok(Self::Commit(parse_commit(oid, payload)?)),
            other => Err(ObjectDatabaseError::UnknownType {
                oid,
                tag: other.to_owned(),
            }),
        }
    }
}

fn parse_tree(oid: Oid, payload: &[u8]) -> Result<Tree, ObjectDatabaseError> {
    let corrupt = |reason: &str| ObjectDatabaseError::Corrupt {
        oid,
        reason: reason.to_owned(),
    };
    let mut entries = Vec::new();
    let mut rest = payload;
    while !rest.is_empty() {
        let space = rest
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| corrupt("missing mode separator"))?;
        let mode = std::str::from_utf8(&rest[..space])
            .ok()
            .and_then(|s| u32::from_str_radix(s, 8).ok())
            .ok_or_else(|| corrupt("invalid mode"))?;
        rest = &rest[space + 1..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("missing name terminator"))?;
        let name = std::str::from_utf8(&rest[..nul])
            .map_err(|_| corrupt("non-utf8 name"))?
            .to_owned();
        rest = &rest[nul + 1..];
        if rest.len() < 20 {
            return Err(corrupt("truncated entry oid"));
        }
        let mut oid_bytes = [0u8; 20];
        oid_bytes.copy_from_slice(&rest[..20]);
        rest = &rest[20..];
        entries.push(TreeEntry {
            mode,
            name,
            oid: Oid::from_bytes(oid_bytes),
        });
    }
    Ok(Tree { entries })
}

fn parse_commit(oid: Oid, payload: &[u8]) -> Result<Commit, ObjectDatabaseError> {
    let corrupt = |reason: &str| ObjectDatabaseError::Corrupt {
        oid,
        reason: reason.to_owned(),
    };
    let text = std::str::from_utf8(payload).map_err(|_| corrupt("non-utf8 commit"))?;
    let (header, message) = text.split_once("\n\n").ok_or_else(|| corrupt("missing header/message separator"))?;

    let mut tree = None;
    let mut parent = None;
    let mut author = None;
    let mut committer = None;
    for line in header.lines() {
        let (key, value) = line.split_once(' ').ok_or_else(|| corrupt("malformed header line"))?;
        match key {
            "tree" => tree = Some(Oid::from_hex(value).map_err(|_| corrupt("bad tree oid"))?),
            "parent" => parent = Some(Oid::from_hex(value).map_err(|_| corrupt("bad parent oid"))?),
            "author" => author = Some(Signature::parse(value).ok_or_else(|| corrupt("bad author"))?),
            "committer" => {
                committer = Some(Signature::parse(value).ok_or_else(|| corrupt("bad committer"))?)
            }
            _ => {}
        }
    }

    Ok(Commit {
        tree: tree.ok_or_else(|| corrupt("missing tree"))?,
        parent,
        author: author.ok_or_else(|| corrupt("missing author"))?,
        committer: committer.ok_or_else(|| corrupt("missing committer"))?,
        message: message.to_owned(),
    })
}

/// True if `mode` marks a tree entry as a subtree rather than a file.
pub fn is_tree_mode(mode: u32) -> bool {
    mode == TREE_MODE
}
