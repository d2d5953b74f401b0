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

//! Binary, sorted, checksummed staging manifest with lock-file mutual
//! exclusion and in-memory shadowing invariants. Grounded on
//! `app/index/index.go`, with a header-version-offset bug fixed: version is
//! decoded from bytes 4..8, not 5..8.

pub mod entry;

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::instrument;

pub use self::entry::Entry;
use crate::error::IndexError;
use crate::lockfile::LockFile;
use crate::oid::Oid;
use crate::oid::OID_BYTE_LEN;

const SIGNATURE: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;
const HEADER_SIZE: usize = 12;

pub struct Index {
    path: PathBuf,
    entries: BTreeMap<String, Entry>,
    /// directory -> every tracked path that has it as an ancestor.
    parents: HashMap<String, HashSet<String>>,
    changed: bool,
    lockfile: LockFile,
}

impl Index {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            lockfile: LockFile::new(&path),
            path,
            entries: BTreeMap::new(),
            parents: HashMap::new(),
            changed: false,
        }
    }

    pub fn entry_for_path(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// This exact path is staged as a file.
    pub fn is_tracked_file(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// This path is staged as a file, or is an ancestor directory of some
    /// staged file.
    pub fn is_tracked(&self, path: &str) -> bool {
        self.is_tracked_file(path) || self.parents.contains_key(path)
    }

    /// Refreshes one entry's cached stat fields without touching its oid or
    /// path, marking the index dirty so the refreshed cache gets written
    /// back. A performance optimization, invisible externally.
    pub fn refresh_entry_stat(&mut self, path: &str, stat: crate::timestamp::FileStat) {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.update_stat(stat);
            self.changed = true;
        }
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending path order (free: backed by a `BTreeMap`).
    pub fn sorted_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Inserts or replaces the entry for `path`, resolving shadowing first.
    #[instrument(skip(self, entry))]
    pub fn add(&mut self, entry: Entry) {
        self.discard_conflicts(&entry);
        self.store_entry(entry);
        self.changed = true;
    }

    /// Enforces "no path is a proper directory-prefix of another": removes
    /// any existing entry at one of `entry`'s ancestor directories, then
    /// removes any existing entry that has `entry`'s own path as an
    /// ancestor.
    fn discard_conflicts(&mut self, entry: &Entry) {
        for dir in entry.parent_directories() {
            self.remove_entry(&dir);
        }
        if let Some(descendants) = self.parents.get(&entry.path).cloned() {
            for descendant in descendants {
                self.remove_entry(&descendant);
            }
        }
    }

    fn remove_entry(&mut self, path: &str) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };
        for dir in entry.parent_directories() {
            if let Some(set) = self.parents.get_mut(&dir) {
                set.remove(path);
                if set.is_empty() {
                    self.parents.remove(&dir);
                }
            }
        }
    }

    fn store_entry(&mut self, entry: Entry) {
        for dir in entry.parent_directories() {
            self.parents.entry(dir).or_default().insert(entry.path.clone());
        }
        self.entries.insert(entry.path.clone(), entry);
    }

    /// Acquires the index lock, then loads. Returns `Err(IndexError::Busy)`
    /// without mutating anything if the lock is already held.
    #[instrument(skip(self))]
    pub fn load_for_update(&mut self) -> Result<(), IndexError> {
        if !self.lockfile.hold_for_update()? {
            return Err(IndexError::Busy);
        }
        self.load()
    }

    #[instrument(skip(self))]
    pub fn load(&mut self) -> Result<(), IndexError> {
        self.entries.clear();
        self.parents.clear();
        self.changed = false;

        let Ok(bytes) = std::fs::read(&self.path) else {
            return Ok(());
        };
        if bytes.len() < HEADER_SIZE + OID_BYTE_LEN {
            return Err(IndexError::Corrupt {
                path: self.path.clone(),
                reason: "file shorter than header + checksum".to_owned(),
            });
        }

        let (checked, trailer) = bytes.split_at(bytes.len() - OID_BYTE_LEN);
        let actual: [u8; OID_BYTE_LEN] = {
            use sha1::Digest as _;
            let mut hasher = sha1::Sha1::new();
            hasher.update(checked);
            hasher.finalize().into()
        };
        if actual.as_slice() != trailer {
            return Err(IndexError::Corrupt {
                path: self.path.clone(),
                reason: "trailing checksum mismatch".to_owned(),
            });
        }

        let signature = &checked[0..4];
        if signature != SIGNATURE.as_slice() {
            return Err(IndexError::Corrupt {
                path: self.path.clone(),
                reason: format!("expected signature {SIGNATURE:?}, got {signature:?}"),
            });
        }
        let version = u32::from_be_bytes(checked[4..8].try_into().unwrap());
        if version != VERSION {
            return Err(IndexError::Corrupt {
                path: self.path.clone(),
                reason: format!("expected version {VERSION}, got {version}"),
            });
        }
        let count = u32::from_be_bytes(checked[8..12].try_into().unwrap()) as usize;

        let mut rest = &checked[HEADER_SIZE..];
        for _ in 0..count {
            let (entry, consumed) = Entry::parse(rest).ok_or_else(|| IndexError::Corrupt {
                path: self.path.clone(),
                reason: "truncated entry record".to_owned(),
            })?;
            rest = &rest[consumed..];
            self.store_entry(entry);
        }

        debug!(count, path = %self.path.display(), "loaded index");
        Ok(())
    }

    /// Writes header + sorted entries + trailing checksum if dirty, then
    /// commits the lockfile. Returns `false` (and releases the lock without
    /// writing) if nothing changed.
    #[instrument(skip(self))]
    pub fn write_updates(&mut self) -> Result<bool, IndexError> {
        if !self.changed {
            self.lockfile.rollback()?;
            return Ok(false);
        }

        let mut body = Vec::new();
        body.extend_from_slice(SIGNATURE);
        body.extend_from_slice(&VERSION.to_be_bytes());
        body.extend_from_slice(&(self.entries.len() as u32).to_be_bytes());
        for entry in self.entries.values() {
            body.extend_from_slice(&entry.to_bytes());
        }

        let checksum: [u8; OID_BYTE_LEN] = {
            use sha1::Digest as _;
            let mut hasher = sha1::Sha1::new();
            hasher.update(&body);
            hasher.finalize().into()
        };
        body.extend_from_slice(&checksum);

        self.lockfile.write(&body)?;
        self.lockfile.commit()?;
        self.changed = false;
        Ok(true)
    }

    /// Abandons any pending writes without touching the on-disk index.
    pub fn release_lock(&mut self) -> Result<(), IndexError> {
        Ok(self.lockfile.rollback()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
