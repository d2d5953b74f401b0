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

//! A single staged-file record and its byte-exact binary layout.
//!
//! Grounded on `app/index/entry.go`, with two format bugs fixed:
//! - `times_match` (the source's `TimeMatches`) compares all four of
//!   ctime_sec/ctime_nsec/mtime_sec/mtime_nsec; the source compares
//!   mtime_nsec against `MtimeSec` by mistake.
//! - ctime/mtime fields serialize as native big-endian `u32`s, not as a hex
//!   string that's hex-decoded back into bytes (which produces different
//!   bytes than big-endian encoding whenever a field doesn't fit the
//!   coincidental hex-digit-per-nibble shape the source relies on).

use crate::oid::Oid;
use crate::oid::OID_BYTE_LEN;
use crate::timestamp::FileStat;

/// Fixed-size portion of an entry: 10 u32 fields + a 20-byte oid + a u16.
pub const FIXED_SIZE: usize = 10 * 4 + OID_BYTE_LEN + 2;
pub const ENTRY_BLOCK_SIZE: usize = 8;
pub const MAX_PATH_SIZE: usize = 0xfff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub ctime_sec: u32,
    pub ctime_nsec: u32,
    pub mtime_sec: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
    pub oid: Oid,
    pub path: String,
}

impl Entry {
    pub fn new(path: String, oid: Oid, stat: FileStat) -> Self {
        Self {
            ctime_sec: stat.ctime_sec,
            ctime_nsec: stat.ctime_nsec,
            mtime_sec: stat.mtime_sec,
            mtime_nsec: stat.mtime_nsec,
            dev: stat.dev,
            ino: stat.ino,
            mode: stat.mode,
            uid: stat.uid,
            gid: stat.gid,
            size: stat.size,
            oid,
            path,
        }
    }

    /// Proper ancestor directories, root-to-leaf, e.g. `a/b/c.txt` ->
    /// `["a", "a/b"]`.
    pub fn parent_directories(&self) -> Vec<String> {
        let mut result = Vec::new();
        let mut prefix = String::new();
        let components: Vec<&str> = self.path.split('/').collect();
        for component in &components[..components.len().saturating_sub(1)] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(component);
            result.push(prefix.clone());
        }
        result
    }

    /// Mode and (when nonzero) size agree with a freshly-stat'd file.
    pub fn stat_matches(&self, stat: &FileStat) -> bool {
        self.mode == stat.mode && (self.size == 0 || self.size == stat.size)
    }

    /// All four timestamp fields agree with a freshly-stat'd file.
    pub fn times_match(&self, stat: &FileStat) -> bool {
        stat.times_match(self.ctime_sec, self.ctime_nsec, self.mtime_sec, self.mtime_nsec)
    }

    pub fn update_stat(&mut self, stat: FileStat) {
        self.ctime_sec = stat.ctime_sec;
        self.ctime_nsec = stat.ctime_nsec;
        self.mtime_sec = stat.mtime_sec;
        self.mtime_nsec = stat.mtime_nsec;
        self.dev = stat.dev;
        self.ino = stat.ino;
        self.mode = stat.mode;
        self.uid = stat.uid;
        self.gid = stat.gid;
        self.size = stat.size;
    }

    /// Serializes to the on-disk record: fixed fields, oid, flags, then the
    /// NUL-terminated path padded to the next 8-byte boundary.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FIXED_SIZE + self.path.len() + 8);
        out.extend_from_slice(&self.ctime_sec.to_be_bytes());
        out.extend_from_slice(&self.ctime_nsec.to_be_bytes());
        out.extend_from_slice(&self.mtime_sec.to_be_bytes());
        out.extend_from_slice(&self.mtime_nsec.to_be_bytes());
        out.extend_from_slice(&self.dev.to_be_bytes());
        out.extend_from_slice(&self.ino.to_be_bytes());
        out.extend_from_slice(&self.mode.to_be_bytes());
        out.extend_from_slice(&self.uid.to_be_bytes());
        out.extend_from_slice(&self.gid.to_be_bytes());
        out.extend_from_slice(&self.size.to_be_bytes());
        out.extend_from_slice(self.oid.as_bytes());
        let flags = self.path.len().min(MAX_PATH_SIZE) as u16;
        out.extend_from_slice(&flags.to_be_bytes());
        out.extend_from_slice(self.path.as_bytes());
        out.push(0);
        while out.len() % ENTRY_BLOCK_SIZE != 0 {
            out.push(0);
        }
        out
    }

    /// Parses one entry starting at offset 0 of `data`, returning the entry
    /// and the number of bytes consumed (always a multiple of 8).
    pub fn parse(data: &[u8]) -> Option<(Self, usize)> {
        if data.len() < FIXED_SIZE {
            return None;
        }
        let u32_at = |off: usize| u32::from_be_bytes(data[off..off + 4].try_into().unwrap());
        let ctime_sec = u32_at(0);
        let ctime_nsec = u32_at(4);
        let mtime_sec = u32_at(8);
        let mtime_nsec = u32_at(12);
        let dev = u32_at(16);
        let ino = u32_at(20);
        let mode = u32_at(24);
        let uid = u32_at(28);
        let gid = u32_at(32);
        let size = u32_at(36);
        let mut oid_bytes = [0u8; OID_BYTE_LEN];
        oid_bytes.copy_from_slice(&data[40..60]);
        let oid = Oid::from_bytes(oid_bytes);

        let path_start = FIXED_SIZE;
        let nul = data[path_start..].iter().position(|&b| b == 0)?;
        let path = std::str::from_utf8(&data[path_start..path_start + nul]).ok()?.to_owned();

        let mut total = path_start + nul + 1;
        while total % ENTRY_BLOCK_SIZE != 0 {
            total += 1;
        }
        if data.len() < total {
            return None;
        }

        Some((
            Self {
                ctime_sec,
                ctime_nsec,
                mtime_sec,
                mtime_nsec,
                dev,
                ino,
                mode,
                uid,
                gid,
                size,
                oid,
                path,
            },
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            ctime_sec: 1,
            ctime_nsec: 2,
            mtime_sec: 3,
            mtime_nsec: 4,
            dev: 5,
            ino: 6,
            mode: 0o100644,
            uid: 7,
            gid: 8,
            size: 9,
            oid: Oid::from_hex("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0").unwrap(),
            path: "hello.txt".to_owned(),
        }
    }

    #[test]
    fn serialize_then_parse_roundtrips() {
        let entry = sample_entry();
        let bytes = entry.to_bytes();
        assert_eq!(bytes.len() % ENTRY_BLOCK_SIZE, 0);
        let (parsed, consumed) = Entry::parse(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(parsed, entry);
    }

    #[test]
    fn times_match_checks_all_four_fields() {
        let entry = sample_entry();
        let mut stat = FileStat {
            ctime_sec: 1,
            ctime_nsec: 2,
            mtime_sec: 3,
            mtime_nsec: 4,
            ..Default::default()
        };
        assert!(entry.times_match(&stat));
        stat.mtime_nsec = 99;
        assert!(!entry.times_match(&stat));
    }

    #[test]
    fn parent_directories_root_to_leaf() {
        let mut entry = sample_entry();
        entry.path = "a/b/c.txt".to_owned();
        assert_eq!(entry.parent_directories(), vec!["a".to_owned(), "a/b".to_owned()]);
    }
}
