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

//! Filesystem metadata snapshot used by index entries and the status engine.

use std::fs::Metadata;
#[cfg(unix)]
use std::os::unix::fs::MetadataExt as _;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt as _;

pub const REGULAR_MODE: u32 = 0o100644;
pub const EXECUTABLE_MODE: u32 = 0o100755;
pub const TREE_MODE: u32 = 0o040000;

/// The subset of `stat(2)` fields the index cares about, each truncated to
/// 32 bits to match the on-disk entry format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
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
}

impl FileStat {
    #[cfg(unix)]
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            ctime_sec: meta.ctime() as u32,
            ctime_nsec: meta.ctime_nsec() as u32,
            mtime_sec: meta.mtime() as u32,
            mtime_nsec: meta.mtime_nsec() as u32,
            dev: meta.dev() as u32,
            ino: meta.ino() as u32,
            mode: mode_for(meta),
            uid: meta.uid(),
            gid: meta.gid(),
            size: meta.size() as u32,
        }
    }

    /// Mode/size agree with an entry built from a fresh `stat`.
    pub fn matches_entry_stat(&self, mode: u32, size: u32) -> bool {
        self.mode == mode && self.size == size
    }

    /// All four of ctime_sec/ctime_nsec/mtime_sec/mtime_nsec match an entry's
    /// recorded timestamps. The original implementation this is grounded on
    /// compares mtime_nsec against the ctime_sec field instead, a bug; this
    /// compares all four fields correctly.
    pub fn times_match(
        &self,
        ctime_sec: u32,
        ctime_nsec: u32,
        mtime_sec: u32,
        mtime_nsec: u32,
    ) -> bool {
        self.ctime_sec == ctime_sec
            && self.ctime_nsec == ctime_nsec
            && self.mtime_sec == mtime_sec
            && self.mtime_nsec == mtime_nsec
    }
}

#[cfg(unix)]
fn mode_for(meta: &Metadata) -> u32 {
    if meta.permissions().mode() & 0o111 != 0 {
        EXECUTABLE_MODE
    } else {
        REGULAR_MODE
    }
}
