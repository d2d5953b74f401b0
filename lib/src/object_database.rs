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

//! Content-addressed object storage: serialize, hash, deflate, persist.
//!
//! Grounded on `app/database.go`'s `Load`/`Store`/`writeObject`/`objectPath`.
//! Durability uses the atomic-rename-via-temp-file pattern already provided
//! by `file_util::persist_content_addressed_temp_file`, reused here rather
//! than hand-rolled since that helper already ties itself to
//! content-addressed writes specifically.

use std::collections::HashMap;
use std::io::Read as _;
use std::io::Write as _;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::debug;
use tracing::instrument;
use tracing::trace;

use crate::error::ObjectDatabaseError;
use crate::file_util;
use crate::objects::Object;
use crate::oid::Oid;

/// Bounds the in-process object cache so a single status/diff invocation
/// that revisits the same tree repeatedly doesn't re-read and re-inflate
/// it, without letting a large repository's working set grow unbounded.
const CACHE_CAPACITY: usize = 256;

pub struct ObjectDatabase {
    path: PathBuf,
    cache: Mutex<HashMap<Oid, Arc<Object>>>,
}

impl ObjectDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Cheap existence probe: stats the object's path without inflating it.
    #[instrument(skip(self))]
    pub fn exists(&self, oid: Oid) -> bool {
        if self.cache.lock().unwrap().contains_key(&oid) {
            return true;
        }
        self.object_path(oid).is_file()
    }

    /// Hashes and persists `object`, unless an object with that content
    /// already exists (content-addressing makes duplicate writes a no-op).
    #[instrument(skip(self, object))]
    pub fn store(&self, object: Object) -> Result<Oid, ObjectDatabaseError> {
        let bytes = object.canonical_bytes();
        let oid = object.hash();
        let path = self.object_path(oid);
        if path.is_file() {
            trace!(%oid, "object already exists, skipping write");
            self.cache.lock().unwrap().insert(oid, Arc::new(object));
            return Ok(oid);
        }

        let dir = path.parent().expect("object path always has a parent");
        file_util::create_or_reuse_dir(dir).map_err(|source| ObjectDatabaseError::Write {
            oid,
            source,
        })?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&bytes)
            .map_err(|source| ObjectDatabaseError::Write { oid, source })?;
        let compressed = encoder
            .finish()
            .map_err(|source| ObjectDatabaseError::Write { oid, source })?;

        let mut temp_file =
            tempfile::NamedTempFile::new_in(dir).map_err(|source| ObjectDatabaseError::Write { oid, source })?;
        temp_file
            .write_all(&compressed)
            .map_err(|source| ObjectDatabaseError::Write { oid, source })?;
        file_util::persist_content_addressed_temp_file(temp_file, &path)
            .map_err(|source| ObjectDatabaseError::Write { oid, source })?;

        debug!(%oid, object_type = object.type_tag(), "stored object");
        self.cache.lock().unwrap().insert(oid, Arc::new(object));
        Ok(oid)
    }

    /// Reads, inflates, and parses the object named by `oid`, consulting (and
    /// populating) the in-process cache first.
    #[instrument(skip(self))]
    pub fn load(&self, oid: Oid) -> Result<Arc<Object>, ObjectDatabaseError> {
        if let Some(object) = self.cache.lock().unwrap().get(&oid) {
            trace!(%oid, "object cache hit");
            return Ok(Arc::clone(object));
        }

        let path = self.object_path(oid);
        let compressed = std::fs::read(&path).map_err(|source| ObjectDatabaseError::Read { oid, source })?;
        let mut decoder = ZlibDecoder::new(&compressed[..]);
        let mut contents = Vec::new();
        decoder
            .read_to_end(&mut contents)
            .map_err(|source| ObjectDatabaseError::Read { oid, source })?;

        let space = contents
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| ObjectDatabaseError::Corrupt {
                oid,
                reason: "missing type/length separator".to_owned(),
            })?;
        let nul = contents
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ObjectDatabaseError::Corrupt {
                oid,
                reason: "missing header terminator".to_owned(),
            })?;
        let type_tag = std::str::from_utf8(&contents[..space]).map_err(|_| ObjectDatabaseError::Corrupt {
            oid,
            reason: "non-utf8 type tag".to_owned(),
        })?;
        let object = Object::parse(oid, type_tag, &contents[nul + 1..])?;

        let object = Arc::new(object);
        let mut cache = self.cache.lock().unwrap();
        if cache.len() >= CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(oid, Arc::clone(&object));
        Ok(object)
    }

    fn object_path(&self, oid: Oid) -> PathBuf {
        let hex = oid.to_hex();
        self.path.join(&hex[..2]).join(&hex[2..])
    }
}

pub fn objects_dir(git_dir: &Path) -> PathBuf {
    git_dir.join("objects")
}
