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

//! Crate-wide error types.
//!
//! Each subsystem gets its own `thiserror`-derived enum; [`Error`] composes
//! them via `#[from]` so callers at the command layer can match on one type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::oid::Oid;

#[derive(Debug, Error)]
pub enum ObjectDatabaseError {
    #[error("failed to read object {oid}")]
    Read { oid: Oid, source: io::Error },
    #[error("failed to write object {oid}")]
    Write { oid: Oid, source: io::Error },
    #[error("object {oid} is corrupt: {reason}")]
    Corrupt { oid: Oid, reason: String },
    #[error("object {oid} has unknown type tag {tag:?}")]
    UnknownType { oid: Oid, tag: String },
}

#[derive(Debug, Error)]
pub enum IndexError {
    /// Another process is holding `index.lock`.
    #[error("could not acquire lock on index: another gitlit process may be running")]
    Busy,
    #[error("index file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("index is not locked for writing")]
    NotLocked,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{path}: no such file or directory")]
    NotFound { path: PathBuf },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum RefsError {
    #[error("could not acquire lock on HEAD")]
    Busy,
    #[error("HEAD is corrupt: {reason}")]
    Corrupt { reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("invalid diff arguments: {0}")]
    InvalidArgs(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ObjectDatabase(#[from] ObjectDatabaseError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Refs(#[from] RefsError),
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error("invalid argument: {0}")]
    InvalidArgs(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
