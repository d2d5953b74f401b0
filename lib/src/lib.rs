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

//! Local repository layer for a minimal, Git-like version-control system:
//! a content-addressed object database, a staged-changes index, a
//! working-tree scanner, and a Myers diff engine.
//!
//! Command dispatch, argument parsing, and output formatting live in the
//! `gitlit` binary crate instead.

pub mod diff;
pub mod error;
pub mod file_util;
pub mod index;
pub mod lockfile;
pub mod object_database;
pub mod objects;
pub mod oid;
pub mod refs;
pub mod repo_path;
pub mod status;
pub mod timestamp;
pub mod tree_builder;
pub mod workspace;

pub use crate::error::Error;
pub use crate::error::Result;
