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

//! Maps library and CLI-layer failures to an exit code: 0 for success, 1
//! for anything else. One error type at the command boundary; the entry
//! point prints and converts, never the library.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Lib(#[from] gitlit_lib::Error),
    #[error("{0}")]
    Cli(String),
}

impl CommandError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

pub fn user_error(message: impl fmt::Display) -> CommandError {
    CommandError::Cli(message.to_string())
}
