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

//! The subcommand surface: init, add, commit, status, diff. Each variant's
//! handler lives in its own module; this file only dispatches.

pub mod add;
pub mod commit;
pub mod diff;
pub mod init;
pub mod status;

use clap::Subcommand;

use crate::command_error::CommandError;
use crate::ui::Ui;

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Create an empty repository.
    Init(init::InitArgs),
    /// Stage files for the next commit.
    Add(add::AddArgs),
    /// Record a snapshot of the staged changes.
    Commit(commit::CommitArgs),
    /// Show staged and unstaged changes.
    Status(status::StatusArgs),
    /// Show changes between the index, HEAD, and the workspace.
    Diff(diff::DiffArgs),
}

impl Command {
    pub fn run(&self, ui: &mut Ui) -> Result<(), CommandError> {
        match self {
            Command::Init(args) => init::run(ui, args),
            Command::Add(args) => add::run(ui, args),
            Command::Commit(args) => commit::run(ui, args),
            Command::Status(args) => status::run(ui, args),
            Command::Diff(args) => diff::run(ui, args),
        }
    }
}
