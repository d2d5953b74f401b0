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

//! `init [path]`: create `.git/{objects,refs}` and nothing else. Grounded on
//! `app/cmd/jit/init.go`'s `RunInitCmd`.

use std::path::PathBuf;

use clap::Args;
use tracing::instrument;

use crate::command_error::CommandError;
use crate::repo::Repo;
use crate::ui::Ui;

#[derive(Args, Clone, Debug)]
pub struct InitArgs {
    /// Directory to create the repository in (defaults to the current
    /// directory).
    pub path: Option<PathBuf>,
}

#[instrument(skip(ui))]
pub fn run(ui: &mut Ui, args: &InitArgs) -> Result<(), CommandError> {
    let cwd = std::env::current_dir().map_err(|e| CommandError::Cli(e.to_string()))?;
    let root = match &args.path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => cwd,
    };
    std::fs::create_dir_all(&root).map_err(|e| CommandError::Cli(format!("{}: {e}", root.display())))?;

    let git_dir = Repo::git_dir_for(&root);
    for dir_name in ["objects", "refs"] {
        std::fs::create_dir_all(git_dir.join(dir_name))
            .map_err(|e| CommandError::Cli(format!("{}: {e}", git_dir.join(dir_name).display())))?;
    }

    ui.println_stdout(&format!("Initialized empty gitlit repository in {}", git_dir.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_objects_and_refs_under_git_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut ui = Ui::for_test(Box::new(Vec::new()), Box::new(Vec::new()));
        let args = InitArgs {
            path: Some(dir.path().to_path_buf()),
        };
        run(&mut ui, &args).unwrap();
        assert!(dir.path().join(".git/objects").is_dir());
        assert!(dir.path().join(".git/refs").is_dir());
    }
}
