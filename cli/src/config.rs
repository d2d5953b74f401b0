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

//! `.git/config`-style TOML, read once per invocation. Absence is not an
//! error; every field has a default. The library itself never touches this
//! file or the environment — only this CLI layer does.

use std::path::Path;

use toml_edit::DocumentMut;

use crate::command_error::CommandError;

#[derive(Debug, Clone)]
pub struct UserConfig {
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    /// Overrides the diff engine's hunk `CONTEXT` constant.
    pub diff_context: usize,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            author_name: None,
            author_email: None,
            diff_context: gitlit_lib::diff::CONTEXT,
        }
    }
}

/// Loads `<git_dir>/config` if present, falling back to defaults for any
/// field the file doesn't set. A missing or empty file is not an error.
pub fn load(git_dir: &Path) -> Result<UserConfig, CommandError> {
    let mut config = UserConfig::default();
    let path = git_dir.join("config");
    let Ok(text) = std::fs::read_to_string(&path) else {
        return Ok(config);
    };

    let doc: DocumentMut = text
        .parse()
        .map_err(|err| CommandError::Cli(format!("{}: invalid config: {err}", path.display())))?;

    if let Some(user) = doc.get("user").and_then(|item| item.as_table()) {
        if let Some(name) = user.get("name").and_then(|v| v.as_str()) {
            config.author_name = Some(name.to_owned());
        }
        if let Some(email) = user.get("email").and_then(|v| v.as_str()) {
            config.author_email = Some(email.to_owned());
        }
    }
    if let Some(context) = doc
        .get("core")
        .and_then(|item| item.as_table())
        .and_then(|core| core.get("context"))
        .and_then(|v| v.as_integer())
    {
        config.diff_context = context.max(0) as usize;
    }

    Ok(config)
}
