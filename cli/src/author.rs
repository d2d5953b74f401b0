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

//! Author/committer identity sourcing: `GIT_AUTHOR_NAME`/`GIT_AUTHOR_EMAIL`,
//! then the configured default, then the OS user via `whoami`. Author and
//! committer are always the same signature, so there is no separate
//! `GIT_COMMITTER_*` lookup. The library core only consumes the resolved
//! signature, not how it was sourced.

use chrono::Local;
use gitlit_lib::objects::Signature;

use crate::config::UserConfig;

fn resolve_name(env_var: &str, config_default: &Option<String>) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| config_default.clone())
        .unwrap_or_else(whoami::realname)
}

fn resolve_email(env_var: &str, config_default: &Option<String>) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|s| !s.is_empty())
        .or_else(|| config_default.clone())
        .unwrap_or_else(|| format!("{}@{}", whoami::username(), whoami::fallible::hostname().unwrap_or_else(|_| "localhost".to_owned())))
}

/// Author and committer are always identical in this implementation; there
/// is no `commit --author` override.
pub fn signature(config: &UserConfig) -> Signature {
    let name = resolve_name("GIT_AUTHOR_NAME", &config.author_name);
    let email = resolve_email("GIT_AUTHOR_EMAIL", &config.author_email);
    Signature {
        name,
        email,
        timestamp: Local::now().fixed_offset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_take_priority_over_config() {
        // SAFETY: test-only, single-threaded within this process's test harness.
        unsafe {
            std::env::set_var("GIT_AUTHOR_NAME", "Env Name");
            std::env::set_var("GIT_AUTHOR_EMAIL", "env@example.com");
        }
        let config = UserConfig {
            author_name: Some("Config Name".to_owned()),
            author_email: Some("config@example.com".to_owned()),
            ..UserConfig::default()
        };
        let sig = signature(&config);
        unsafe {
            std::env::remove_var("GIT_AUTHOR_NAME");
            std::env::remove_var("GIT_AUTHOR_EMAIL");
        }
        assert_eq!(sig.name, "Env Name");
        assert_eq!(sig.email, "env@example.com");
    }
}
