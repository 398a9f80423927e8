// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/taskmate/taskmate.toml`,
//! `~/.config/taskmate/taskmate.toml`, `./taskmate.toml`, `TASKMATE_*` env vars.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::TaskmateConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/taskmate/taskmate.toml";
pub(crate) const LOCAL_CONFIG: &str = "taskmate.toml";

/// Config sections addressable from the environment.
const ENV_SECTIONS: [&str; 5] = ["bot", "telegram", "storage", "scheduler", "vault"];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskmate").join(LOCAL_CONFIG))
}

/// Build the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TaskmateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<TaskmateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<TaskmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskmateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TaskmateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TaskmateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Environment provider mapping `TASKMATE_<SECTION>_<KEY>` to `section.key`.
///
/// Only the first underscore after the section name is a separator, so
/// `TASKMATE_SCHEDULER_TIMER_INTERVAL_SECS` lands on
/// `scheduler.timer_interval_secs`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("TASKMATE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(
            map_env_key("scheduler_timer_interval_secs"),
            "scheduler.timer_interval_secs"
        );
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }
}
