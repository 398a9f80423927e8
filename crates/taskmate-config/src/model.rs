// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so misspelled keys fail
//! at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Taskmate configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TaskmateConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram Bot API credentials.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Record store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Notification scheduler settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Password encryption settings.
    #[serde(default)]
    pub vault: VaultConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "taskmate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. Falls back to `TELEGRAM_TOKEN` when unset.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// SQLite record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable write-ahead logging.
    #[serde(default = "default_true")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
        }
    }
}

fn default_database_path() -> String {
    "taskmate.db".to_string()
}

/// Notification scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Start the scan loops when serving.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_minute_interval")]
    pub timer_interval_secs: u64,

    #[serde(default = "default_minute_interval")]
    pub auto_message_interval_secs: u64,

    #[serde(default = "default_hour_interval")]
    pub birthday_interval_secs: u64,

    #[serde(default = "default_hour_interval")]
    pub calendar_interval_secs: u64,

    /// Local display timezone, minutes east of UTC.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Suffix printed after local times in notifications.
    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,

    /// Days before a birthday on which to notify.
    #[serde(default = "default_birthday_lead_days")]
    pub birthday_lead_days: Vec<u32>,

    /// Days before a calendar event on which to notify.
    #[serde(default = "default_calendar_lead_days")]
    pub calendar_lead_days: Vec<u32>,

    /// Record delivery markers so a condition notifies once instead of
    /// on every tick.
    #[serde(default = "default_true")]
    pub deduplicate: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timer_interval_secs: default_minute_interval(),
            auto_message_interval_secs: default_minute_interval(),
            birthday_interval_secs: default_hour_interval(),
            calendar_interval_secs: default_hour_interval(),
            utc_offset_minutes: default_utc_offset_minutes(),
            timezone_label: default_timezone_label(),
            birthday_lead_days: default_birthday_lead_days(),
            calendar_lead_days: default_calendar_lead_days(),
            deduplicate: true,
        }
    }
}

fn default_minute_interval() -> u64 {
    60
}

fn default_hour_interval() -> u64 {
    3600
}

fn default_utc_offset_minutes() -> i32 {
    taskmate_core::clock::IST_OFFSET_MINUTES
}

fn default_timezone_label() -> String {
    "IST".to_string()
}

fn default_birthday_lead_days() -> Vec<u32> {
    vec![7, 3, 1, 0]
}

fn default_calendar_lead_days() -> Vec<u32> {
    vec![7, 1, 0]
}

/// Password vault configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Base64 AES-256 key. Falls back to `ENCRYPTION_KEY`, then to an
    /// ephemeral key that does not survive restarts.
    #[serde(default)]
    pub key: Option<String>,
}

fn default_true() -> bool {
    true
}
