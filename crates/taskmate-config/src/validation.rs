// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::TaskmateConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration. Collects every error instead of
/// failing fast.
pub fn validate_config(config: &TaskmateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.bot.log_level.to_ascii_lowercase().as_str()) {
        invalid(format!(
            "bot.log_level `{}` must be one of {}",
            config.bot.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".to_string());
    }

    if let Some(token) = &config.telegram.bot_token {
        if token.trim().is_empty() {
            invalid("telegram.bot_token must not be empty when set".to_string());
        }
    }

    let scheduler = &config.scheduler;
    for (name, secs) in [
        ("timer_interval_secs", scheduler.timer_interval_secs),
        ("auto_message_interval_secs", scheduler.auto_message_interval_secs),
        ("birthday_interval_secs", scheduler.birthday_interval_secs),
        ("calendar_interval_secs", scheduler.calendar_interval_secs),
    ] {
        if secs == 0 {
            invalid(format!("scheduler.{name} must be greater than zero"));
        }
    }

    if scheduler.utc_offset_minutes.abs() >= 24 * 60 {
        invalid(format!(
            "scheduler.utc_offset_minutes must be within ±1439, got {}",
            scheduler.utc_offset_minutes
        ));
    }

    if scheduler.timezone_label.trim().is_empty() {
        invalid("scheduler.timezone_label must not be empty".to_string());
    }

    for (name, days) in [
        ("birthday_lead_days", &scheduler.birthday_lead_days),
        ("calendar_lead_days", &scheduler.calendar_lead_days),
    ] {
        let mut seen = HashSet::new();
        for day in days {
            if !seen.insert(day) {
                invalid(format!("scheduler.{name} lists {day} more than once"));
            }
        }
    }

    if let Some(key) = &config.vault.key {
        if key.trim().is_empty() {
            invalid("vault.key must not be empty when set".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
