// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-entity operations used by command handlers and the scheduler.
//!
//! Positional operations take the 1-based index a user saw in a listing
//! of their own records.

pub mod auto_messages;
pub mod birthdays;
pub mod calendar;
pub mod expenses;
pub mod goals;
pub mod notes;
pub mod notifications;
pub mod passwords;
pub mod reminders;
pub mod tasks;
pub mod timers;

use taskmate_core::{Collection, TaskmateError};

pub(crate) fn index_not_found(collection: Collection, index: usize) -> TaskmateError {
    TaskmateError::NotFound {
        collection,
        detail: format!("no entry #{index}"),
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String, TaskmateError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TaskmateError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}
