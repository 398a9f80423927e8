// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot reminders.

use chrono::{DateTime, Utc};
use taskmate_core::records::Reminder;
use taskmate_core::{Collection, TaskmateError, UserId};
use uuid::Uuid;

use super::{index_not_found, require_text};
use crate::RecordStore;

pub async fn add_reminder(
    store: &RecordStore,
    user: UserId,
    time: DateTime<Utc>,
    message: &str,
) -> Result<Reminder, TaskmateError> {
    let reminder = Reminder {
        id: Uuid::new_v4(),
        user_id: user,
        time,
        message: require_text("reminder message", message)?,
    };
    store.append(&reminder).await?;
    Ok(reminder)
}

pub async fn list_reminders(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<Reminder>, TaskmateError> {
    store.load_for(user).await
}

/// Reminders whose fire time is still in the future. Past reminders stay
/// stored but drop out of this view.
pub async fn active_reminders(
    store: &RecordStore,
    user: UserId,
    now: DateTime<Utc>,
) -> Result<Vec<Reminder>, TaskmateError> {
    let mut reminders = list_reminders(store, user).await?;
    reminders.retain(|r| r.time > now);
    Ok(reminders)
}

pub async fn edit_reminder(
    store: &RecordStore,
    user: UserId,
    index: usize,
    message: &str,
) -> Result<Reminder, TaskmateError> {
    let message = require_text("reminder message", message)?;
    store
        .update_at(user, index, move |r: &mut Reminder| r.message = message)
        .await?
        .ok_or_else(|| index_not_found(Collection::Reminders, index))
}

pub async fn delete_reminder(
    store: &RecordStore,
    user: UserId,
    index: usize,
) -> Result<Reminder, TaskmateError> {
    store
        .delete_at(user, index)
        .await?
        .ok_or_else(|| index_not_found(Collection::Reminders, index))
}
