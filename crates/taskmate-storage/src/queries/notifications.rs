// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom notifications. Stored for the user; the scheduler never reads them.

use chrono::{DateTime, Utc};
use taskmate_core::records::CustomNotification;
use taskmate_core::{TaskmateError, UserId};
use uuid::Uuid;

use super::require_text;
use crate::RecordStore;

pub async fn add_notification(
    store: &RecordStore,
    user: UserId,
    trigger: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<CustomNotification, TaskmateError> {
    let notification = CustomNotification {
        id: Uuid::new_v4(),
        user_id: user,
        trigger: require_text("trigger", trigger)?,
        message: require_text("message", message)?,
        created_at: now,
    };
    store.append(&notification).await?;
    Ok(notification)
}

pub async fn list_notifications(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<CustomNotification>, TaskmateError> {
    store.load_for(user).await
}

pub async fn delete_notification(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
) -> Result<bool, TaskmateError> {
    store.delete_by_key::<CustomNotification>(user, id).await
}
