// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dated calendar events.

use chrono::{DateTime, NaiveDate, Utc};
use taskmate_core::calendar::parse_event_date;
use taskmate_core::records::CalendarEvent;
use taskmate_core::{Collection, TaskmateError, UserId};
use uuid::Uuid;

use super::{index_not_found, require_text};
use crate::RecordStore;

pub async fn add_event(
    store: &RecordStore,
    user: UserId,
    date: &str,
    event: &str,
    now: DateTime<Utc>,
) -> Result<CalendarEvent, TaskmateError> {
    let record = CalendarEvent {
        id: Uuid::new_v4(),
        user_id: user,
        date: parse_event_date(date)?.format("%Y-%m-%d").to_string(),
        event: require_text("event", event)?,
        created_at: now,
        notified_on: None,
    };
    store.append(&record).await?;
    Ok(record)
}

pub async fn list_events(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<CalendarEvent>, TaskmateError> {
    store.load_for(user).await
}

pub async fn delete_event(
    store: &RecordStore,
    user: UserId,
    index: usize,
) -> Result<CalendarEvent, TaskmateError> {
    store
        .delete_at(user, index)
        .await?
        .ok_or_else(|| index_not_found(Collection::Calendar, index))
}

/// Record the local date a lead-time notification for `id` went out.
pub async fn mark_notified(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
    on: NaiveDate,
) -> Result<bool, TaskmateError> {
    store
        .update_by_key(user, id, move |e: &mut CalendarEvent| e.notified_on = Some(on))
        .await
}
