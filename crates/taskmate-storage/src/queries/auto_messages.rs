// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily recurring messages.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use taskmate_core::clock::parse_local_time;
use taskmate_core::records::{AutoMessage, Reminder};
use taskmate_core::{LocalZone, TaskmateError, UserId};
use uuid::Uuid;

use super::require_text;
use crate::RecordStore;

/// Normalizes a user-entered `H:MM`/`HH:MM` into zero-padded `HH:MM`.
pub fn normalize_hhmm(input: &str) -> Result<String, TaskmateError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| TaskmateError::InvalidInput(format!("`{input}` is not a HH:MM time")))
}

/// Schedule a daily message at local `time`, and a reminder for its first
/// occurrence.
pub async fn schedule_auto_message(
    store: &RecordStore,
    zone: &LocalZone,
    user: UserId,
    time: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<AutoMessage, TaskmateError> {
    let time = normalize_hhmm(time)?;
    let message = require_text("auto message", message)?;
    let first = parse_local_time(&time, zone, now)?;

    let auto = AutoMessage {
        id: Uuid::new_v4(),
        user_id: user,
        time,
        message,
        active: true,
        last_sent_on: None,
    };
    store.append(&auto).await?;
    store
        .append(&Reminder {
            id: Uuid::new_v4(),
            user_id: user,
            time: first,
            message: auto.message.clone(),
        })
        .await?;
    Ok(auto)
}

pub async fn list_auto_messages(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<AutoMessage>, TaskmateError> {
    store.load_for(user).await
}

/// Stop a daily message from firing. Returns `false` if it does not exist.
pub async fn deactivate_auto_message(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
) -> Result<bool, TaskmateError> {
    store
        .update_by_key(user, id, |m: &mut AutoMessage| m.active = false)
        .await
}

/// Record the local date on which `id` was delivered.
pub async fn mark_sent(
    store: &RecordStore,
    id: Uuid,
    on: NaiveDate,
) -> Result<bool, TaskmateError> {
    store
        .update_where(
            move |m: &AutoMessage| m.id == id,
            move |m: &mut AutoMessage| m.last_sent_on = Some(on),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::open_store;
    use chrono::TimeZone;

    #[test]
    fn hhmm_is_zero_padded() {
        assert_eq!(normalize_hhmm("9:05").unwrap(), "09:05");
        assert_eq!(normalize_hhmm("23:59").unwrap(), "23:59");
        assert!(normalize_hhmm("24:00").is_err());
        assert!(normalize_hhmm("nine").is_err());
    }

    #[tokio::test]
    async fn schedule_stores_first_occurrence_reminder() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let zone = LocalZone::ist();
        // 10:00 IST; 09:00 already passed so the first run is tomorrow.
        let now = Utc.with_ymd_and_hms(2025, 3, 13, 4, 30, 0).unwrap();

        let auto = schedule_auto_message(&store, &zone, UserId(2), "9:00", "stand up", now)
            .await
            .unwrap();
        assert_eq!(auto.time, "09:00");

        let reminders: Vec<Reminder> = store.load_for(UserId(2)).await.unwrap();
        assert_eq!(
            reminders[0].time,
            Utc.with_ymd_and_hms(2025, 3, 14, 3, 30, 0).unwrap()
        );

        assert!(deactivate_auto_message(&store, UserId(2), auto.id).await.unwrap());
        assert!(!list_auto_messages(&store, UserId(2)).await.unwrap()[0].active);
        assert!(!deactivate_auto_message(&store, UserId(3), auto.id).await.unwrap());
    }
}
