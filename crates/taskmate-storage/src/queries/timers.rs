// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Countdown timers.

use chrono::{DateTime, TimeDelta, Utc};
use taskmate_core::records::{Reminder, Timer};
use taskmate_core::{TaskmateError, UserId};
use uuid::Uuid;

use crate::RecordStore;

/// Text of the reminder stored alongside every timer.
pub const TIMER_REMINDER_TEXT: &str = "⏰ Timer finished!";

/// Start a timer ending `minutes` from `now`, plus a companion reminder at
/// the end instant.
pub async fn start_timer(
    store: &RecordStore,
    user: UserId,
    minutes: u32,
    now: DateTime<Utc>,
) -> Result<Timer, TaskmateError> {
    if minutes == 0 {
        return Err(TaskmateError::InvalidInput(
            "timer duration must be at least one minute".to_string(),
        ));
    }

    let timer = Timer {
        id: Uuid::new_v4(),
        user_id: user,
        end_time: now + TimeDelta::minutes(i64::from(minutes)),
        duration: minutes,
        fired: false,
    };
    store.append(&timer).await?;
    store
        .append(&Reminder {
            id: Uuid::new_v4(),
            user_id: user,
            time: timer.end_time,
            message: TIMER_REMINDER_TEXT.to_string(),
        })
        .await?;
    Ok(timer)
}

/// Timers still counting down.
pub async fn active_timers(
    store: &RecordStore,
    user: UserId,
    now: DateTime<Utc>,
) -> Result<Vec<Timer>, TaskmateError> {
    let mut timers: Vec<Timer> = store.load_for(user).await?;
    timers.retain(|t| t.end_time > now);
    Ok(timers)
}

/// Record that the finish notification for `id` was delivered.
pub async fn mark_fired(store: &RecordStore, id: Uuid) -> Result<bool, TaskmateError> {
    store
        .update_where(move |t: &Timer| t.id == id, |t: &mut Timer| t.fired = true)
        .await
}

pub async fn delete_timer(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
) -> Result<bool, TaskmateError> {
    store.delete_by_key::<Timer>(user, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::open_store;

    #[tokio::test]
    async fn start_timer_stores_companion_reminder() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let now = Utc::now();

        let timer = start_timer(&store, UserId(4), 25, now).await.unwrap();
        assert_eq!(timer.end_time - now, TimeDelta::minutes(25));

        let reminders: Vec<Reminder> = store.load_for(UserId(4)).await.unwrap();
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].time, timer.end_time);
        assert_eq!(reminders[0].message, TIMER_REMINDER_TEXT);
    }

    #[tokio::test]
    async fn finished_timers_are_not_active() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let now = Utc::now();
        let timer = start_timer(&store, UserId(4), 1, now).await.unwrap();

        assert_eq!(active_timers(&store, UserId(4), now).await.unwrap().len(), 1);
        let later = now + TimeDelta::minutes(2);
        assert!(active_timers(&store, UserId(4), later).await.unwrap().is_empty());

        assert!(mark_fired(&store, timer.id).await.unwrap());
        let stored: Vec<Timer> = store.load().await.unwrap();
        assert!(stored[0].fired);

        assert!(delete_timer(&store, UserId(4), timer.id).await.unwrap());
        assert!(!delete_timer(&store, UserId(4), timer.id).await.unwrap());
    }

    #[tokio::test]
    async fn zero_minute_timer_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(start_timer(&store, UserId(4), 0, Utc::now()).await.is_err());
    }
}
