// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted record entities.
//!
//! Every entity is owned by a [`UserId`] and lives in exactly one
//! [`Collection`]. Records are stored as JSON bodies, so field names here
//! are part of the on-disk format.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::types::UserId;

/// Named collection holding one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Tasks,
    Reminders,
    Timers,
    AutoMessages,
    Birthdays,
    Calendar,
    Passwords,
    Goals,
    Notes,
    Expenses,
    Notifications,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Tasks,
        Collection::Reminders,
        Collection::Timers,
        Collection::AutoMessages,
        Collection::Birthdays,
        Collection::Calendar,
        Collection::Passwords,
        Collection::Goals,
        Collection::Notes,
        Collection::Expenses,
        Collection::Notifications,
    ];
}

/// A record type that can be persisted in the record store.
///
/// `key()` returns the stable identifying field used to re-locate a record
/// after its positional index was shown to a user. It must not change when
/// the record is mutated through the store helpers.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection this record type is stored in.
    const COLLECTION: Collection;

    /// Stable identifier type.
    type Key: PartialEq + Clone + fmt::Debug + Send + Sync + 'static;

    /// Owning user.
    fn owner(&self) -> UserId;

    /// Stable identifier within the owner's records.
    fn key(&self) -> Self::Key;
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr, $key:ty, |$this:ident| $key_expr:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;
            type Key = $key;

            fn owner(&self) -> UserId {
                self.user_id
            }

            fn key(&self) -> Self::Key {
                let $this = self;
                $key_expr
            }
        }
    };
}

/// A to-do item. `created_at` doubles as its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub user_id: UserId,
    pub task: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

impl_record!(Task, Collection::Tasks, DateTime<Utc>, |t| t.created_at);

/// A one-shot reminder at a UTC instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: UserId,
    pub time: DateTime<Utc>,
    pub message: String,
}

impl_record!(Reminder, Collection::Reminders, Uuid, |r| r.id);

/// A countdown that finishes at `end_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub id: Uuid,
    pub user_id: UserId,
    pub end_time: DateTime<Utc>,
    /// Duration in minutes.
    pub duration: u32,
    /// Set once the finish notification was delivered.
    #[serde(default)]
    pub fired: bool,
}

impl_record!(Timer, Collection::Timers, Uuid, |t| t.id);

/// A message sent every day at a local wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoMessage {
    pub id: Uuid,
    pub user_id: UserId,
    /// Zero-padded 24-hour `HH:MM` in the local display timezone.
    pub time: String,
    pub message: String,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Local date of the last delivery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_on: Option<NaiveDate>,
}

impl_record!(AutoMessage, Collection::AutoMessages, Uuid, |m| m.id);

/// A yearly birthday without a birth year.
///
/// Name and date need not be unique per user, so delivery markers address
/// the record by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Birthday {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: UserId,
    pub name: String,
    /// `MM/DD`.
    pub date: String,
    /// Local date of the last lead-time notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_on: Option<NaiveDate>,
}

impl_record!(Birthday, Collection::Birthdays, Uuid, |b| b.id);

/// A dated calendar entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub user_id: UserId,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub event: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_on: Option<NaiveDate>,
}

impl_record!(CalendarEvent, Collection::Calendar, Uuid, |e| e.id);

/// A stored credential. `password` is always ciphertext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub user_id: UserId,
    pub service: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl_record!(PasswordEntry, Collection::Passwords, DateTime<Utc>, |p| p.created_at);

/// A personal goal with percent progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub progress: u8,
}

impl Goal {
    /// Sets progress, clamped to `0..=100`.
    pub fn set_progress(&mut self, percent: i64) {
        self.progress = percent.clamp(0, 100) as u8;
    }
}

impl_record!(Goal, Collection::Goals, Uuid, |g| g.id);

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl_record!(Note, Collection::Notes, DateTime<Utc>, |n| n.created_at);

/// A spending entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub user_id: UserId,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl_record!(Expense, Collection::Expenses, DateTime<Utc>, |e| e.date);

/// A user-defined notification. The trigger is a free-text label and is
/// never evaluated by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomNotification {
    pub id: Uuid,
    pub user_id: UserId,
    pub trigger: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl_record!(CustomNotification, Collection::Notifications, Uuid, |n| n.id);

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_progress_is_clamped() {
        let mut goal = Goal {
            id: Uuid::new_v4(),
            user_id: UserId(1),
            title: "Run a marathon".into(),
            description: String::new(),
            target_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            created_at: Utc::now(),
            progress: 0,
        };

        goal.set_progress(150);
        assert_eq!(goal.progress, 100);
        goal.set_progress(-20);
        assert_eq!(goal.progress, 0);
        goal.set_progress(42);
        assert_eq!(goal.progress, 42);
    }

    #[test]
    fn timer_without_fired_flag_defaults_to_unfired() {
        let json = r#"{
            "id": "6f1c9a52-2f0e-4a7e-9d55-0c7d3d1f2b11",
            "user_id": 7,
            "end_time": "2025-03-01T10:00:00Z",
            "duration": 5
        }"#;
        let timer: Timer = serde_json::from_str(json).unwrap();
        assert!(!timer.fired);
        assert_eq!(timer.owner(), UserId(7));
    }

    #[test]
    fn reminder_without_id_gets_one() {
        let json = r#"{"user_id": 3, "time": "2025-03-01T10:00:00Z", "message": "call mom"}"#;
        let a: Reminder = serde_json::from_str(json).unwrap();
        let b: Reminder = serde_json::from_str(json).unwrap();
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn identical_birthdays_have_distinct_keys() {
        let json = r#"{"user_id": 1, "name": "Asha", "date": "04/12"}"#;
        let a: Birthday = serde_json::from_str(json).unwrap();
        let b: Birthday = serde_json::from_str(json).unwrap();
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.id);

        let json = serde_json::to_string(&a).unwrap();
        assert!(!json.contains("notified_on"));
    }

    #[test]
    fn calendar_event_key_survives_round_trip() {
        let event = CalendarEvent {
            id: Uuid::new_v4(),
            user_id: UserId(2),
            date: "2025-03-20".into(),
            event: "Dentist".into(),
            created_at: Utc::now(),
            notified_on: None,
        };
        let back: CalendarEvent =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(back.key(), event.key());
    }

    #[test]
    fn auto_message_defaults_to_active() {
        let json = r#"{
            "id": "6f1c9a52-2f0e-4a7e-9d55-0c7d3d1f2b11",
            "user_id": 7,
            "time": "09:00",
            "message": "stand up"
        }"#;
        let msg: AutoMessage = serde_json::from_str(json).unwrap();
        assert!(msg.active);
        assert!(msg.last_sent_on.is_none());
    }
}
