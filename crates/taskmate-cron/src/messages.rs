// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification texts sent by the scan loops.

use chrono::{DateTime, Utc};
use taskmate_core::LocalZone;
use taskmate_core::records::{AutoMessage, Birthday, CalendarEvent, Timer};

/// 12-hour clock reading with AM/PM, e.g. `09:05 PM`.
fn twelve_hour(zone: &LocalZone, instant: DateTime<Utc>) -> String {
    zone.to_local(instant).format("%I:%M %p").to_string()
}

pub fn timer_finished(timer: &Timer, zone: &LocalZone, label: &str) -> String {
    format!(
        "⏰ Timer finished!\nDuration: {} minutes\nTime: {} {label}",
        timer.duration,
        twelve_hour(zone, timer.end_time),
    )
}

pub fn auto_message(
    message: &AutoMessage,
    zone: &LocalZone,
    now: DateTime<Utc>,
    label: &str,
) -> String {
    format!(
        "🔄 Auto Message:\n{}\nTime: {} {label}",
        message.message,
        zone.hhmm(now),
    )
}

pub fn birthday(
    birthday: &Birthday,
    days: i64,
    zone: &LocalZone,
    now: DateTime<Utc>,
    label: &str,
) -> String {
    let when = match days {
        0 => "is today!".to_string(),
        n => format!("is in {n} days!"),
    };
    format!(
        "🎂 Birthday Reminder! ({} {label})\n{}'s birthday {when}",
        twelve_hour(zone, now),
        birthday.name,
    )
}

pub fn calendar(
    event: &CalendarEvent,
    days: i64,
    zone: &LocalZone,
    now: DateTime<Utc>,
    label: &str,
) -> String {
    let when = match days {
        0 => "Today!".to_string(),
        n => format!("In {n} days"),
    };
    format!(
        "📅 Calendar Reminder! ({} {label})\nEvent: {}\n{when}",
        twelve_hour(zone, now),
        event.event,
    )
}
