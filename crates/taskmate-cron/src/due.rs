// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Due conditions, one per scanned record kind.
//!
//! With `deduplicate` set, a record that already carries a delivery marker
//! for the current condition is not due. Without it, a condition stays due
//! on every tick for as long as it holds.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use taskmate_core::calendar::{days_until_birthday, days_until_event};
use taskmate_core::records::{AutoMessage, Birthday, CalendarEvent, Timer};
use taskmate_core::{LocalZone, TaskmateError};

/// A timer is due once its end time has passed.
pub fn timer_due(timer: &Timer, now: DateTime<Utc>, deduplicate: bool) -> bool {
    timer.end_time <= now && !(deduplicate && timer.fired)
}

/// An active auto-message is due during the one local minute whose `HH:MM`
/// reading equals its stored time. A stored time that is not `HH:MM` is an
/// error.
pub fn auto_message_due(
    message: &AutoMessage,
    zone: &LocalZone,
    now: DateTime<Utc>,
    deduplicate: bool,
) -> Result<bool, TaskmateError> {
    if !message.active {
        return Ok(false);
    }
    let at = NaiveTime::parse_from_str(message.time.trim(), "%H:%M").map_err(|_| {
        TaskmateError::InvalidInput(format!("`{}` is not a HH:MM time", message.time))
    })?;
    if zone.hhmm(now) != at.format("%H:%M").to_string() {
        return Ok(false);
    }
    Ok(!(deduplicate && message.last_sent_on == Some(zone.today(now))))
}

/// Days until the birthday if today is one of the lead days.
pub fn birthday_lead(
    birthday: &Birthday,
    today: NaiveDate,
    lead_days: &[u32],
    deduplicate: bool,
) -> Result<Option<i64>, TaskmateError> {
    let days = days_until_birthday(&birthday.date, today)?;
    Ok(lead_match(days, lead_days, deduplicate, birthday.notified_on, today))
}

/// Days until the event if today is one of the lead days.
pub fn calendar_lead(
    event: &CalendarEvent,
    today: NaiveDate,
    lead_days: &[u32],
    deduplicate: bool,
) -> Result<Option<i64>, TaskmateError> {
    let days = days_until_event(&event.date, today)?;
    Ok(lead_match(days, lead_days, deduplicate, event.notified_on, today))
}

fn lead_match(
    days: i64,
    lead_days: &[u32],
    deduplicate: bool,
    notified_on: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<i64> {
    let is_lead_day = lead_days.iter().any(|&d| i64::from(d) == days);
    let already_sent = deduplicate && notified_on == Some(today);
    (is_lead_day && !already_sent).then_some(days)
}
