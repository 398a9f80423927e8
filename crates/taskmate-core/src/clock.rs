// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time source and the fixed-offset timezone adapter.
//!
//! Everything persisted is UTC. Everything shown to users or compared
//! against a wall-clock value (auto-message times, "today" for birthdays
//! and calendar events) goes through [`LocalZone`] first.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, Utc};

use crate::error::TaskmateError;

/// India Standard Time, UTC+5:30.
pub const IST_OFFSET_MINUTES: i32 = 5 * 60 + 30;

/// Source of the current instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-offset display and scheduling timezone. No daylight saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset: FixedOffset,
}

impl LocalZone {
    /// The default zone, UTC+5:30.
    pub fn ist() -> Self {
        Self {
            offset: FixedOffset::east_opt(IST_OFFSET_MINUTES * 60).unwrap_or(Utc.fix()),
        }
    }

    /// Builds a zone from an offset east of UTC in minutes.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, TaskmateError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                TaskmateError::Config(format!("utc offset of {minutes} minutes is out of range"))
            })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// UTC instant to local wall-clock time.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// Local time back to the UTC instant it denotes.
    pub fn to_utc(&self, local: DateTime<FixedOffset>) -> DateTime<Utc> {
        local.with_timezone(&Utc)
    }

    /// Interprets a naive wall-clock value as local time.
    pub fn local_to_utc(&self, naive: NaiveDateTime) -> Result<DateTime<Utc>, TaskmateError> {
        let shift = TimeDelta::seconds(i64::from(self.offset.local_minus_utc()));
        naive
            .checked_sub_signed(shift)
            .map(|utc| utc.and_utc())
            .ok_or_else(|| TaskmateError::InvalidInput(format!("{naive} is out of range")))
    }

    /// The local calendar date at `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.to_local(now).date_naive()
    }

    /// The local wall-clock reading at `now` as zero-padded `HH:MM`.
    pub fn hhmm(&self, now: DateTime<Utc>) -> String {
        self.to_local(now).format("%H:%M").to_string()
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::ist()
    }
}

/// Parses a user-entered local time into a UTC instant.
///
/// Accepts `HH:MM` (the next occurrence, today or tomorrow) or
/// `MM/DD/YYYY HH:MM`.
pub fn parse_local_time(
    input: &str,
    zone: &LocalZone,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, TaskmateError> {
    let input = input.trim();

    if let Ok(time) = NaiveTime::parse_from_str(input, "%H:%M") {
        let candidate = zone.local_to_utc(zone.today(now).and_time(time))?;
        if candidate <= now {
            return Ok(candidate + TimeDelta::days(1));
        }
        return Ok(candidate);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%m/%d/%Y %H:%M") {
        return zone.local_to_utc(naive);
    }

    Err(TaskmateError::InvalidInput(format!(
        "`{input}` is not a time; use HH:MM or MM/DD/YYYY HH:MM"
    )))
}
