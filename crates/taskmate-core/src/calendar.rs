// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Calendar-date arithmetic for birthdays and dated events.
//!
//! All inputs are local calendar dates; time of day never matters here.

use chrono::{Datelike, NaiveDate};

use crate::error::TaskmateError;

/// Parses a yearless `MM/DD` date. `02/29` is accepted.
pub fn parse_month_day(input: &str) -> Result<(u32, u32), TaskmateError> {
    let invalid = || TaskmateError::InvalidInput(format!("`{input}` is not a MM/DD date"));

    let (month, day) = input.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    // 2000 is a leap year, so this validates Feb 29 too.
    NaiveDate::from_ymd_opt(2000, month, day).ok_or_else(invalid)?;
    Ok((month, day))
}

/// The month/day in `year`. Feb 29 falls back to Feb 28 in common years.
fn occurrence_in(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month == 2 && day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// The nearest occurrence of `month/day` on or after `today`.
pub fn next_occurrence(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = occurrence_in(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        occurrence_in(today.year() + 1, month, day)
    }
}

/// Days from `today` until the next occurrence of a `MM/DD` birthday.
pub fn days_until_birthday(date: &str, today: NaiveDate) -> Result<i64, TaskmateError> {
    let (month, day) = parse_month_day(date)?;
    let next = next_occurrence(month, day, today)
        .ok_or_else(|| TaskmateError::InvalidInput(format!("`{date}` has no next occurrence")))?;
    Ok((next - today).num_days())
}

/// Parses a `YYYY-MM-DD` event date.
pub fn parse_event_date(input: &str) -> Result<NaiveDate, TaskmateError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| TaskmateError::InvalidInput(format!("`{input}` is not a YYYY-MM-DD date")))
}

/// Signed days from `today` until a `YYYY-MM-DD` event. Past events are negative.
pub fn days_until_event(date: &str, today: NaiveDate) -> Result<i64, TaskmateError> {
    Ok((parse_event_date(date)? - today).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_year_birthday_one_week_out() {
        assert_eq!(days_until_birthday("01/01", ymd(2025, 12, 25)).unwrap(), 7);
    }

    #[test]
    fn passed_birthday_rolls_to_next_year() {
        let days = days_until_birthday("01/01", ymd(2025, 1, 2)).unwrap();
        assert!(days == 364 || days == 365, "got {days}");

        // Across a leap day the gap is a day longer.
        assert_eq!(days_until_birthday("01/01", ymd(2027, 1, 2)).unwrap(), 364);
        assert_eq!(days_until_birthday("01/01", ymd(2028, 1, 2)).unwrap(), 365);
    }

    #[test]
    fn birthday_today_is_zero() {
        assert_eq!(days_until_birthday("03/14", ymd(2025, 3, 14)).unwrap(), 0);
    }

    #[test]
    fn leap_day_birthday_observed_on_feb_28() {
        assert_eq!(days_until_birthday("02/29", ymd(2025, 2, 28)).unwrap(), 0);
        assert_eq!(days_until_birthday("02/29", ymd(2028, 2, 28)).unwrap(), 1);
    }

    #[test]
    fn malformed_month_day_is_rejected() {
        for bad in ["13/01", "00/10", "04/31", "0412", "ab/cd", ""] {
            assert!(parse_month_day(bad).is_err(), "{bad} should be rejected");
        }
        assert_eq!(parse_month_day(" 4/2 ").unwrap(), (4, 2));
    }

    #[test]
    fn event_lead_days() {
        assert_eq!(days_until_event("2025-03-20", ymd(2025, 3, 13)).unwrap(), 7);
        assert_eq!(days_until_event("2025-03-20", ymd(2025, 3, 14)).unwrap(), 6);
        assert_eq!(days_until_event("2025-03-20", ymd(2025, 3, 21)).unwrap(), -1);
        assert!(days_until_event("20/03/2025", ymd(2025, 3, 13)).is_err());
    }
}
