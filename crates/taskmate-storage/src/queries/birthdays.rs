// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Yearly birthdays.

use chrono::NaiveDate;
use uuid::Uuid;
use taskmate_core::calendar::{days_until_birthday, parse_month_day};
use taskmate_core::records::Birthday;
use taskmate_core::{TaskmateError, UserId};

use super::require_text;
use crate::RecordStore;

/// Default look-ahead window for [`upcoming_birthdays`].
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

pub async fn add_birthday(
    store: &RecordStore,
    user: UserId,
    name: &str,
    date: &str,
) -> Result<Birthday, TaskmateError> {
    let (month, day) = parse_month_day(date)?;
    let birthday = Birthday {
        id: Uuid::new_v4(),
        user_id: user,
        name: require_text("name", name)?,
        date: format!("{month:02}/{day:02}"),
        notified_on: None,
    };
    store.append(&birthday).await?;
    Ok(birthday)
}

pub async fn list_birthdays(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<Birthday>, TaskmateError> {
    store.load_for(user).await
}

/// Birthdays occurring within `window_days` of `today`, soonest first,
/// paired with their days-until.
pub async fn upcoming_birthdays(
    store: &RecordStore,
    user: UserId,
    today: NaiveDate,
    window_days: i64,
) -> Result<Vec<(Birthday, i64)>, TaskmateError> {
    let mut upcoming: Vec<_> = list_birthdays(store, user)
        .await?
        .into_iter()
        .filter_map(|b| {
            let days = days_until_birthday(&b.date, today).ok()?;
            (days <= window_days).then_some((b, days))
        })
        .collect();
    upcoming.sort_by_key(|(_, days)| *days);
    Ok(upcoming)
}

/// Record the local date a lead-time notification for `id` went out.
pub async fn mark_notified(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
    on: NaiveDate,
) -> Result<bool, TaskmateError> {
    store
        .update_by_key(user, id, move |b: &mut Birthday| b.notified_on = Some(on))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::open_store;

    #[tokio::test]
    async fn upcoming_is_windowed_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = UserId(1);
        add_birthday(&store, user, "Far", "09/01").await.unwrap();
        add_birthday(&store, user, "Soon", "3/20").await.unwrap();
        add_birthday(&store, user, "Today", "03/13").await.unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();
        let upcoming = upcoming_birthdays(&store, user, today, UPCOMING_WINDOW_DAYS)
            .await
            .unwrap();
        let names: Vec<_> = upcoming.iter().map(|(b, d)| (b.name.as_str(), *d)).collect();
        assert_eq!(names, vec![("Today", 0), ("Soon", 7)]);
        assert_eq!(upcoming[1].0.date, "03/20");
    }

    #[tokio::test]
    async fn invalid_date_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(add_birthday(&store, UserId(1), "X", "02/30").await.is_err());
        assert!(list_birthdays(&store, UserId(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn notified_marker_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let b = add_birthday(&store, UserId(1), "Asha", "04/12").await.unwrap();
        let on = NaiveDate::from_ymd_opt(2025, 4, 5).unwrap();

        assert!(mark_notified(&store, UserId(1), b.id, on).await.unwrap());
        assert_eq!(list_birthdays(&store, UserId(1)).await.unwrap()[0].notified_on, Some(on));
    }

    #[tokio::test]
    async fn duplicate_birthdays_are_marked_separately() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let first = add_birthday(&store, UserId(1), "Meera", "01/01").await.unwrap();
        let second = add_birthday(&store, UserId(1), "Meera", "01/01").await.unwrap();
        let on = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();

        assert!(mark_notified(&store, UserId(1), second.id, on).await.unwrap());
        let stored = list_birthdays(&store, UserId(1)).await.unwrap();
        assert_eq!(stored[0].id, first.id);
        assert_eq!(stored[0].notified_on, None);
        assert_eq!(stored[1].notified_on, Some(on));
    }
}
