// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end: records written through the query layer reach the user
//! through the running scheduler, each exactly once.

use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use taskmate_core::records::{AutoMessage, Birthday, CalendarEvent, Timer};
use taskmate_core::{Clock, LocalZone, UserId};
use taskmate_cron::{NotificationScheduler, ScanKind};
use taskmate_storage::queries::{auto_messages, birthdays, calendar, tasks, timers};
use taskmate_test_utils::TestHarness;

#[tokio::test]
async fn all_four_loops_deliver_once() {
    // 2025-03-13 08:50 IST
    let start = Utc.with_ymd_and_hms(2025, 3, 13, 3, 20, 0).unwrap();
    let harness = TestHarness::builder().at(start).build().await.unwrap();
    let zone = LocalZone::ist();
    let user = UserId(1001);

    timers::start_timer(&harness.store, user, 10, start).await.unwrap();
    auto_messages::schedule_auto_message(&harness.store, &zone, user, "9:00", "Standup", start)
        .await
        .unwrap();
    birthdays::add_birthday(&harness.store, user, "Kiran", "03/20")
        .await
        .unwrap();
    calendar::add_event(&harness.store, user, "2025-03-14", "Flight", start)
        .await
        .unwrap();
    // Unrelated collections are left alone.
    tasks::add_task(&harness.store, user, "pack bags", start)
        .await
        .unwrap();

    // 09:00 IST: every condition holds.
    harness.clock.advance(TimeDelta::minutes(10));

    let fast = Duration::from_millis(25);
    let scheduler = NotificationScheduler::new(
        harness.store.clone(),
        harness.messenger_handle(),
        harness.clock_handle(),
        &harness.scheduler,
    )
    .unwrap()
    .with_interval(ScanKind::Timers, fast)
    .with_interval(ScanKind::AutoMessages, fast)
    .with_interval(ScanKind::Birthdays, fast)
    .with_interval(ScanKind::Calendar, fast);

    scheduler.start().await.unwrap();
    assert!(
        harness
            .messenger
            .wait_for_sent(4, Duration::from_secs(5))
            .await
    );
    // Several more passes run at the same instant without repeats.
    tokio::time::sleep(Duration::from_millis(150)).await;
    scheduler.stop().await;

    let sent = harness.messenger.sent_messages().await;
    assert_eq!(sent.len(), 4, "unexpected deliveries: {sent:?}");
    assert!(sent.iter().all(|m| m.user == user));

    let mut heads: Vec<&str> = sent
        .iter()
        .map(|m| m.text.lines().next().unwrap_or_default())
        .collect();
    heads.sort_unstable();
    assert_eq!(
        heads,
        vec![
            "⏰ Timer finished!",
            "🎂 Birthday Reminder! (09:00 AM IST)",
            "📅 Calendar Reminder! (09:00 AM IST)",
            "🔄 Auto Message:",
        ]
    );

    let today = zone.today(harness.clock.now());
    let stored_timers: Vec<Timer> = harness.store.load().await.unwrap();
    assert!(stored_timers[0].fired);
    let stored_autos: Vec<AutoMessage> = harness.store.load().await.unwrap();
    assert_eq!(stored_autos[0].last_sent_on, Some(today));
    let stored_birthdays: Vec<Birthday> = harness.store.load().await.unwrap();
    assert_eq!(stored_birthdays[0].notified_on, Some(today));
    let stored_events: Vec<CalendarEvent> = harness.store.load().await.unwrap();
    assert_eq!(stored_events[0].notified_on, Some(today));
}
