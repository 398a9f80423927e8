// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One pass over a collection: load, evaluate, deliver, mark.
//!
//! Each record is handled in isolation. A malformed date, a failed send,
//! or a failed marker write is logged and counted, and the pass continues
//! with the next record. A collection that cannot be loaded yields an
//! empty report.

use std::sync::Arc;

use strum::Display;
use taskmate_config::model::SchedulerConfig;
use taskmate_core::records::{AutoMessage, Birthday, CalendarEvent, Timer};
use taskmate_core::{Clock, LocalZone, Messenger, Record, TaskmateError, UserId};
use taskmate_storage::RecordStore;
use taskmate_storage::queries::{auto_messages, birthdays, calendar, timers};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{due, messages};

/// The four periodic scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ScanKind {
    Timers,
    AutoMessages,
    Birthdays,
    Calendar,
}

impl ScanKind {
    pub const ALL: [ScanKind; 4] = [
        ScanKind::Timers,
        ScanKind::AutoMessages,
        ScanKind::Birthdays,
        ScanKind::Calendar,
    ];
}

/// Counters for a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub kind: ScanKind,
    /// Records looked at.
    pub examined: usize,
    /// Notifications delivered.
    pub sent: usize,
    /// Notifications the messenger rejected.
    pub failed: usize,
    /// Records whose stored date or time could not be parsed.
    pub skipped: usize,
}

impl ScanReport {
    fn new(kind: ScanKind) -> Self {
        Self {
            kind,
            examined: 0,
            sent: 0,
            failed: 0,
            skipped: 0,
        }
    }
}

/// The parts of [`SchedulerConfig`] a pass needs.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub zone: LocalZone,
    pub label: String,
    pub birthday_lead_days: Vec<u32>,
    pub calendar_lead_days: Vec<u32>,
    pub deduplicate: bool,
}

impl ScanSettings {
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, TaskmateError> {
        Ok(Self {
            zone: LocalZone::from_offset_minutes(config.utc_offset_minutes)?,
            label: config.timezone_label.clone(),
            birthday_lead_days: config.birthday_lead_days.clone(),
            calendar_lead_days: config.calendar_lead_days.clone(),
            deduplicate: config.deduplicate,
        })
    }
}

/// Runs scan passes against a store.
pub struct Scanner {
    store: RecordStore,
    messenger: Arc<dyn Messenger>,
    clock: Arc<dyn Clock>,
    settings: ScanSettings,
}

impl Scanner {
    pub fn new(
        store: RecordStore,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            store,
            messenger,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Runs one pass of `kind`. Stops before the next send once `cancel`
    /// fires.
    pub async fn scan(&self, kind: ScanKind, cancel: &CancellationToken) -> ScanReport {
        let report = match kind {
            ScanKind::Timers => self.scan_timers(cancel).await,
            ScanKind::AutoMessages => self.scan_auto_messages(cancel).await,
            ScanKind::Birthdays => self.scan_birthdays(cancel).await,
            ScanKind::Calendar => self.scan_calendar(cancel).await,
        };
        if report.sent > 0 || report.failed > 0 {
            info!(
                kind = %report.kind,
                sent = report.sent,
                failed = report.failed,
                "scan delivered notifications"
            );
        } else {
            debug!(kind = %report.kind, examined = report.examined, "scan complete");
        }
        report
    }

    pub async fn scan_timers(&self, cancel: &CancellationToken) -> ScanReport {
        let mut report = ScanReport::new(ScanKind::Timers);
        let Some(all) = self.load_all::<Timer>(ScanKind::Timers).await else {
            return report;
        };
        let now = self.clock.now();
        let dedupe = self.settings.deduplicate;

        for timer in all {
            report.examined += 1;
            if !due::timer_due(&timer, now, dedupe) {
                continue;
            }
            if cancel.is_cancelled() {
                break;
            }
            let text = messages::timer_finished(&timer, &self.settings.zone, &self.settings.label);
            if self.deliver(&mut report, timer.user_id, &text).await && dedupe {
                let marked = timers::mark_fired(&self.store, timer.id).await;
                self.check_marker(marked, ScanKind::Timers, timer.user_id);
            }
        }
        report
    }

    pub async fn scan_auto_messages(&self, cancel: &CancellationToken) -> ScanReport {
        let mut report = ScanReport::new(ScanKind::AutoMessages);
        let Some(all) = self.load_all::<AutoMessage>(ScanKind::AutoMessages).await else {
            return report;
        };
        let now = self.clock.now();
        let zone = &self.settings.zone;
        let dedupe = self.settings.deduplicate;

        for message in all {
            report.examined += 1;
            match due::auto_message_due(&message, zone, now, dedupe) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    report.skipped += 1;
                    warn!(
                        user = %message.user_id,
                        id = %message.id,
                        error = %e,
                        "skipping auto message with unreadable time"
                    );
                    continue;
                }
            }
            if cancel.is_cancelled() {
                break;
            }
            let text = messages::auto_message(&message, zone, now, &self.settings.label);
            if self.deliver(&mut report, message.user_id, &text).await && dedupe {
                let marked = auto_messages::mark_sent(&self.store, message.id, zone.today(now)).await;
                self.check_marker(marked, ScanKind::AutoMessages, message.user_id);
            }
        }
        report
    }

    pub async fn scan_birthdays(&self, cancel: &CancellationToken) -> ScanReport {
        let mut report = ScanReport::new(ScanKind::Birthdays);
        let Some(all) = self.load_all::<Birthday>(ScanKind::Birthdays).await else {
            return report;
        };
        let now = self.clock.now();
        let today = self.settings.zone.today(now);
        let dedupe = self.settings.deduplicate;

        for birthday in all {
            report.examined += 1;
            let days = match due::birthday_lead(
                &birthday,
                today,
                &self.settings.birthday_lead_days,
                dedupe,
            ) {
                Ok(Some(days)) => days,
                Ok(None) => continue,
                Err(e) => {
                    report.skipped += 1;
                    warn!(
                        user = %birthday.user_id,
                        name = %birthday.name,
                        error = %e,
                        "skipping birthday with unreadable date"
                    );
                    continue;
                }
            };
            if cancel.is_cancelled() {
                break;
            }
            let text =
                messages::birthday(&birthday, days, &self.settings.zone, now, &self.settings.label);
            if self.deliver(&mut report, birthday.user_id, &text).await && dedupe {
                let marked =
                    birthdays::mark_notified(&self.store, birthday.user_id, birthday.id, today)
                        .await;
                self.check_marker(marked, ScanKind::Birthdays, birthday.user_id);
            }
        }
        report
    }

    pub async fn scan_calendar(&self, cancel: &CancellationToken) -> ScanReport {
        let mut report = ScanReport::new(ScanKind::Calendar);
        let Some(all) = self.load_all::<CalendarEvent>(ScanKind::Calendar).await else {
            return report;
        };
        let now = self.clock.now();
        let today = self.settings.zone.today(now);
        let dedupe = self.settings.deduplicate;

        for event in all {
            report.examined += 1;
            let days = match due::calendar_lead(
                &event,
                today,
                &self.settings.calendar_lead_days,
                dedupe,
            ) {
                Ok(Some(days)) => days,
                Ok(None) => continue,
                Err(e) => {
                    report.skipped += 1;
                    warn!(
                        user = %event.user_id,
                        date = %event.date,
                        error = %e,
                        "skipping calendar event with unreadable date"
                    );
                    continue;
                }
            };
            if cancel.is_cancelled() {
                break;
            }
            let text = messages::calendar(&event, days, &self.settings.zone, now, &self.settings.label);
            if self.deliver(&mut report, event.user_id, &text).await && dedupe {
                let marked =
                    calendar::mark_notified(&self.store, event.user_id, event.id, today)
                        .await;
                self.check_marker(marked, ScanKind::Calendar, event.user_id);
            }
        }
        report
    }

    async fn load_all<R: Record>(&self, kind: ScanKind) -> Option<Vec<R>> {
        match self.store.load::<R>().await {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(kind = %kind, error = %e, "failed to load records for scan");
                None
            }
        }
    }

    /// Sends `text` and records the outcome. Returns whether it was delivered.
    async fn deliver(&self, report: &mut ScanReport, user: UserId, text: &str) -> bool {
        match self.messenger.send_text(user, text).await {
            Ok(message_id) => {
                report.sent += 1;
                debug!(kind = %report.kind, %user, message_id = %message_id.0, "notification sent");
                true
            }
            Err(e) => {
                report.failed += 1;
                warn!(
                    kind = %report.kind,
                    %user,
                    channel = self.messenger.name(),
                    error = %e,
                    "failed to send notification"
                );
                false
            }
        }
    }

    fn check_marker(&self, marked: Result<bool, TaskmateError>, kind: ScanKind, user: UserId) {
        match marked {
            Ok(true) => {}
            Ok(false) => debug!(kind = %kind, %user, "record removed before it could be marked"),
            Err(e) => warn!(kind = %kind, %user, error = %e, "failed to record delivery"),
        }
    }
}
