// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle of the four scan loops.

use std::sync::Arc;
use std::time::Duration;

use taskmate_config::model::SchedulerConfig;
use taskmate_core::{Clock, Messenger, TaskmateError};
use taskmate_storage::RecordStore;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::scan::{ScanKind, ScanSettings, Scanner};

struct Running {
    cancel: CancellationToken,
    loops: Vec<(ScanKind, JoinHandle<()>)>,
}

/// Owns the timer, auto-message, birthday and calendar loops.
///
/// `start` spawns one task per loop; `stop` cancels them and waits until
/// every loop has exited. Dropping a running scheduler cancels its loops
/// without waiting.
pub struct NotificationScheduler {
    scanner: Arc<Scanner>,
    intervals: Vec<(ScanKind, Duration)>,
    running: Mutex<Option<Running>>,
}

impl NotificationScheduler {
    pub fn new(
        store: RecordStore,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
        config: &SchedulerConfig,
    ) -> Result<Self, TaskmateError> {
        let settings = ScanSettings::from_config(config)?;
        let intervals = ScanKind::ALL
            .iter()
            .map(|&kind| (kind, Duration::from_secs(interval_secs(config, kind))))
            .collect();
        Ok(Self {
            scanner: Arc::new(Scanner::new(store, messenger, clock, settings)),
            intervals,
            running: Mutex::new(None),
        })
    }

    /// Overrides the sleep between passes of `kind`.
    pub fn with_interval(mut self, kind: ScanKind, period: Duration) -> Self {
        for (k, d) in &mut self.intervals {
            if *k == kind {
                *d = period;
            }
        }
        self
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn interval(&self, kind: ScanKind) -> Option<Duration> {
        self.intervals
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, d)| *d)
    }

    /// Spawns the scan loops. Each loop scans immediately, then once per
    /// interval.
    pub async fn start(&self) -> Result<(), TaskmateError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(TaskmateError::Internal(
                "notification scheduler is already running".into(),
            ));
        }

        let cancel = CancellationToken::new();
        let loops = self
            .intervals
            .iter()
            .map(|&(kind, period)| {
                let handle = tokio::spawn(run_loop(
                    Arc::clone(&self.scanner),
                    kind,
                    period,
                    cancel.clone(),
                ));
                (kind, handle)
            })
            .collect();

        *running = Some(Running { cancel, loops });
        info!(loops = self.intervals.len(), "notification scheduler started");
        Ok(())
    }

    /// Cancels the loops and waits for them to exit. A loop blocked in a
    /// send finishes that send first. Stopping an idle scheduler is a no-op.
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().await.take() else {
            return;
        };
        running.cancel.cancel();
        for (kind, handle) in running.loops {
            if let Err(e) = handle.await {
                warn!(kind = %kind, error = %e, "scan loop did not exit cleanly");
            }
        }
        info!("notification scheduler stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.cancel.cancel();
        }
    }
}

fn interval_secs(config: &SchedulerConfig, kind: ScanKind) -> u64 {
    match kind {
        ScanKind::Timers => config.timer_interval_secs,
        ScanKind::AutoMessages => config.auto_message_interval_secs,
        ScanKind::Birthdays => config.birthday_interval_secs,
        ScanKind::Calendar => config.calendar_interval_secs,
    }
}

async fn run_loop(
    scanner: Arc<Scanner>,
    kind: ScanKind,
    period: Duration,
    cancel: CancellationToken,
) {
    info!(kind = %kind, period_secs = period.as_secs(), "scan loop started");
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                // A panicking pass must not take the loop down with it.
                let pass = {
                    let scanner = Arc::clone(&scanner);
                    let cancel = cancel.clone();
                    tokio::spawn(async move { scanner.scan(kind, &cancel).await })
                };
                if let Err(e) = pass.await {
                    error!(kind = %kind, error = %e, "scan pass aborted");
                }
            }
        }
    }
    info!(kind = %kind, "scan loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_follow_config() {
        let config = SchedulerConfig {
            timer_interval_secs: 5,
            auto_message_interval_secs: 6,
            birthday_interval_secs: 7,
            calendar_interval_secs: 8,
            ..SchedulerConfig::default()
        };
        let secs: Vec<u64> = ScanKind::ALL
            .iter()
            .map(|&k| interval_secs(&config, k))
            .collect();
        assert_eq!(secs, vec![5, 6, 7, 8]);
    }
}
