// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskmate serve` command implementation.
//!
//! Opens the record store, checks the vault key and the Telegram bot,
//! then runs the notification scheduler until SIGINT or SIGTERM.

use std::sync::Arc;

use taskmate_config::TaskmateConfig;
use taskmate_core::{HealthStatus, Messenger, SystemClock, TaskmateError};
use taskmate_cron::NotificationScheduler;
use taskmate_storage::RecordStore;
use taskmate_telegram::TelegramMessenger;
use taskmate_vault::{AesGcmCipher, KeySource};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `taskmate serve` command.
pub async fn run_serve(config: TaskmateConfig) -> Result<(), TaskmateError> {
    init_tracing(&config.bot.log_level);
    info!(name = %config.bot.name, "starting taskmate serve");

    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(&config.telegram)?);
    match messenger.health_check().await {
        Ok(HealthStatus::Healthy) => info!(channel = messenger.name(), "messenger healthy"),
        Ok(HealthStatus::Degraded(reason)) | Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(channel = messenger.name(), %reason, "messenger not healthy, continuing")
        }
        Err(e) => warn!(channel = messenger.name(), error = %e, "messenger health check failed"),
    }

    let cancel = shutdown::install_signal_handler();
    run_until_cancelled(config, messenger, cancel).await
}

/// Everything `serve` does after the messenger exists: store, vault check,
/// scheduler lifecycle.
pub(crate) async fn run_until_cancelled(
    config: TaskmateConfig,
    messenger: Arc<dyn Messenger>,
    cancel: CancellationToken,
) -> Result<(), TaskmateError> {
    let store = RecordStore::open(&config.storage).await?;
    info!(path = %config.storage.database_path, "record store opened");

    let (_cipher, key_source) = AesGcmCipher::from_config(&config.vault)?;
    if key_source == KeySource::Ephemeral {
        warn!("stored passwords will not survive a restart without a configured key");
    }

    let scheduler = if config.scheduler.enabled {
        let scheduler = NotificationScheduler::new(
            store.clone(),
            messenger,
            Arc::new(SystemClock),
            &config.scheduler,
        )?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        info!("notification scheduler disabled");
        None
    };

    cancel.cancelled().await;
    info!("shutting down");

    if let Some(scheduler) = scheduler {
        scheduler.stop().await;
    }
    store.close().await?;
    info!("taskmate stopped");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taskmate={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{TimeDelta, Utc};
    use taskmate_core::UserId;
    use taskmate_core::records::Timer;
    use taskmate_test_utils::MockMessenger;

    fn config_for(dir: &tempfile::TempDir) -> TaskmateConfig {
        let mut config = TaskmateConfig::default();
        config.storage.database_path = dir.path().join("serve.db").to_string_lossy().into_owned();
        config
    }

    #[tokio::test]
    async fn delivers_due_timer_then_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(&dir);

        let seed = RecordStore::open(&config.storage).await.unwrap();
        seed.append(&Timer {
            id: Default::default(),
            user_id: UserId(11),
            end_time: Utc::now() - TimeDelta::minutes(1),
            duration: 5,
            fired: false,
        })
        .await
        .unwrap();
        seed.close().await.unwrap();

        let messenger = Arc::new(MockMessenger::new());
        let cancel = CancellationToken::new();
        let run = tokio::spawn(run_until_cancelled(
            config.clone(),
            messenger.clone(),
            cancel.clone(),
        ));

        assert!(messenger.wait_for_sent(1, Duration::from_secs(5)).await);
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), run)
            .await
            .expect("serve should stop")
            .unwrap()
            .unwrap();

        let sent = messenger.sent_messages().await;
        assert_eq!(sent[0].user, UserId(11));
        assert!(sent[0].text.starts_with("⏰ Timer finished!"));

        let store = RecordStore::open(&config.storage).await.unwrap();
        let timers: Vec<Timer> = store.load().await.unwrap();
        assert!(timers[0].fired);
    }

    #[tokio::test]
    async fn disabled_scheduler_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(&dir);
        config.scheduler.enabled = false;

        let messenger = Arc::new(MockMessenger::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        run_until_cancelled(config, messenger.clone(), cancel)
            .await
            .unwrap();
        assert_eq!(messenger.sent_count().await, 0);
    }
}
