// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for scheduler integration tests.
//!
//! `TestHarness` opens a record store in a temporary directory and pairs
//! it with a [`MockMessenger`], a [`ManualClock`] and a scheduler config.
//! The temporary directory lives as long as the harness.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use taskmate_config::model::{SchedulerConfig, StorageConfig};
use taskmate_core::{Clock, Messenger, TaskmateError};
use taskmate_storage::RecordStore;

use crate::manual_clock::ManualClock;
use crate::mock_messenger::MockMessenger;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    scheduler: SchedulerConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: Utc::now(),
            scheduler: SchedulerConfig::default(),
        }
    }

    /// Start the manual clock at `now`.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.scheduler.deduplicate = deduplicate;
        self
    }

    pub fn with_scheduler_config(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub async fn build(self) -> Result<TestHarness, TaskmateError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| TaskmateError::Storage { source: e.into() })?;
        let storage = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        let store = RecordStore::open(&storage).await?;
        tracing::debug!(path = %storage.database_path, "test harness store opened");

        Ok(TestHarness {
            store,
            messenger: Arc::new(MockMessenger::new()),
            clock: Arc::new(ManualClock::new(self.now)),
            scheduler: self.scheduler,
            _temp_dir: temp_dir,
        })
    }
}

pub struct TestHarness {
    pub store: RecordStore,
    pub messenger: Arc<MockMessenger>,
    pub clock: Arc<ManualClock>,
    pub scheduler: SchedulerConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn messenger_handle(&self) -> Arc<dyn Messenger> {
        self.messenger.clone()
    }

    pub fn clock_handle(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }
}
