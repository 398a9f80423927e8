// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messenger for deterministic testing.
//!
//! `MockMessenger` implements `Messenger`, capturing every delivered text
//! for assertions. Sends to users registered with `fail_for` return a
//! channel error instead.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use taskmate_core::{HealthStatus, MessageId, Messenger, TaskmateError, UserId};

/// A message captured by [`MockMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user: UserId,
    pub text: String,
}

pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<HashSet<UserId>>>,
    notify: Arc<Notify>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Make every send to `user` fail.
    pub async fn fail_for(&self, user: UserId) {
        self.failing.lock().await.insert(user);
    }

    pub async fn recover(&self, user: UserId) {
        self.failing.lock().await.remove(&user);
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Waits until at least `count` messages were delivered, or `timeout`
    /// elapses. Returns whether the count was reached.
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, async {
            loop {
                let notified = self.notify.notified();
                if self.sent_count().await >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    fn name(&self) -> &str {
        "mock-messenger"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskmateError> {
        Ok(HealthStatus::Healthy)
    }

    async fn send_text(&self, user: UserId, text: &str) -> Result<MessageId, TaskmateError> {
        if self.failing.lock().await.contains(&user) {
            return Err(TaskmateError::Channel {
                message: format!("mock delivery to {user} refused"),
                source: None,
            });
        }
        self.sent.lock().await.push(SentMessage {
            user,
            text: text.to_string(),
        });
        self.notify.notify_waiters();
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }
}
