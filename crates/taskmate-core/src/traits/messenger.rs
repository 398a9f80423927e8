// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messenger trait.

use async_trait::async_trait;

use crate::error::TaskmateError;
use crate::types::{HealthStatus, MessageId, UserId};

/// Capability to deliver a plain-text message to a user.
///
/// Implementations must not retry internally; the scheduler treats a
/// failed send as transient and moves on to the next record.
#[async_trait]
pub trait Messenger: Send + Sync + 'static {
    /// Returns the human-readable name of this messenger.
    fn name(&self) -> &str;

    /// Performs a health check and returns the messenger's current status.
    async fn health_check(&self) -> Result<HealthStatus, TaskmateError>;

    /// Sends `text` to `user`.
    async fn send_text(&self, user: UserId, text: &str) -> Result<MessageId, TaskmateError>;
}
