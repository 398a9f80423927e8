// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram delivery for Taskmate notifications.
//!
//! Implements [`Messenger`] over the Telegram Bot API via teloxide. A
//! user's id doubles as their private chat id, so notifications go
//! straight to `ChatId(user)`. Texts are sent plain, split at the
//! 4096-character limit.

pub mod split;

use std::future::Future;

use async_trait::async_trait;
use taskmate_config::model::TelegramConfig;
use taskmate_core::{HealthStatus, MessageId, Messenger, TaskmateError, UserId};
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{debug, warn};

use crate::split::{MAX_MESSAGE_CHARS, split_message};

/// Environment variable consulted when `telegram.bot_token` is unset.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_TOKEN";

/// Telegram messenger implementing [`Messenger`].
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    /// Creates a messenger from config, falling back to `TELEGRAM_TOKEN`.
    pub fn new(config: &TelegramConfig) -> Result<Self, TaskmateError> {
        let token = resolve_token(config.bot_token.as_deref(), std::env::var(TOKEN_ENV_VAR).ok())?;
        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn resolve_token(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<String, TaskmateError> {
    let token = match configured {
        Some(token) => token.to_string(),
        None => from_env.ok_or_else(|| {
            TaskmateError::Config(format!(
                "telegram.bot_token is not set and {TOKEN_ENV_VAR} is missing"
            ))
        })?,
    };
    if token.trim().is_empty() {
        return Err(TaskmateError::Config(
            "telegram bot token cannot be empty".into(),
        ));
    }
    Ok(token)
}

/// Sends `chunks` in order and returns the id of the last one delivered.
///
/// A failure on the first chunk is an error. Once any chunk is out, a later
/// failure drops the rest with a warning and still reports success, so the
/// caller records the notification as sent instead of repeating the prefix.
async fn send_chunks<'a, F, Fut, T>(
    chunks: Vec<&'a str>,
    mut send: F,
) -> Result<T, TaskmateError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<T, TaskmateError>>,
{
    let total = chunks.len();
    let mut last = None;
    for (index, chunk) in chunks.into_iter().enumerate() {
        match send(chunk).await {
            Ok(id) => last = Some(id),
            Err(e) => match last {
                Some(id) => {
                    warn!(
                        delivered = index,
                        total,
                        error = %e,
                        "message partially delivered, dropping remaining chunks"
                    );
                    return Ok(id);
                }
                None => return Err(e),
            },
        }
    }
    last.ok_or_else(|| TaskmateError::Channel {
        message: "nothing was sent".into(),
        source: None,
    })
}

#[async_trait]
impl Messenger for TelegramMessenger {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn health_check(&self) -> Result<HealthStatus, TaskmateError> {
        match self.bot.get_me().await {
            Ok(me) => {
                debug!(bot_id = %me.user.id, "telegram bot reachable");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn send_text(&self, user: UserId, text: &str) -> Result<MessageId, TaskmateError> {
        let chat = Recipient::Id(ChatId(user.0));
        let bot = &self.bot;
        let id = send_chunks(split_message(text, MAX_MESSAGE_CHARS), |chunk| {
            let chat = chat.clone();
            async move {
                bot.send_message(chat, chunk)
                    .await
                    .map(|sent| sent.id)
                    .map_err(|e| TaskmateError::Channel {
                        message: format!("failed to send message to {user}: {e}"),
                        source: Some(Box::new(e)),
                    })
            }
        })
        .await?;
        Ok(MessageId(id.0.to_string()))
    }
}
