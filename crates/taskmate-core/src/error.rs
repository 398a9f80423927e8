// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Taskmate assistant bot.

use thiserror::Error;

use crate::records::Collection;

/// The error type shared by every Taskmate crate.
#[derive(Debug, Error)]
pub enum TaskmateError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound messenger errors (network failure, blocked chat, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A record addressed by index or key no longer exists.
    #[error("{collection} record not found: {detail}")]
    NotFound {
        collection: Collection,
        detail: String,
    },

    /// User-supplied values that failed to parse or validate.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Encryption or decryption of stored secrets failed.
    #[error("vault error: {0}")]
    Vault(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
