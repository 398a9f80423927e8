// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted password entries.
//!
//! Plaintext only exists in the caller's hands; what reaches the store is
//! always the cipher's output.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use taskmate_core::records::PasswordEntry;
use taskmate_core::{SecretCipher, TaskmateError, UserId};

use super::require_text;
use crate::RecordStore;

/// Store (or replace) the secret for `service`.
pub async fn store_password(
    store: &RecordStore,
    cipher: &dyn SecretCipher,
    user: UserId,
    service: &str,
    plaintext: &str,
    now: DateTime<Utc>,
) -> Result<(), TaskmateError> {
    let service = require_text("service", service)?;
    if plaintext.is_empty() {
        return Err(TaskmateError::InvalidInput("password must not be empty".to_string()));
    }
    let ciphertext = cipher.encrypt(plaintext)?;

    let fresh = PasswordEntry {
        user_id: user,
        service: service.clone(),
        password: ciphertext.clone(),
        created_at: now,
    };
    store
        .upsert(
            user,
            move |p: &PasswordEntry| p.service == service,
            move |p: &mut PasswordEntry| p.password = ciphertext,
            fresh,
        )
        .await?;
    Ok(())
}

/// Decrypt the secret for `service`, if one is stored.
pub async fn get_password(
    store: &RecordStore,
    cipher: &dyn SecretCipher,
    user: UserId,
    service: &str,
) -> Result<Option<SecretString>, TaskmateError> {
    let entries: Vec<PasswordEntry> = store.load_for(user).await?;
    entries
        .into_iter()
        .find(|p| p.service == service.trim())
        .map(|p| cipher.decrypt(&p.password))
        .transpose()
}

/// Service names with a stored secret, in storage order.
pub async fn list_services(store: &RecordStore, user: UserId) -> Result<Vec<String>, TaskmateError> {
    let entries: Vec<PasswordEntry> = store.load_for(user).await?;
    Ok(entries.into_iter().map(|p| p.service).collect())
}

pub async fn delete_password(
    store: &RecordStore,
    user: UserId,
    service: &str,
) -> Result<bool, TaskmateError> {
    let service = service.trim().to_string();
    store
        .delete_where(move |p: &PasswordEntry| p.user_id == user && p.service == service)
        .await
}
