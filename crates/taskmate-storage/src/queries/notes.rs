// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-form notes.

use chrono::{DateTime, Utc};
use taskmate_core::records::Note;
use taskmate_core::{TaskmateError, UserId};

use super::require_text;
use crate::RecordStore;

pub async fn add_note(
    store: &RecordStore,
    user: UserId,
    title: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<Note, TaskmateError> {
    let note = Note {
        user_id: user,
        title: require_text("note title", title)?,
        content: content.trim().to_string(),
        created_at: now,
    };
    store.append(&note).await?;
    Ok(note)
}

pub async fn list_notes(store: &RecordStore, user: UserId) -> Result<Vec<Note>, TaskmateError> {
    store.load_for(user).await
}
