// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long texts to fit Telegram's per-message limit.

/// Maximum characters in a single Telegram text message.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Splits `text` into chunks of at most `limit` characters.
///
/// Breaks after the last newline inside the window when there is one,
/// otherwise at the character limit. Never splits inside a UTF-8 sequence.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    if limit == 0 || text.is_empty() {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.chars().count() > limit {
        // Byte offset just past the `limit`-th char.
        let hard = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = match rest[..hard].rfind('\n') {
            Some(nl) if nl > 0 => nl + 1,
            _ => hard,
        };
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}
