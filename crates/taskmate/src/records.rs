// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `taskmate records` command implementation.

use taskmate_config::TaskmateConfig;
use taskmate_core::{Collection, TaskmateError, UserId};
use taskmate_storage::RecordStore;

/// Prints every record of `collection` (optionally one user's) as pretty
/// JSON, one document per record.
pub async fn run_records(
    config: &TaskmateConfig,
    collection: Collection,
    user: Option<UserId>,
) -> Result<(), TaskmateError> {
    let store = RecordStore::open(&config.storage).await?;
    let rendered = render_records(&store, collection, user).await;
    store.close().await?;

    let rendered = rendered?;
    if rendered.is_empty() {
        eprintln!("no {collection} records");
    }
    for doc in rendered {
        println!("{doc}");
    }
    Ok(())
}

pub(crate) async fn render_records(
    store: &RecordStore,
    collection: Collection,
    user: Option<UserId>,
) -> Result<Vec<String>, TaskmateError> {
    store
        .dump(collection, user)
        .await?
        .iter()
        .map(|value| {
            serde_json::to_string_pretty(value)
                .map_err(|e| TaskmateError::Internal(format!("failed to render record: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskmate_storage::queries::notes;
    use taskmate_test_utils::TestHarness;

    #[tokio::test]
    async fn renders_one_users_records() {
        let harness = TestHarness::builder().build().await.unwrap();
        let now = chrono::Utc::now();
        notes::add_note(&harness.store, UserId(1), "groceries", "eggs", now)
            .await
            .unwrap();
        notes::add_note(&harness.store, UserId(2), "ideas", "bot", now)
            .await
            .unwrap();

        let all = render_records(&harness.store, Collection::Notes, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let mine = render_records(&harness.store, Collection::Notes, Some(UserId(1)))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert!(mine[0].contains("\"title\": \"groceries\""));
    }
}
