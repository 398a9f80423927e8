// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! To-do list operations.

use chrono::{DateTime, Utc};
use taskmate_core::records::Task;
use taskmate_core::{Collection, TaskmateError, UserId};

use super::{index_not_found, require_text};
use crate::RecordStore;

pub async fn add_task(
    store: &RecordStore,
    user: UserId,
    text: &str,
    now: DateTime<Utc>,
) -> Result<Task, TaskmateError> {
    let task = Task {
        user_id: user,
        task: require_text("task", text)?,
        created_at: now,
        completed: false,
    };
    store.append(&task).await?;
    Ok(task)
}

pub async fn list_tasks(store: &RecordStore, user: UserId) -> Result<Vec<Task>, TaskmateError> {
    store.load_for(user).await
}

pub async fn edit_task(
    store: &RecordStore,
    user: UserId,
    index: usize,
    text: &str,
) -> Result<Task, TaskmateError> {
    let text = require_text("task", text)?;
    store
        .update_at(user, index, move |t: &mut Task| t.task = text)
        .await?
        .ok_or_else(|| index_not_found(Collection::Tasks, index))
}

pub async fn set_task_completed(
    store: &RecordStore,
    user: UserId,
    index: usize,
    completed: bool,
) -> Result<Task, TaskmateError> {
    store
        .update_at(user, index, move |t: &mut Task| t.completed = completed)
        .await?
        .ok_or_else(|| index_not_found(Collection::Tasks, index))
}

pub async fn delete_task(
    store: &RecordStore,
    user: UserId,
    index: usize,
) -> Result<Task, TaskmateError> {
    store
        .delete_at(user, index)
        .await?
        .ok_or_else(|| index_not_found(Collection::Tasks, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::open_store;
    use chrono::TimeDelta;

    async fn seed(store: &RecordStore, user: UserId, texts: &[&str]) {
        let base = Utc::now();
        for (i, text) in texts.iter().enumerate() {
            add_task(store, user, text, base + TimeDelta::milliseconds(i as i64))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn index_is_scoped_to_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        seed(&store, UserId(1), &["mine 1"]).await;
        seed(&store, UserId(2), &["theirs 1", "theirs 2"]).await;
        seed(&store, UserId(1), &["mine 2"]).await;

        let done = set_task_completed(&store, UserId(1), 2, true).await.unwrap();
        assert_eq!(done.task, "mine 2");

        let theirs = list_tasks(&store, UserId(2)).await.unwrap();
        assert!(theirs.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn resolved_key_survives_concurrent_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = UserId(1);
        seed(&store, user, &["A", "B", "C"]).await;

        // The user saw "3. C" and asked to complete it; B is deleted first.
        let key = store.key_at::<Task>(user, 3).await.unwrap().unwrap();
        delete_task(&store, user, 2).await.unwrap();

        let found = store
            .update_by_key(user, key, |t: &mut Task| t.completed = true)
            .await
            .unwrap();
        assert!(found);

        let tasks = list_tasks(&store, user).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task, "A");
        assert!(!tasks[0].completed);
        assert_eq!(tasks[1].task, "C");
        assert!(tasks[1].completed);
    }

    #[tokio::test]
    async fn deleted_target_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = UserId(1);
        seed(&store, user, &["A", "B"]).await;

        let key = store.key_at::<Task>(user, 2).await.unwrap().unwrap();
        delete_task(&store, user, 2).await.unwrap();

        let found = store
            .update_by_key(user, key, |t: &mut Task| t.completed = true)
            .await
            .unwrap();
        assert!(!found);
        assert!(!list_tasks(&store, user).await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn edit_out_of_range_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let err = edit_task(&store, UserId(1), 1, "new").await.unwrap_err();
        assert!(matches!(err, TaskmateError::NotFound { collection: Collection::Tasks, .. }));
    }

    #[tokio::test]
    async fn blank_task_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let err = add_task(&store, UserId(1), "   ", Utc::now()).await.unwrap_err();
        assert!(matches!(err, TaskmateError::InvalidInput(_)));
    }
}
