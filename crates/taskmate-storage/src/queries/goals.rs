// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Goals with clamped percent progress.

use chrono::{DateTime, Utc};
use taskmate_core::calendar::parse_event_date;
use taskmate_core::records::Goal;
use taskmate_core::{Collection, TaskmateError, UserId};
use uuid::Uuid;

use super::require_text;
use crate::RecordStore;

pub async fn create_goal(
    store: &RecordStore,
    user: UserId,
    title: &str,
    description: &str,
    target_date: &str,
    now: DateTime<Utc>,
) -> Result<Goal, TaskmateError> {
    let goal = Goal {
        id: Uuid::new_v4(),
        user_id: user,
        title: require_text("goal title", title)?,
        description: description.trim().to_string(),
        target_date: parse_event_date(target_date)?,
        created_at: now,
        progress: 0,
    };
    store.append(&goal).await?;
    Ok(goal)
}

pub async fn list_goals(store: &RecordStore, user: UserId) -> Result<Vec<Goal>, TaskmateError> {
    store.load_for(user).await
}

/// Set progress on goal `id`, clamped to `0..=100`.
pub async fn update_progress(
    store: &RecordStore,
    user: UserId,
    id: Uuid,
    percent: i64,
) -> Result<Goal, TaskmateError> {
    let not_found = || TaskmateError::NotFound {
        collection: Collection::Goals,
        detail: id.to_string(),
    };
    let found = store
        .update_by_key(user, id, move |g: &mut Goal| g.set_progress(percent))
        .await?;
    if !found {
        return Err(not_found());
    }
    list_goals(store, user)
        .await?
        .into_iter()
        .find(|g| g.id == id)
        .ok_or_else(not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::open_store;

    #[tokio::test]
    async fn progress_is_clamped_on_update() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let user = UserId(5);
        let goal = create_goal(&store, user, "Read 20 books", "", "2025-12-31", Utc::now())
            .await
            .unwrap();

        assert_eq!(update_progress(&store, user, goal.id, 140).await.unwrap().progress, 100);
        assert_eq!(update_progress(&store, user, goal.id, -3).await.unwrap().progress, 0);
        assert_eq!(update_progress(&store, user, goal.id, 55).await.unwrap().progress, 55);
    }

    #[tokio::test]
    async fn unknown_goal_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        let err = update_progress(&store, UserId(5), Uuid::new_v4(), 10).await.unwrap_err();
        assert!(matches!(err, TaskmateError::NotFound { collection: Collection::Goals, .. }));
    }
}
