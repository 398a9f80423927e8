// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic collection access over the `records` table.
//!
//! Storage order is row id order, which is insertion order. A whole
//! collection `save` deletes and re-inserts rows, so ids stay ascending in
//! the order given.

use rusqlite::params;
use serde_json::Value;
use taskmate_config::model::StorageConfig;
use taskmate_core::{Collection, Record, TaskmateError, UserId};
use tracing::warn;

use crate::database::{Database, map_tr_err};

/// Typed access to every record collection.
#[derive(Clone)]
pub struct RecordStore {
    db: Database,
}

/// A pending write produced while editing a collection.
enum Change<R> {
    Insert(R),
    Update(i64, R),
    Delete(i64),
}

impl RecordStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database described by `config` and wrap it.
    pub async fn open(config: &StorageConfig) -> Result<Self, TaskmateError> {
        Ok(Self::new(Database::open(config).await?))
    }

    pub async fn close(self) -> Result<(), TaskmateError> {
        self.db.close().await
    }

    /// Every record of `R` across all users, in storage order.
    ///
    /// Rows that fail to decode are skipped with a warning.
    pub async fn load<R: Record>(&self) -> Result<Vec<R>, TaskmateError> {
        self.read::<R>(None).await
    }

    /// The records of `R` owned by `user`, in storage order.
    pub async fn load_for<R: Record>(&self, user: UserId) -> Result<Vec<R>, TaskmateError> {
        self.read::<R>(Some(user)).await
    }

    /// Records of `R` matching `predicate`, across all users.
    pub async fn find<R, P>(&self, predicate: P) -> Result<Vec<R>, TaskmateError>
    where
        R: Record,
        P: Fn(&R) -> bool,
    {
        let mut records = self.load::<R>().await?;
        records.retain(|r| predicate(r));
        Ok(records)
    }

    /// Replace the whole collection with `records`, atomically.
    pub async fn save<R: Record>(&self, records: Vec<R>) -> Result<(), TaskmateError> {
        let collection = R::COLLECTION.to_string();
        let rows = records
            .iter()
            .map(|r| encode(r).map(|body| (r.owner().0, body)))
            .collect::<Result<Vec<_>, _>>()?;

        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM records WHERE collection = ?1",
                    params![collection],
                )?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO records (collection, user_id, body) VALUES (?1, ?2, ?3)",
                    )?;
                    for (user_id, body) in &rows {
                        stmt.execute(params![collection, user_id, body])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Append one record at the end of its collection.
    pub async fn append<R: Record>(&self, record: &R) -> Result<(), TaskmateError> {
        let collection = R::COLLECTION.to_string();
        let user_id = record.owner().0;
        let body = encode(record)?;

        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO records (collection, user_id, body) VALUES (?1, ?2, ?3)",
                    params![collection, user_id, body],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Apply `mutation` to every record matching `predicate`. Returns
    /// whether anything matched.
    pub async fn update_where<R, P, M>(&self, predicate: P, mut mutation: M) -> Result<bool, TaskmateError>
    where
        R: Record,
        P: Fn(&R) -> bool + Send + 'static,
        M: FnMut(&mut R) + Send + 'static,
    {
        self.edit::<R, _, _>(None, move |rows| {
            let changes: Vec<_> = rows
                .into_iter()
                .filter(|(_, r)| predicate(r))
                .map(|(id, mut r)| {
                    mutation(&mut r);
                    Change::Update(id, r)
                })
                .collect();
            let found = !changes.is_empty();
            (changes, found)
        })
        .await
    }

    /// Delete every record matching `predicate`. Returns whether anything matched.
    pub async fn delete_where<R, P>(&self, predicate: P) -> Result<bool, TaskmateError>
    where
        R: Record,
        P: Fn(&R) -> bool + Send + 'static,
    {
        self.edit::<R, _, _>(None, move |rows| {
            let changes: Vec<_> = rows
                .into_iter()
                .filter(|(_, r)| predicate(r))
                .map(|(id, _)| Change::Delete(id))
                .collect();
            let found = !changes.is_empty();
            (changes, found)
        })
        .await
    }

    /// Mutate the user's first record matching `predicate`, or append
    /// `fresh` when none matches. Returns `true` if an existing record was
    /// updated.
    pub async fn upsert<R, P, M>(
        &self,
        user: UserId,
        predicate: P,
        mutation: M,
        fresh: R,
    ) -> Result<bool, TaskmateError>
    where
        R: Record,
        P: Fn(&R) -> bool + Send + 'static,
        M: FnOnce(&mut R) + Send + 'static,
    {
        self.edit::<R, _, _>(Some(user), move |rows| {
            match rows.into_iter().find(|(_, r)| predicate(r)) {
                Some((id, mut record)) => {
                    mutation(&mut record);
                    (vec![Change::Update(id, record)], true)
                }
                None => (vec![Change::Insert(fresh)], false),
            }
        })
        .await
    }

    /// Resolve a user-visible 1-based position to the record's stable key.
    pub async fn key_at<R: Record>(
        &self,
        user: UserId,
        index: usize,
    ) -> Result<Option<R::Key>, TaskmateError> {
        let records = self.load_for::<R>(user).await?;
        Ok(nth(records, index).map(|r| r.key()))
    }

    /// Mutate the user's record with `key`. Returns `false` if it no longer exists.
    pub async fn update_by_key<R, M>(
        &self,
        user: UserId,
        key: R::Key,
        mutation: M,
    ) -> Result<bool, TaskmateError>
    where
        R: Record,
        M: FnOnce(&mut R) + Send + 'static,
    {
        self.edit::<R, _, _>(Some(user), move |rows| {
            match rows.into_iter().find(|(_, r)| r.key() == key) {
                Some((id, mut record)) => {
                    mutation(&mut record);
                    (vec![Change::Update(id, record)], true)
                }
                None => (Vec::new(), false),
            }
        })
        .await
    }

    /// Delete the user's record with `key`. Returns `false` if it no longer exists.
    pub async fn delete_by_key<R: Record>(
        &self,
        user: UserId,
        key: R::Key,
    ) -> Result<bool, TaskmateError> {
        self.edit::<R, _, _>(Some(user), move |rows| {
            match rows.into_iter().find(|(_, r)| r.key() == key) {
                Some((id, _)) => (vec![Change::Delete(id)], true),
                None => (Vec::new(), false),
            }
        })
        .await
    }

    /// Mutate the user's record at a 1-based position, resolved and applied
    /// in one transaction. Returns the record as written.
    pub async fn update_at<R, M>(
        &self,
        user: UserId,
        index: usize,
        mutation: M,
    ) -> Result<Option<R>, TaskmateError>
    where
        R: Record,
        M: FnOnce(&mut R) + Send + 'static,
    {
        self.edit::<R, _, _>(Some(user), move |rows| match nth(rows, index) {
            Some((id, mut record)) => {
                mutation(&mut record);
                (vec![Change::Update(id, record.clone())], Some(record))
            }
            None => (Vec::new(), None),
        })
        .await
    }

    /// Delete the user's record at a 1-based position. Returns the removed record.
    pub async fn delete_at<R: Record>(
        &self,
        user: UserId,
        index: usize,
    ) -> Result<Option<R>, TaskmateError> {
        self.edit::<R, _, _>(Some(user), move |rows| match nth(rows, index) {
            Some((id, record)) => (vec![Change::Delete(id)], Some(record)),
            None => (Vec::new(), None),
        })
        .await
    }

    /// Raw JSON bodies of a collection, optionally for one user.
    pub async fn dump(
        &self,
        collection: Collection,
        user: Option<UserId>,
    ) -> Result<Vec<Value>, TaskmateError> {
        let name = collection.to_string();
        let rows = self
            .db
            .connection()
            .call(move |conn| select_rows(conn, &name, user.map(|u| u.0)))
            .await
            .map_err(map_tr_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, body)| match serde_json::from_str(&body) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(%collection, row_id = id, error = %e, "skipping unreadable record");
                    None
                }
            })
            .collect())
    }

    async fn read<R: Record>(&self, user: Option<UserId>) -> Result<Vec<R>, TaskmateError> {
        let collection = R::COLLECTION.to_string();
        let rows = self
            .db
            .connection()
            .call(move |conn| select_rows(conn, &collection, user.map(|u| u.0)))
            .await
            .map_err(map_tr_err)?;
        Ok(decode::<R>(rows).into_iter().map(|(_, r)| r).collect())
    }

    /// Load, edit, and write back inside a single transaction on the
    /// storage thread.
    async fn edit<R, T, F>(&self, user: Option<UserId>, edit: F) -> Result<T, TaskmateError>
    where
        R: Record,
        T: Send + 'static,
        F: FnOnce(Vec<(i64, R)>) -> (Vec<Change<R>>, T) + Send + 'static,
    {
        let collection = R::COLLECTION.to_string();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let rows = decode::<R>(select_rows(&tx, &collection, user.map(|u| u.0))?);
                let (changes, outcome) = edit(rows);
                for change in changes {
                    match change {
                        Change::Insert(record) => {
                            tx.execute(
                                "INSERT INTO records (collection, user_id, body) VALUES (?1, ?2, ?3)",
                                params![collection, record.owner().0, to_sql_body(&record)?],
                            )?;
                        }
                        Change::Update(id, record) => {
                            let body = to_sql_body(&record)?;
                            tx.execute(
                                "UPDATE records SET body = ?1, user_id = ?2 WHERE id = ?3",
                                params![body, record.owner().0, id],
                            )?;
                        }
                        Change::Delete(id) => {
                            tx.execute("DELETE FROM records WHERE id = ?1", params![id])?;
                        }
                    }
                }
                tx.commit()?;
                Ok(outcome)
            })
            .await
            .map_err(map_tr_err)
    }
}

fn select_rows(
    conn: &rusqlite::Connection,
    collection: &str,
    user: Option<i64>,
) -> Result<Vec<(i64, String)>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, body FROM records
         WHERE collection = ?1 AND (?2 IS NULL OR user_id = ?2)
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![collection, user], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

fn decode<R: Record>(rows: Vec<(i64, String)>) -> Vec<(i64, R)> {
    rows.into_iter()
        .filter_map(|(id, body)| match serde_json::from_str::<R>(&body) {
            Ok(record) => Some((id, record)),
            Err(e) => {
                warn!(collection = %R::COLLECTION, row_id = id, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

fn encode<R: Record>(record: &R) -> Result<String, TaskmateError> {
    serde_json::to_string(record).map_err(|e| TaskmateError::Storage {
        source: Box::new(e),
    })
}

fn to_sql_body<R: Record>(record: &R) -> Result<String, rusqlite::Error> {
    serde_json::to_string(record).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn nth<T>(items: Vec<T>, index: usize) -> Option<T> {
    index.checked_sub(1).and_then(|i| items.into_iter().nth(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use taskmate_core::records::{Note, Task};

    async fn open_store(dir: &tempfile::TempDir) -> RecordStore {
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        RecordStore::open(&config).await.unwrap()
    }

    fn task(user: i64, text: &str, minute: u32) -> Task {
        Task {
            user_id: UserId(user),
            task: text.into(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, minute, 0).unwrap(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn append_preserves_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;

        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            store.append(&task(1, text, i as u32)).await.unwrap();
        }
        store.append(&task(2, "other", 9)).await.unwrap();

        let mine: Vec<_> = store
            .load_for::<Task>(UserId(1))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.task)
            .collect();
        assert_eq!(mine, vec!["a", "b", "c"]);
        assert_eq!(store.load::<Task>().await.unwrap().len(), 4);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.load::<Note>().await.unwrap().is_empty());
        assert!(store.load_for::<Task>(UserId(5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.append(&task(1, "good", 0)).await.unwrap();

        store
            .db
            .connection()
            .call(|conn| {
                conn.execute(
                    "INSERT INTO records (collection, user_id, body) VALUES ('tasks', 1, '{\"task\": 5}')",
                    [],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
            .unwrap();
        store.append(&task(1, "also good", 1)).await.unwrap();

        let tasks = store.load_for::<Task>(UserId(1)).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(store.dump(Collection::Tasks, Some(UserId(1))).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn save_replaces_whole_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.append(&task(1, "old", 0)).await.unwrap();

        store
            .save(vec![task(2, "x", 1), task(1, "y", 2)])
            .await
            .unwrap();

        let all: Vec<_> = store.load::<Task>().await.unwrap().into_iter().map(|t| t.task).collect();
        assert_eq!(all, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn update_and_delete_where_report_matches() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.append(&task(1, "a", 0)).await.unwrap();
        store.append(&task(2, "b", 1)).await.unwrap();

        let found = store
            .update_where::<Task, _, _>(|t| t.user_id == UserId(2), |t| t.completed = true)
            .await
            .unwrap();
        assert!(found);
        let missing = store
            .update_where::<Task, _, _>(|t| t.task == "zzz", |t| t.completed = true)
            .await
            .unwrap();
        assert!(!missing);

        let done = store.find::<Task, _>(|t| t.completed).await.unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].task, "b");

        assert!(store.delete_where::<Task, _>(|t| t.task == "a").await.unwrap());
        assert!(!store.delete_where::<Task, _>(|t| t.task == "a").await.unwrap());
    }

    #[tokio::test]
    async fn index_zero_and_out_of_range_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir).await;
        store.append(&task(1, "only", 0)).await.unwrap();

        assert!(store.key_at::<Task>(UserId(1), 0).await.unwrap().is_none());
        assert!(store.key_at::<Task>(UserId(1), 2).await.unwrap().is_none());
        assert!(store.delete_at::<Task>(UserId(1), 5).await.unwrap().is_none());
        assert!(store.delete_at::<Task>(UserId(2), 1).await.unwrap().is_none());
    }
}
