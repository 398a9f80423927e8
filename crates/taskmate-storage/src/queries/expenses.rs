// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expense log.

use chrono::{DateTime, Utc};
use taskmate_core::records::Expense;
use taskmate_core::{TaskmateError, UserId};

use super::require_text;
use crate::RecordStore;

pub async fn add_expense(
    store: &RecordStore,
    user: UserId,
    amount: f64,
    description: &str,
    now: DateTime<Utc>,
) -> Result<Expense, TaskmateError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TaskmateError::InvalidInput(format!(
            "expense amount must be a positive number, got {amount}"
        )));
    }
    let expense = Expense {
        user_id: user,
        amount,
        description: require_text("description", description)?,
        date: now,
    };
    store.append(&expense).await?;
    Ok(expense)
}

pub async fn list_expenses(
    store: &RecordStore,
    user: UserId,
) -> Result<Vec<Expense>, TaskmateError> {
    store.load_for(user).await
}

pub async fn total_expenses(store: &RecordStore, user: UserId) -> Result<f64, TaskmateError> {
    Ok(list_expenses(store, user).await?.iter().map(|e| e.amount).sum())
}
