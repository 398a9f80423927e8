// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite record store for the Taskmate assistant bot.
//!
//! Each collection is an ordered sequence of JSON records in a single
//! `records` table. Access is serialized through `tokio-rusqlite`'s
//! background thread, and every read-modify-write runs inside one
//! transaction on that thread, so command-layer edits and scheduler
//! marker writes cannot tear each other.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::RecordStore;
