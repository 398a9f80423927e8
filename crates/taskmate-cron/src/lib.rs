// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification scheduler for the Taskmate assistant bot.
//!
//! Four independent loops (timers, auto-messages, birthdays, calendar
//! events) periodically scan every user's records, evaluate due
//! conditions in the local timezone, and push notifications through a
//! [`Messenger`](taskmate_core::Messenger). There is no per-record timer:
//! each loop is a full pass over its collection followed by a sleep.
//!
//! A failure while handling one record is logged and the pass moves on.
//! [`NotificationScheduler::stop`] cancels pending sleeps and waits for
//! every loop to exit, after which nothing more is sent.

pub mod due;
pub mod messages;
pub mod scan;
pub mod scheduler;

pub use scan::{ScanKind, ScanReport, ScanSettings, Scanner};
pub use scheduler::NotificationScheduler;
