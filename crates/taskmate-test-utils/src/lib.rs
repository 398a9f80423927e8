// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Taskmate integration tests.
//!
//! Provides a capturing messenger, a hand-driven clock, and a harness that
//! wires them to a temporary record store, so scheduler behavior can be
//! tested without Telegram or wall-clock waits.
//!
//! # Components
//!
//! - [`MockMessenger`] - Captures sent notifications, optionally failing per user
//! - [`ManualClock`] - A clock that only moves when told to
//! - [`TestHarness`] - Temp store plus the two mocks and a scheduler config

pub mod harness;
pub mod manual_clock;
pub mod mock_messenger;

pub use harness::TestHarness;
pub use manual_clock::ManualClock;
pub use mock_messenger::MockMessenger;
