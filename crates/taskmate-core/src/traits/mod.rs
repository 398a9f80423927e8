// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented outside the core crate.

pub mod cipher;
pub mod messenger;

pub use cipher::SecretCipher;
pub use messenger::Messenger;
