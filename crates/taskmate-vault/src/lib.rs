// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encryption for passwords stored in the record store.

pub mod cipher;
pub mod crypto;

pub use cipher::{AesGcmCipher, KeySource};
