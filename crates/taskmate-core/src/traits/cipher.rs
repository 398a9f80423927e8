// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption capability for secrets at rest.

use secrecy::SecretString;

use crate::error::TaskmateError;

/// Opaque encrypt/decrypt capability used for stored passwords.
///
/// Ciphertext is a printable string so it can live inside a JSON record.
pub trait SecretCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, TaskmateError>;

    fn decrypt(&self, ciphertext: &str) -> Result<SecretString, TaskmateError>;
}
