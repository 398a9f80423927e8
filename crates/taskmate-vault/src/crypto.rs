// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] draws a fresh 96-bit nonce from the system CSPRNG.

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use taskmate_core::TaskmateError;

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, TaskmateError> {
    UnboundKey::new(&AES_256_GCM, key)
        .map(LessSafeKey::new)
        .map_err(|_| TaskmateError::Vault("failed to create AES-256-GCM key".to_string()))
}

/// Encrypt `plaintext`, returning `(ciphertext_with_tag, nonce)`.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), TaskmateError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| TaskmateError::Vault("failed to generate random nonce".to_string()))?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut in_out,
    )
    .map_err(|_| TaskmateError::Vault("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt output of [`seal`]. Fails on a wrong key or tampered data.
pub fn open(
    key: &[u8; 32],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>, TaskmateError> {
    let key = aead_key(key)?;

    let mut in_out = ciphertext.to_vec();
    let plaintext = key
        .open_in_place(Nonce::assume_unique_for_key(*nonce), Aad::empty(), &mut in_out)
        .map_err(|_| {
            TaskmateError::Vault("decryption failed: wrong key or corrupted data".to_string())
        })?;

    Ok(plaintext.to_vec())
}

/// Generate a random 32-byte key.
pub fn generate_random_key() -> Result<[u8; 32], TaskmateError> {
    let mut key = [0u8; 32];
    SystemRandom::new()
        .fill(&mut key)
        .map_err(|_| TaskmateError::Vault("failed to generate random key".to_string()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = generate_random_key().unwrap();
        let (ciphertext, nonce) = seal(&key, b"correct horse battery staple").unwrap();
        assert_eq!(open(&key, &nonce, &ciphertext).unwrap(), b"correct horse battery staple");
    }

    #[test]
    fn nonces_differ_between_seals() {
        let key = generate_random_key().unwrap();
        let (ct1, n1) = seal(&key, b"same").unwrap();
        let (ct2, n2) = seal(&key, b"same").unwrap();
        assert_ne!(n1, n2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn tag_is_appended() {
        let key = generate_random_key().unwrap();
        let (ciphertext, _) = seal(&key, b"hello").unwrap();
        assert_eq!(ciphertext.len(), 5 + 16);
    }

    #[test]
    fn tampering_is_detected() {
        let key = generate_random_key().unwrap();
        let (mut ciphertext, nonce) = seal(&key, b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&key, &nonce, &ciphertext).is_err());
    }
}
