// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`SecretCipher`] backed by AES-256-GCM.
//!
//! Ciphertext is `base64(nonce || sealed)` so it fits in a JSON string field.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use ring::aead::NONCE_LEN;
use secrecy::SecretString;
use taskmate_config::model::VaultConfig;
use taskmate_core::{SecretCipher, TaskmateError};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{generate_random_key, open, seal};

/// Environment variable consulted when `vault.key` is unset.
pub const KEY_ENV_VAR: &str = "ENCRYPTION_KEY";

/// Where the active key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Config,
    Environment,
    /// Generated at startup; secrets stored with it are unreadable after restart.
    Ephemeral,
}

/// AES-256-GCM cipher holding a zeroize-on-drop key.
pub struct AesGcmCipher {
    key: Zeroizing<[u8; 32]>,
}

impl AesGcmCipher {
    pub fn from_key(key: [u8; 32]) -> Self {
        Self {
            key: Zeroizing::new(key),
        }
    }

    /// Decode a 32-byte key from standard or URL-safe base64.
    pub fn from_base64(encoded: &str) -> Result<Self, TaskmateError> {
        let encoded = encoded.trim();
        let decoded = [STANDARD, URL_SAFE, STANDARD_NO_PAD, URL_SAFE_NO_PAD]
            .iter()
            .find_map(|engine| engine.decode(encoded).ok())
            .map(Zeroizing::new)
            .ok_or_else(|| TaskmateError::Vault("encryption key is not valid base64".to_string()))?;

        let key: [u8; 32] = decoded.as_slice().try_into().map_err(|_| {
            TaskmateError::Vault(format!(
                "encryption key must decode to 32 bytes, got {}",
                decoded.len()
            ))
        })?;
        Ok(Self::from_key(key))
    }

    /// A cipher with a freshly generated key.
    pub fn random() -> Result<Self, TaskmateError> {
        generate_random_key().map(Self::from_key)
    }

    /// Build the cipher from `vault.key`, then `ENCRYPTION_KEY`, then an
    /// ephemeral key.
    pub fn from_config(config: &VaultConfig) -> Result<(Self, KeySource), TaskmateError> {
        let from_env = std::env::var(KEY_ENV_VAR).ok().map(Zeroizing::new);
        resolve(config.key.as_deref(), from_env.as_ref().map(|k| k.as_str()))
    }
}

fn resolve(
    configured: Option<&str>,
    from_env: Option<&str>,
) -> Result<(AesGcmCipher, KeySource), TaskmateError> {
    if let Some(key) = configured {
        info!("using encryption key from configuration");
        return Ok((AesGcmCipher::from_base64(key)?, KeySource::Config));
    }
    if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
        info!(var = KEY_ENV_VAR, "using encryption key from environment");
        return Ok((AesGcmCipher::from_base64(key)?, KeySource::Environment));
    }
    warn!(
        var = KEY_ENV_VAR,
        "no encryption key configured; using an ephemeral key, stored passwords will not survive a restart"
    );
    Ok((AesGcmCipher::random()?, KeySource::Ephemeral))
}

impl SecretCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, TaskmateError> {
        let (sealed, nonce) = seal(&self.key, plaintext.as_bytes())?;
        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        Ok(STANDARD.encode(blob))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<SecretString, TaskmateError> {
        let blob = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| TaskmateError::Vault("ciphertext is not valid base64".to_string()))?;
        if blob.len() < NONCE_LEN {
            return Err(TaskmateError::Vault("ciphertext is truncated".to_string()));
        }

        let (nonce, sealed) = blob.split_at(NONCE_LEN);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        nonce_bytes.copy_from_slice(nonce);

        let plaintext = Zeroizing::new(open(&self.key, &nonce_bytes, sealed)?);
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| TaskmateError::Vault("decrypted secret is not UTF-8".to_string()))?;
        Ok(SecretString::from(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const KEY_B64: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = AesGcmCipher::random().unwrap();
        let ct = cipher.encrypt("p@ssw0rd").unwrap();
        assert_ne!(ct, "p@ssw0rd");
        assert_eq!(cipher.decrypt(&ct).unwrap().expose_secret(), "p@ssw0rd");
    }

    #[test]
    fn key_accepts_standard_and_url_safe_base64() {
        let standard = AesGcmCipher::from_base64(KEY_B64).unwrap();
        let url_safe = AesGcmCipher::from_base64(&KEY_B64.replace('+', "-").replace('/', "_")).unwrap();
        let ct = standard.encrypt("shared").unwrap();
        assert_eq!(url_safe.decrypt(&ct).unwrap().expose_secret(), "shared");
    }

    #[test]
    fn short_key_is_rejected() {
        let err = AesGcmCipher::from_base64("c2hvcnQ=").err().unwrap();
        assert!(err.to_string().contains("32 bytes"));
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let cipher = AesGcmCipher::random().unwrap();
        assert!(cipher.decrypt("AAAA").is_err());
        assert!(cipher.decrypt("not base64 at all!").is_err());
    }

    #[test]
    fn key_resolution_order() {
        let (_, source) = resolve(Some(KEY_B64), Some(KEY_B64)).unwrap();
        assert_eq!(source, KeySource::Config);

        let (_, source) = resolve(None, Some(KEY_B64)).unwrap();
        assert_eq!(source, KeySource::Environment);

        let (_, source) = resolve(None, Some("  ")).unwrap();
        assert_eq!(source, KeySource::Ephemeral);

        assert!(resolve(Some("bogus"), None).is_err());
    }
}
