use crate::core::errors::{Result, ToolkitError};
use crate::core::models::armored_message::ArmoredMessage;
use crate::core::models::key_material::ArmoredKey;
use crate::core::services::message_parser;
use crate::core::traits::pgp_backend::PgpBackend;

/// Decrypts messages with a private key unlocked once, up front.
/// The same key signs outgoing messages.
///
/// The unlocked key never changes after construction, so one
/// `Decryptor` can be shared (behind an `Arc`) by concurrent calls.
pub struct Decryptor<B: PgpBackend> {
    backend: B,
    key: B::UnlockedKey,
}

impl<B: PgpBackend> Decryptor<B> {
    /// Parse and unlock `key`. Every failure here is a `KeyUnlock` error.
    pub fn unlock(backend: B, key: &ArmoredKey, passphrase: Option<&str>) -> Result<Self> {
        let parsed = backend.read_armored_key(key).map_err(into_unlock_error)?;
        let unlocked = backend
            .unlock_key(parsed, passphrase)
            .map_err(into_unlock_error)?;

        tracing::debug!(backend = backend.name(), "private key unlocked");
        Ok(Self {
            backend,
            key: unlocked,
        })
    }

    /// Decrypt a validated message into a single string.
    pub fn decrypt(&self, message: &ArmoredMessage) -> Result<String> {
        let plaintext = self
            .backend
            .decrypt(message, &self.key)
            .map_err(|e| match e {
                ToolkitError::DecryptionFailed { .. } | ToolkitError::StreamConsumption { .. } => e,
                other => ToolkitError::DecryptionFailed {
                    reason: other.to_string(),
                },
            })?;
        plaintext.into_string()
    }

    /// Validate raw input, then decrypt it.
    pub fn decrypt_text(&self, raw: &str) -> Result<String> {
        let message = message_parser::validate(raw)?;
        self.decrypt(&message)
    }

    /// Encrypt for `recipient_armored`, signed with the unlocked key.
    pub fn encrypt_signed(&self, plaintext: &str, recipient_armored: &str) -> Result<String> {
        self.backend.encrypt(plaintext, recipient_armored, Some(&self.key))
    }
}

fn into_unlock_error(e: ToolkitError) -> ToolkitError {
    match e {
        ToolkitError::KeyUnlock { .. } => e,
        other => ToolkitError::KeyUnlock {
            reason: other.to_string(),
        },
    }
}
