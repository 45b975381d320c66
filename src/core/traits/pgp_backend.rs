use crate::core::errors::Result;
use crate::core::models::armored_message::ArmoredMessage;
use crate::core::models::key_material::ArmoredKey;
use crate::core::models::plaintext::PlaintextResult;

/// Port for the OpenPGP library.
///
/// Implementations live in `adapters::pgp` (e.g. RpgpBackend).
/// The core layer only depends on this trait, never on a concrete library.
pub trait PgpBackend: Send + Sync {
    /// A parsed, still locked private key.
    type Key;

    /// A private key whose passphrase has been verified.
    /// Shared read-only between concurrent decrypt calls.
    type UnlockedKey: Send + Sync;

    /// Parse an armored private key block.
    fn read_armored_key(&self, key: &ArmoredKey) -> Result<Self::Key>;

    /// Verify the passphrase and return a key usable for decryption.
    fn unlock_key(&self, key: Self::Key, passphrase: Option<&str>) -> Result<Self::UnlockedKey>;

    /// Decrypt a validated message with an unlocked key.
    fn decrypt(&self, message: &ArmoredMessage, key: &Self::UnlockedKey)
    -> Result<PlaintextResult>;

    /// Encrypt text for an armored public key, returning an armored message.
    /// With a `signer`, the message also carries its signature.
    fn encrypt(
        &self,
        plaintext: &str,
        recipient_armored: &str,
        signer: Option<&Self::UnlockedKey>,
    ) -> Result<String>;

    /// Human-readable name of this backend (e.g. "rpgp").
    fn name(&self) -> &str;
}
