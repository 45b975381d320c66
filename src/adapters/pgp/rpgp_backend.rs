use std::io::Cursor;

use pgp::composed::{
    Deserializable, Message, MessageBuilder, SignedPublicKey, SignedPublicSubKey, SignedSecretKey,
};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::{Password, PublicKeyTrait};
use rand::thread_rng;
use zeroize::Zeroizing;

use crate::core::errors::{Result, ToolkitError};
use crate::core::models::armored_message::ArmoredMessage;
use crate::core::models::key_material::{ArmoredKey, PRIVATE_KEY_FOOTER};
use crate::core::models::plaintext::{CHUNK_SIZE, PlaintextResult};
use crate::core::traits::pgp_backend::PgpBackend;

/// Encrypted to the key itself when unlocking, to prove the passphrase
/// opens the encryption subkey before any real message is touched.
const UNLOCK_PROBE: &[u8] = b"csirt-pgp unlock probe";

/// OpenPGP backend built on rPGP (pure Rust, no gpg-agent needed).
#[derive(Debug, Default, Clone, Copy)]
pub struct RpgpBackend;

impl RpgpBackend {
    pub fn new() -> Self {
        Self
    }
}

/// A parsed private key together with the passphrase that opens it.
pub struct UnlockedPgpKey {
    secret: SignedSecretKey,
    passphrase: Zeroizing<String>,
}

impl UnlockedPgpKey {
    fn password(&self) -> Password {
        Password::from(self.passphrase.as_str())
    }
}

impl PgpBackend for RpgpBackend {
    type Key = SignedSecretKey;
    type UnlockedKey = UnlockedPgpKey;

    fn read_armored_key(&self, key: &ArmoredKey) -> Result<SignedSecretKey> {
        let text = Zeroizing::new(normalize_key_armor(key.as_str()));
        let (secret, _headers) =
            SignedSecretKey::from_string(&text).map_err(|e| ToolkitError::KeyUnlock {
                reason: format!("cannot parse private key: {e}"),
            })?;
        Ok(secret)
    }

    fn unlock_key(&self, key: SignedSecretKey, passphrase: Option<&str>) -> Result<UnlockedPgpKey> {
        let unlocked = UnlockedPgpKey {
            secret: key,
            passphrase: Zeroizing::new(passphrase.unwrap_or_default().to_string()),
        };

        let public = SignedPublicKey::from(unlocked.secret.clone());
        let subkey = encryption_subkey(&public).ok_or_else(|| ToolkitError::KeyUnlock {
            reason: "private key has no encryption subkey".into(),
        })?;

        let probe = seal(subkey, UNLOCK_PROBE, None, false).map_err(|reason| ToolkitError::KeyUnlock {
            reason: format!("cannot build unlock probe: {reason}"),
        })?;
        let message = Message::from_bytes(&probe[..]).map_err(|e| ToolkitError::KeyUnlock {
            reason: format!("cannot read unlock probe: {e}"),
        })?;
        let opened = message
            .decrypt(&unlocked.password(), &unlocked.secret)
            .map_err(|e| ToolkitError::KeyUnlock {
                reason: format!("wrong passphrase or unusable key: {e}"),
            })
            .and_then(|m| {
                unpack(m).map_err(|reason| ToolkitError::KeyUnlock {
                    reason: format!("wrong passphrase or unusable key: {reason}"),
                })
            })?;

        if opened != UNLOCK_PROBE {
            return Err(ToolkitError::KeyUnlock {
                reason: "unlock probe did not round-trip".into(),
            });
        }
        Ok(unlocked)
    }

    fn decrypt(&self, message: &ArmoredMessage, key: &UnlockedPgpKey) -> Result<PlaintextResult> {
        let armored = message.armor_block().as_bytes();
        let (parsed, _headers) =
            Message::from_armor(Cursor::new(armored)).map_err(|e| ToolkitError::DecryptionFailed {
                reason: format!("cannot parse message: {e}"),
            })?;

        let decrypted = parsed
            .decrypt(&key.password(), &key.secret)
            .map_err(|e| ToolkitError::DecryptionFailed {
                reason: e.to_string(),
            })?;
        let data = unpack(decrypted).map_err(|reason| ToolkitError::DecryptionFailed { reason })?;

        if data.len() <= CHUNK_SIZE {
            return Ok(PlaintextResult::Complete(
                String::from_utf8_lossy(&data).into_owned(),
            ));
        }
        Ok(PlaintextResult::from_reader(Cursor::new(data)))
    }

    fn encrypt(
        &self,
        plaintext: &str,
        recipient_armored: &str,
        signer: Option<&UnlockedPgpKey>,
    ) -> Result<String> {
        let (public, _headers) = SignedPublicKey::from_string(recipient_armored).map_err(|e| {
            ToolkitError::EncryptionFailed {
                reason: format!("cannot parse recipient key: {e}"),
            }
        })?;
        let subkey = encryption_subkey(&public).ok_or_else(|| ToolkitError::EncryptionFailed {
            reason: "recipient key has no encryption subkey".into(),
        })?;

        let armored = seal(subkey, plaintext.as_bytes(), signer, true)
            .map_err(|reason| ToolkitError::EncryptionFailed { reason })?;
        String::from_utf8(armored).map_err(|e| ToolkitError::EncryptionFailed {
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &str {
        "rpgp"
    }
}

fn encryption_subkey(public: &SignedPublicKey) -> Option<&SignedPublicSubKey> {
    public
        .public_subkeys
        .iter()
        .find(|sub| sub.is_encryption_key())
}

/// Encrypt `data` to `recipient`, as armored text or raw packets,
/// optionally signed by the primary key of `signer`.
fn seal(
    recipient: &SignedPublicSubKey,
    data: &[u8],
    signer: Option<&UnlockedPgpKey>,
    armored: bool,
) -> std::result::Result<Vec<u8>, String> {
    let mut builder = MessageBuilder::from_bytes("", data.to_vec())
        .seipd_v1(thread_rng(), SymmetricKeyAlgorithm::AES256);
    builder
        .encrypt_to_key(thread_rng(), recipient)
        .map_err(|e| e.to_string())?;
    if let Some(key) = signer {
        builder.sign(&*key.secret, key.password(), HashAlgorithm::Sha256);
    }

    if armored {
        builder
            .to_armored_string(thread_rng(), Default::default())
            .map(String::into_bytes)
            .map_err(|e| e.to_string())
    } else {
        builder.to_vec(thread_rng()).map_err(|e| e.to_string())
    }
}

fn unpack(mut message: Message) -> std::result::Result<Vec<u8>, String> {
    while message.is_compressed() {
        message = message.decompress().map_err(|e| e.to_string())?;
    }
    message.as_data_vec().map_err(|e| e.to_string())
}

/// Drop blank lines directly before the footer.
///
/// Assembled keys always carry one; the armor reader wants the
/// checksum or last data line right above the footer.
fn normalize_key_armor(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let mut kept = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if line.is_empty()
            && lines[i + 1..]
                .iter()
                .find(|l| !l.is_empty())
                .is_some_and(|next| next.trim() == PRIVATE_KEY_FOOTER)
        {
            continue;
        }
        kept.push(*line);
    }

    let mut normalized = kept.join("\n");
    normalized.push('\n');
    normalized
}
