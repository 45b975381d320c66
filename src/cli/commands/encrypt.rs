use std::path::Path;

use crate::adapters::pgp::rpgp_backend::RpgpBackend;
use crate::cli::KeyArgs;
use crate::cli::commands::key_helpers;
use crate::cli::output;
use crate::core::errors::{Result, ToolkitError};
use crate::core::traits::pgp_backend::PgpBackend;

/// Execute the `csirt-pgp encrypt` command.
///
/// Encrypts plaintext from `--text`, FILE or stdin to the recipient's
/// public key and prints (or writes) the armored message. With `signer`
/// set, the team key is unlocked the same way `decrypt` does it and the
/// message is signed with it.
pub fn execute(
    file: Option<&str>,
    text: Option<&str>,
    recipient: Option<&str>,
    output_path: Option<&str>,
    signer: Option<&KeyArgs>,
) -> Result<()> {
    let config = key_helpers::load_config()?;

    let recipient_key = match recipient {
        Some(path) => key_helpers::read_existing(Path::new(path))?,
        None => std::env::var(&config.key.public_key_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ToolkitError::EncryptionFailed {
                reason: format!(
                    "no recipient key\n\n  Solutions:\n    \
                     → Pass an armored public key file: --recipient <path>\n    \
                     → Or export it in {}",
                    config.key.public_key_var
                ),
            })?,
    };

    let plaintext = key_helpers::read_input(file, text)?;
    let armored = match signer {
        Some(key) => {
            let session = key_helpers::unlock_decryptor(key, &config)?;
            session.encrypt_signed(&plaintext, &recipient_key)?
        }
        None => RpgpBackend::new().encrypt(&plaintext, &recipient_key, None)?,
    };
    tracing::debug!(
        signed = signer.is_some(),
        bytes = plaintext.len(),
        "message encrypted"
    );

    key_helpers::emit(&armored, output_path)?;
    if let Some(path) = output_path {
        output::success(&format!("Encrypted message written to {path}"));
    }
    Ok(())
}
