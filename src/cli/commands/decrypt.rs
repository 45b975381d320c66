use std::path::Path;

use crate::cli::KeyArgs;
use crate::cli::commands::key_helpers;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::batch_item::display_name;
use crate::core::models::decryption_record::DecryptionRecord;
use crate::core::services::message_parser;

/// Execute the `csirt-pgp decrypt` command.
///
/// Decrypts one armored message taken from `--text`, FILE or stdin and
/// records the result in the history. A FILE goes through the same
/// extension and size checks as a batch upload.
pub fn execute(
    file: Option<&str>,
    text: Option<&str>,
    output_path: Option<&str>,
    key: &KeyArgs,
) -> Result<()> {
    let config = key_helpers::load_config()?;

    let filename = match file {
        Some(f) => {
            let path = Path::new(f);
            let name = display_name(path);
            if let Ok(meta) = std::fs::metadata(path) {
                config.upload.policy().check(&name, meta.len())?;
            }
            Some(name)
        }
        None => None,
    };

    let input = key_helpers::read_input(file, text)?;
    // Reject malformed input before touching the key.
    let message = message_parser::validate(&input)?;

    let decryptor = key_helpers::unlock_decryptor(key, &config)?;
    let plaintext = decryptor.decrypt(&message)?;

    let record = match &filename {
        Some(name) => DecryptionRecord::file(message.as_str(), plaintext.as_str(), name.as_str()),
        None => DecryptionRecord::text(message.as_str(), plaintext.as_str()),
    };
    key_helpers::history_recorder(&config).record(&record);

    key_helpers::emit(&plaintext, output_path)?;
    if let Some(path) = output_path {
        output::success(&format!("Decrypted message written to {path}"));
    }
    Ok(())
}
