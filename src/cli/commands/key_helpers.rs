use std::io::Read;
use std::path::{Path, PathBuf};

use crate::adapters::history::json_history_store::JsonHistoryStore;
use crate::adapters::history::memory_history_store::MemoryHistoryStore;
use crate::adapters::pgp::rpgp_backend::RpgpBackend;
use crate::cli::KeyArgs;
use crate::cli::context;
use crate::config::app_config::AppConfig;
use crate::core::errors::{Result, ToolkitError};
use crate::core::models::key_material::ArmoredKey;
use crate::core::services::decryptor::Decryptor;
use crate::core::services::history_recorder::HistoryRecorder;
use crate::core::services::key_assembler;

/// Load `config.toml` from the active data directory.
pub fn load_config() -> Result<AppConfig> {
    AppConfig::load(context::data_dir())
}

/// Assemble (or read) the private key and unlock it once for the session.
pub fn unlock_decryptor(key: &KeyArgs, config: &AppConfig) -> Result<Decryptor<RpgpBackend>> {
    let armored = match &key.key_file {
        Some(path) => {
            tracing::debug!(path = %path, "reading whole private key from file");
            ArmoredKey::from_armored(read_existing(Path::new(path))?)
        }
        None => key_assembler::assemble_from_env(&config.key)?,
    };

    let passphrase = key_assembler::resolve_passphrase(key.passphrase.as_deref(), &config.key);
    Decryptor::unlock(
        RpgpBackend::new(),
        &armored,
        passphrase.as_ref().map(|p| p.as_str()),
    )
}

/// History recorder for the configured store. A disabled history still
/// goes through the recorder, backed by a store that lives in memory.
pub fn history_recorder(config: &AppConfig) -> HistoryRecorder {
    if config.history.enabled {
        HistoryRecorder::new(Box::new(JsonHistoryStore::new(
            context::data_dir(),
            &config.history.file,
        )))
    } else {
        tracing::debug!("history disabled, records are kept in memory only");
        HistoryRecorder::new(Box::new(MemoryHistoryStore::new()))
    }
}

/// Read an input file as text, with a clear error if it does not exist.
pub fn read_existing(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ToolkitError::FileNotFound {
            path: PathBuf::from(path),
        });
    }
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Take the command input from `--text`, then FILE, then stdin.
pub fn read_input(file: Option<&str>, text: Option<&str>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_string());
    }
    if let Some(file) = file {
        return read_existing(Path::new(file));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Write `content` to `path`, or print it to stdout.
pub fn emit(content: &str, path: Option<&str>) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            Ok(())
        }
        None => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
            Ok(())
        }
    }
}
