use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::core::errors::{Result, ToolkitError};

const LOCAL_DIR: &str = ".csirt-pgp";

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the global data directory.
///
/// `custom` wins; otherwise a `.csirt-pgp` directory in the working
/// directory, otherwise the platform data directory.
pub fn init(custom: Option<&str>) {
    let dir = match custom {
        Some(path) => PathBuf::from(path),
        None if Path::new(LOCAL_DIR).is_dir() => PathBuf::from(LOCAL_DIR),
        None => dirs::data_dir()
            .map(|d| d.join("csirt-pgp"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_DIR)),
    };
    tracing::debug!(dir = %dir.display(), "data directory selected");
    let _ = DATA_DIR.set(dir);
}

/// Directory holding `config.toml` and the history file.
pub fn data_dir() -> &'static Path {
    DATA_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(LOCAL_DIR))
}

/// Reject anything that is not a bare file name.
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let simple = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if simple {
        Ok(())
    } else {
        Err(ToolkitError::InvalidConfig {
            detail: format!("{what} must be a plain file name, got '{name}'"),
        })
    }
}
