use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::errors::{Result, ToolkitError};
use crate::core::models::decryption_record::DecryptionRecord;
use crate::core::traits::history::HistoryStore;

/// History store that keeps every record in one JSON array file.
///
/// The file is rewritten through a temp file in the same directory and
/// renamed into place, so a crash never leaves a half-written history.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    /// Create a store that writes to `{data_dir}/{file_name}`.
    pub fn new(data_dir: &Path, file_name: &str) -> Self {
        Self {
            path: data_dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, records: &[DecryptionRecord]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| ToolkitError::History {
            detail: format!("Cannot create {}: {e}", parent.display()),
        })?;

        let json = serde_json::to_string_pretty(records).map_err(|e| ToolkitError::History {
            detail: format!("Failed to serialize history: {e}"),
        })?;

        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| ToolkitError::History {
            detail: format!("Cannot create temp file in {}: {e}", parent.display()),
        })?;
        writeln!(tmp, "{json}").map_err(|e| ToolkitError::History {
            detail: format!("Failed to write history: {e}"),
        })?;
        tmp.persist(&self.path).map_err(|e| ToolkitError::History {
            detail: format!("Cannot replace {}: {e}", self.path.display()),
        })?;

        Ok(())
    }
}

impl HistoryStore for JsonHistoryStore {
    fn initialize_if_absent(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.write_all(&[])
    }

    fn append(&self, record: &DecryptionRecord) -> Result<()> {
        let mut records = self.read()?;
        records.push(record.clone());
        self.write_all(&records)
    }

    fn read(&self) -> Result<Vec<DecryptionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| ToolkitError::History {
            detail: format!("Cannot read history at {}: {e}", self.path.display()),
        })?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| ToolkitError::History {
            detail: format!("Malformed history file {}: {e}", self.path.display()),
        })
    }
}
