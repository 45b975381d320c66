use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{Result, ToolkitError};

/// Suffix appended to the stem of every decrypted file.
pub const DECRYPTED_SUFFIX: &str = "_decrypted.txt";

static ALLOWED_EXTENSIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(txt|eml|pgp|gpg)$").expect("extension pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Pending,
    Success,
    Failed,
}

/// Outcome of one file within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub source_file: String,
    pub status: BatchStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    /// The text that was decrypted, kept for the history record.
    pub input: Option<String>,
}

/// What a successful per-file pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedFile {
    pub input: String,
    pub plaintext: String,
}

impl BatchItem {
    pub fn pending(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            status: BatchStatus::Pending,
            result: None,
            error: None,
            input: None,
        }
    }

    /// Settle a pending item with the outcome of its pipeline.
    pub fn settle(self, outcome: Result<DecryptedFile>) -> Self {
        match outcome {
            Ok(decrypted) => Self {
                status: BatchStatus::Success,
                result: Some(decrypted.plaintext),
                error: None,
                input: Some(decrypted.input),
                ..self
            },
            Err(e) => Self {
                status: BatchStatus::Failed,
                result: None,
                error: Some(e.to_string()),
                input: None,
                ..self
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Success
    }

    /// Suggested file name for the decrypted output.
    pub fn output_filename(&self) -> String {
        decrypted_filename(&self.source_file)
    }
}

/// Strip the last extension segment and append `_decrypted.txt`.
///
/// `weekly-report.txt.pgp` becomes `weekly-report.txt_decrypted.txt`.
/// A name without an extension keeps its whole stem.
pub fn decrypted_filename(name: &str) -> String {
    let stem = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    };
    format!("{stem}{DECRYPTED_SUFFIX}")
}

/// Upload limits applied to every file before it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub max_files: usize,
}

impl UploadPolicy {
    /// Check the extension allow-list and the declared size.
    pub fn check(&self, name: &str, size: u64) -> Result<()> {
        self.check_type(name)?;
        if size > self.max_file_size {
            return Err(self.too_large(name));
        }
        Ok(())
    }

    /// Extension allow-list only; needs nothing but the name.
    pub fn check_type(&self, name: &str) -> Result<()> {
        if ALLOWED_EXTENSIONS.is_match(name) {
            Ok(())
        } else {
            Err(ToolkitError::InvalidFileType {
                name: name.to_string(),
            })
        }
    }

    pub fn too_large(&self, name: &str) -> ToolkitError {
        ToolkitError::FileTooLarge {
            name: name.to_string(),
            limit: format_size(self.max_file_size),
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: 4 * 1024 * 1024,
            max_files: 5,
        }
    }
}

/// Render a byte count the way limits are quoted to users ("4 MB").
pub fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// One file of a batch. It is opened inside its own pipeline, so an
/// unreadable path only fails its own item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFile {
    pub name: String,
    pub path: PathBuf,
}

impl BatchFile {
    /// Named after the last path component, as reported to the user.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
        }
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
