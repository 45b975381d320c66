use std::path::PathBuf;

/// All domain errors for csirt-pgp.
///
/// The `Display` text of each variant is what the operator sees, so
/// messages carry guidance rather than internal detail where possible.
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    #[error(
        "Private key not found\n\n  \
         None of the configured key fragments are set: {vars}\n\n  \
         Solutions:\n    \
         → Export every fragment variable before running csirt-pgp\n    \
         → Or point to a whole armored key: --key-file <path>"
    )]
    MissingKeyMaterial { vars: String },

    #[error("Input seems EMPTY! Enter a valid PGP encrypted text.")]
    EmptyInput,

    #[error("Enter a valid PGP encrypted text. (input is not a valid PGP message)")]
    NotPgpMessage,

    #[error("Enter a valid input in PGP format. (misformed armored text: {detail})")]
    MisformedArmor { detail: String },

    #[error(
        "Could not unlock the private key: {reason}\n\n  \
         Check the passphrase (--passphrase or the configured variable)\n  \
         and that every key fragment is set in the right order."
    )]
    KeyUnlock { reason: String },

    #[error("Decryption failed: {reason}")]
    DecryptionFailed { reason: String },

    #[error("Decryption failed: plaintext stream broke off: {reason}")]
    StreamConsumption { reason: String },

    #[error(
        "Invalid file type: {name}. Only .txt, .eml, .pgp, and .gpg files are allowed."
    )]
    InvalidFileType { name: String },

    #[error("File size exceeds limit: {name}. Maximum size is {limit}.")]
    FileTooLarge { name: String, limit: String },

    #[error("Too many files: {name} was skipped. At most {max} files per batch.")]
    TooManyFiles { name: String, max: usize },

    #[error("{failed} of {total} files could not be decrypted")]
    BatchFailed { failed: usize, total: usize },

    #[error("History error: {detail}")]
    History { detail: String },

    #[error("Encryption failed: {reason}")]
    EncryptionFailed { reason: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("File not found: {path}\n\n  Check that the path is correct and the file exists.")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ToolkitError {
    /// The input was rejected before any key material was touched.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::NotPgpMessage | Self::MisformedArmor { .. }
        )
    }

    /// The upload was rejected before it was read.
    pub fn is_file_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileType { .. } | Self::FileTooLarge { .. } | Self::TooManyFiles { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ToolkitError>;
