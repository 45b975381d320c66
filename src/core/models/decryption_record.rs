use serde::{Deserialize, Serialize};

/// Where the decrypted input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Text,
    File,
}

/// One past decryption, as stored in the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecryptionRecord {
    pub input: String,
    pub output: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl DecryptionRecord {
    pub fn text(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            kind: RecordKind::Text,
            filename: None,
        }
    }

    pub fn file(
        input: impl Into<String>,
        output: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            kind: RecordKind::File,
            filename: Some(filename.into()),
        }
    }
}
