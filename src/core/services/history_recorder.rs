use crate::core::errors::Result;
use crate::core::models::decryption_record::DecryptionRecord;
use crate::core::traits::history::HistoryStore;

/// Records decryptions as a side effect of the decrypt commands.
///
/// Persistence failures are logged and swallowed: the operator is
/// waiting on the plaintext, not on the history file.
pub struct HistoryRecorder {
    store: Box<dyn HistoryStore>,
}

impl HistoryRecorder {
    /// Wrap `store`, creating an empty history if none exists yet.
    pub fn new(store: Box<dyn HistoryStore>) -> Self {
        if let Err(e) = store.initialize_if_absent() {
            tracing::warn!(error = %e, "could not initialize decryption history");
        }
        Self { store }
    }

    /// Append `record`. Returns whether it was persisted.
    pub fn record(&self, record: &DecryptionRecord) -> bool {
        match self.store.append(record) {
            Ok(()) => {
                tracing::debug!(kind = ?record.kind, "decryption recorded in history");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not write decryption history");
                false
            }
        }
    }

    /// Read back the whole history, oldest first.
    pub fn records(&self) -> Result<Vec<DecryptionRecord>> {
        self.store.read()
    }
}
