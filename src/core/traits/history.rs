use crate::core::errors::Result;
use crate::core::models::decryption_record::DecryptionRecord;

/// Port for the persisted decryption history.
///
/// The history is one append-only, insertion-ordered sequence.
pub trait HistoryStore: Send + Sync {
    /// Create an empty history if none exists. Never touches existing records.
    fn initialize_if_absent(&self) -> Result<()>;

    /// Append a record at the end of the history.
    fn append(&self, record: &DecryptionRecord) -> Result<()>;

    /// All records, oldest first.
    fn read(&self) -> Result<Vec<DecryptionRecord>>;
}
