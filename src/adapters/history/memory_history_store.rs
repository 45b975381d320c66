use std::sync::{Mutex, MutexGuard};

use crate::core::errors::{Result, ToolkitError};
use crate::core::models::decryption_record::DecryptionRecord;
use crate::core::traits::history::HistoryStore;

/// Process-local history. Starts uninitialized, like a fresh profile.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Option<Vec<DecryptionRecord>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Vec<DecryptionRecord>>>> {
        self.records.lock().map_err(|_| ToolkitError::History {
            detail: "in-memory history lock poisoned".into(),
        })
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn initialize_if_absent(&self) -> Result<()> {
        self.lock()?.get_or_insert_with(Vec::new);
        Ok(())
    }

    fn append(&self, record: &DecryptionRecord) -> Result<()> {
        self.lock()?
            .get_or_insert_with(Vec::new)
            .push(record.clone());
        Ok(())
    }

    fn read(&self) -> Result<Vec<DecryptionRecord>> {
        Ok(self.lock()?.clone().unwrap_or_default())
    }
}
