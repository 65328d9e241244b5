//! Map-backed attachment store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::StorageKey;
use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

/// Attachment bytes held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAttachmentStore {
    files: Mutex<HashMap<StorageKey, Vec<u8>>>,
}

impl InMemoryAttachmentStore {
    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.lock().map(|files| files.len()).unwrap_or_default()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> AttachmentStoreError {
    AttachmentStoreError::io("attachment map lock poisoned")
}

#[async_trait]
impl AttachmentStore for InMemoryAttachmentStore {
    async fn write(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), AttachmentStoreError> {
        let mut files = self.files.lock().map_err(|_| poisoned())?;
        match files.entry(key.clone()) {
            Entry::Occupied(_) => Err(AttachmentStoreError::already_exists(key.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(bytes.to_vec());
                Ok(())
            }
        }
    }

    async fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, AttachmentStoreError> {
        let files = self.files.lock().map_err(|_| poisoned())?;
        Ok(files.get(key).cloned())
    }
}
