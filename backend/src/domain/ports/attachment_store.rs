//! Port for attachment byte storage.

use async_trait::async_trait;

use crate::domain::StorageKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by attachment store adapters.
    pub enum AttachmentStoreError {
        /// Reading or writing the underlying storage failed.
        Io => "attachment store i/o failed",
        /// The store did not answer within the configured bound.
        Timeout => "attachment store timed out",
        /// Something is already stored under the key.
        AlreadyExists => "attachment key already taken",
    }
}

/// Driven port for the file store holding uploaded bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store `bytes` under a fresh `key`. Existing entries are never
    /// overwritten; a taken key fails with
    /// [`AttachmentStoreError::AlreadyExists`].
    async fn write(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), AttachmentStoreError>;

    /// Read the bytes stored under `key`; `None` when nothing is stored.
    async fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, AttachmentStoreError>;
}
