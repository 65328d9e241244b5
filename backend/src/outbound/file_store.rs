//! Capability-scoped filesystem store for ticket attachments.
//!
//! Every operation is resolved relative to an opened upload directory, so a
//! key can never address a file outside it.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::StorageKey;
use crate::domain::ports::{AttachmentStore, AttachmentStoreError};

use super::deadline::bounded;

/// Default bound on a single read or write.
pub const DEFAULT_FILE_TIMEOUT: Duration = Duration::from_secs(10);

/// Attachment store writing one file per key into an upload directory.
#[derive(Debug, Clone)]
pub struct FileAttachmentStore {
    dir: Arc<Dir>,
    timeout: Duration,
}

impl FileAttachmentStore {
    /// Open `path`, creating it and any parents when missing.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            timeout: DEFAULT_FILE_TIMEOUT,
        })
    }

    /// Override the per-operation timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn blocking<T, F>(&self, operation: F) -> Result<T, AttachmentStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let task = async move {
            tokio::task::spawn_blocking(move || operation(&dir))
                .await
                .map_err(|err| AttachmentStoreError::io(err.to_string()))?
                .map_err(map_io_error)
        };
        bounded(self.timeout, task, AttachmentStoreError::timeout).await
    }
}

fn map_io_error(err: io::Error) -> AttachmentStoreError {
    match err.kind() {
        io::ErrorKind::AlreadyExists => AttachmentStoreError::already_exists(err.to_string()),
        _ => AttachmentStoreError::io(err.to_string()),
    }
}

/// Create `name` and fill it, removing the partial file if the write fails.
fn create_new(dir: &Dir, name: &str, bytes: &[u8]) -> io::Result<()> {
    let mut file = dir.open_with(name, OpenOptions::new().write(true).create_new(true))?;
    let written = file.write_all(bytes).and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        if let Err(err) = dir.remove_file(name) {
            debug!(key = %name, error = %err, "partial attachment left behind");
        }
    }
    written
}

#[async_trait]
impl AttachmentStore for FileAttachmentStore {
    async fn write(&self, key: &StorageKey, bytes: &[u8]) -> Result<(), AttachmentStoreError> {
        let name = key.as_ref().to_owned();
        let bytes = bytes.to_vec();
        debug!(key = %name, size = bytes.len(), "writing attachment");
        self.blocking(move |dir| create_new(dir, &name, &bytes)).await
    }

    async fn read(&self, key: &StorageKey) -> Result<Option<Vec<u8>>, AttachmentStoreError> {
        let name = key.as_ref().to_owned();
        self.blocking(move |dir| match dir.read(&name) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        })
        .await
    }
}
