//! Driving port for ticket reads and attachment downloads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, StorageKey, TicketDetails};

/// Attachment bytes plus the metadata needed to serve them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentDownload {
    /// Name offered to the client, without the timestamp prefix.
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Domain use-case port for ticket listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketQuery: Send + Sync {
    /// Tickets filed by the caller, newest first.
    async fn list_own_tickets(&self, caller: &Caller) -> Result<Vec<TicketDetails>, Error>;

    /// Every ticket, newest first. Admin only.
    async fn list_all_tickets(&self, caller: &Caller) -> Result<Vec<TicketDetails>, Error>;

    /// Fetch stored attachment bytes by storage key.
    async fn download_attachment(
        &self,
        caller: &Caller,
        key: &StorageKey,
    ) -> Result<AttachmentDownload, Error>;
}
