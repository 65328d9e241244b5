//! Ticket service implementing the ticket command and query driving ports.
//!
//! Ticket creation is a sequence of independent steps: the ticket row is
//! committed first, then each non-empty upload is written to the attachment
//! store and linked to the ticket. A failed upload is recorded and reported
//! in the response; it never rolls back the ticket or the other uploads.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AttachmentDownload, AttachmentStore, AttachmentStoreError, TicketCommand, TicketQuery, TicketRepository,
    TicketScope,
};
use crate::domain::service_error_mapping::{
    invalid_field, map_attachment_store_error, map_ticket_repository_error,
};
use crate::domain::{
    Attachment, AttachmentId, Caller, Comment, CommentAuthor, CommentBody, CommentId,
    CommentWithAuthor, CreatedTicket, Error, StorageKey, Ticket, TicketDetails, TicketDraft,
    TicketId, TicketStatus, TicketWithRequester, UploadedFile,
};

/// Default per-file upload cap: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Milliseconds tried before giving up on a contended storage key.
const MAX_KEY_ATTEMPTS: u32 = 16;

/// Tunables for [`TicketService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketServiceSettings {
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for TicketServiceSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Ticket lifecycle service.
#[derive(Clone)]
pub struct TicketService<T, S> {
    tickets: Arc<T>,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    settings: TicketServiceSettings,
}

impl<T, S> TicketService<T, S> {
    /// Create a ticket service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use helpdesk::domain::{TicketService, TicketServiceSettings};
    /// # use helpdesk::outbound::memory::{InMemoryAttachmentStore, InMemoryHelpdeskStore};
    /// # use mockable::DefaultClock;
    /// let service = TicketService::new(
    ///     Arc::new(InMemoryHelpdeskStore::default()),
    ///     Arc::new(InMemoryAttachmentStore::default()),
    ///     Arc::new(DefaultClock),
    ///     TicketServiceSettings::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        tickets: Arc<T>,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        settings: TicketServiceSettings,
    ) -> Self {
        Self {
            tickets,
            store,
            clock,
            settings,
        }
    }
}

/// An upload paired with the first timestamp its key is tried at.
struct PendingUpload {
    millis: i64,
    file: UploadedFile,
}

enum UploadOutcome {
    Stored(Attachment),
    Failed(String),
}

impl<T, S> TicketService<T, S>
where
    T: TicketRepository,
    S: AttachmentStore,
{
    fn check_upload_sizes(&self, files: &[UploadedFile]) -> Result<(), Error> {
        let limit = self.settings.max_upload_bytes;
        match files.iter().find(|file| file.bytes.len() > limit) {
            Some(file) => Err(invalid_field(
                "files",
                "too_large",
                format!("{} exceeds the {limit} byte upload limit", file.original_name),
            )),
            None => Ok(()),
        }
    }

    /// Pick a starting timestamp for each non-empty upload, nudged so two
    /// files with the same name in one request never aim at the same key.
    fn plan_uploads(&self, unix_millis: i64, files: Vec<UploadedFile>) -> Vec<PendingUpload> {
        let mut used = HashSet::new();
        files
            .into_iter()
            .filter(|file| {
                if file.is_empty() {
                    info!(filename = %file.original_name, "skipping empty upload");
                }
                !file.is_empty()
            })
            .map(|file| {
                let mut millis = unix_millis;
                let mut key = StorageKey::generate(millis, &file.original_name);
                while !used.insert(key.clone()) {
                    millis += 1;
                    key = StorageKey::generate(millis, &file.original_name);
                }
                PendingUpload { millis, file }
            })
            .collect()
    }

    /// Write `file` under the first free `<millis>-<name>` key at or after
    /// `millis`. Keys taken by concurrent requests are skipped, never
    /// overwritten.
    async fn write_fresh(
        &self,
        mut millis: i64,
        file: &UploadedFile,
    ) -> Result<StorageKey, AttachmentStoreError> {
        let mut attempt = 1;
        loop {
            let key = StorageKey::generate(millis, &file.original_name);
            match self.store.write(&key, &file.bytes).await {
                Ok(()) => return Ok(key),
                Err(AttachmentStoreError::AlreadyExists { .. }) if attempt < MAX_KEY_ATTEMPTS => {
                    debug!(%key, "storage key taken, trying the next millisecond");
                    millis += 1;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn store_upload(&self, ticket_id: TicketId, upload: PendingUpload) -> UploadOutcome {
        let PendingUpload { millis, file } = upload;
        let key = match self.write_fresh(millis, &file).await {
            Ok(key) => key,
            Err(err) => {
                warn!(%ticket_id, filename = %file.original_name, error = %err, "attachment write failed");
                return UploadOutcome::Failed(file.original_name);
            }
        };
        let original_name = file.original_name;
        let size = file.bytes.len();
        let mimetype = file
            .content_type
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| key.mime_type().to_owned());

        let attachment = Attachment {
            id: AttachmentId::random(),
            filename: original_name.clone(),
            filepath: key,
            mimetype,
            size: i64::try_from(size).unwrap_or(i64::MAX),
            ticket_id,
        };
        match self.tickets.insert_attachment(&attachment).await {
            Ok(()) => UploadOutcome::Stored(attachment),
            Err(err) => {
                warn!(%ticket_id, filename = %original_name, error = %err, "attachment row insert failed");
                UploadOutcome::Failed(original_name)
            }
        }
    }
}

#[async_trait]
impl<T, S> TicketCommand for TicketService<T, S>
where
    T: TicketRepository,
    S: AttachmentStore,
{
    async fn create_ticket(
        &self,
        caller: &Caller,
        draft: TicketDraft,
        files: Vec<UploadedFile>,
    ) -> Result<CreatedTicket, Error> {
        self.check_upload_sizes(&files)?;

        let now = self.clock.utc();
        let ticket = Ticket {
            id: TicketId::random(),
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            status: TicketStatus::Open,
            priority: draft.priority(),
            created_at: now,
            updated_at: now,
            user_id: caller.user_id,
        };
        self.tickets
            .insert(&ticket)
            .await
            .map_err(map_ticket_repository_error)?;

        let uploads = self.plan_uploads(now.timestamp_millis(), files);
        let outcomes = join_all(
            uploads
                .into_iter()
                .map(|upload| self.store_upload(ticket.id, upload)),
        )
        .await;

        let mut attachments = Vec::new();
        let mut failed_attachments = Vec::new();
        for outcome in outcomes {
            match outcome {
                UploadOutcome::Stored(attachment) => attachments.push(attachment),
                UploadOutcome::Failed(name) => failed_attachments.push(name),
            }
        }

        info!(
            ticket_id = %ticket.id,
            user_id = %caller.user_id,
            attachments = attachments.len(),
            failed = failed_attachments.len(),
            "ticket created"
        );
        Ok(CreatedTicket {
            ticket,
            attachments,
            failed_attachments,
        })
    }

    async fn update_status(
        &self,
        caller: &Caller,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<TicketWithRequester, Error> {
        caller.require_admin()?;
        let updated = self
            .tickets
            .update_status(&ticket_id, status, self.clock.utc())
            .await
            .map_err(map_ticket_repository_error)?
            .ok_or_else(|| Error::not_found("Ticket not found"))?;
        info!(%ticket_id, status = status.as_str(), admin_id = %caller.user_id, "ticket status changed");
        Ok(updated)
    }

    async fn add_comment(
        &self,
        caller: &Caller,
        ticket_id: TicketId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error> {
        let exists = self
            .tickets
            .exists(&ticket_id)
            .await
            .map_err(map_ticket_repository_error)?;
        if !exists {
            return Err(Error::not_found("Ticket not found"));
        }

        let comment = Comment {
            id: CommentId::random(),
            content: body.into(),
            created_at: self.clock.utc(),
            ticket_id,
            user_id: caller.user_id,
        };
        self.tickets
            .insert_comment(&comment)
            .await
            .map_err(map_ticket_repository_error)?;
        info!(%ticket_id, comment_id = %comment.id, user_id = %caller.user_id, "comment added");
        Ok(CommentWithAuthor {
            comment,
            user: CommentAuthor {
                name: caller.name.clone(),
            },
        })
    }
}

#[async_trait]
impl<T, S> TicketQuery for TicketService<T, S>
where
    T: TicketRepository,
    S: AttachmentStore,
{
    async fn list_own_tickets(&self, caller: &Caller) -> Result<Vec<TicketDetails>, Error> {
        self.tickets
            .list_details(TicketScope::OwnedBy(caller.user_id))
            .await
            .map_err(map_ticket_repository_error)
    }

    async fn list_all_tickets(&self, caller: &Caller) -> Result<Vec<TicketDetails>, Error> {
        caller.require_admin()?;
        self.tickets
            .list_details(TicketScope::All)
            .await
            .map_err(map_ticket_repository_error)
    }

    async fn download_attachment(
        &self,
        _caller: &Caller,
        key: &StorageKey,
    ) -> Result<AttachmentDownload, Error> {
        let bytes = self
            .store
            .read(key)
            .await
            .map_err(map_attachment_store_error)?
            .ok_or_else(|| Error::not_found("File not found"))?;
        Ok(AttachmentDownload {
            filename: key.download_name().to_owned(),
            content_type: key.mime_type(),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
