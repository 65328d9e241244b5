//! Port for ticket, comment and attachment persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Attachment, Comment, RecentTicket, Ticket, TicketDetails, TicketId, TicketStatus,
    TicketStatusCounts, TicketWithRequester, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ticket repository adapters.
    pub enum TicketRepositoryError {
        /// Repository connection could not be established.
        Connection => "ticket repository connection failed",
        /// Query or mutation failed during execution.
        Query => "ticket repository query failed",
        /// The store did not answer within the configured bound.
        Timeout => "ticket repository timed out",
    }
}

/// Which tickets a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketScope {
    /// Tickets filed by one requester.
    OwnedBy(UserId),
    /// Every ticket.
    All,
}

/// Driven port for the ticket aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Persist a new ticket.
    async fn insert(&self, ticket: &Ticket) -> Result<(), TicketRepositoryError>;

    /// Whether a ticket with this id exists.
    async fn exists(&self, id: &TicketId) -> Result<bool, TicketRepositoryError>;

    /// Set the status and `updated_at`; `None` when the ticket is missing.
    async fn update_status(
        &self,
        id: &TicketId,
        status: TicketStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<TicketWithRequester>, TicketRepositoryError>;

    /// Eager-loaded tickets, newest first, comments oldest first.
    async fn list_details(
        &self,
        scope: TicketScope,
    ) -> Result<Vec<TicketDetails>, TicketRepositoryError>;

    /// Persist an attachment row for an existing ticket.
    async fn insert_attachment(&self, attachment: &Attachment)
    -> Result<(), TicketRepositoryError>;

    /// Persist a comment on an existing ticket.
    async fn insert_comment(&self, comment: &Comment) -> Result<(), TicketRepositoryError>;

    /// Ticket counts by status.
    async fn status_counts(&self) -> Result<TicketStatusCounts, TicketRepositoryError>;

    /// Newest tickets with requester info.
    async fn recent(&self, limit: usize) -> Result<Vec<RecentTicket>, TicketRepositoryError>;
}
