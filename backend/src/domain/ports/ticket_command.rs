//! Driving port for ticket mutations.

use async_trait::async_trait;

use crate::domain::{
    Caller, CommentBody, CommentWithAuthor, CreatedTicket, Error, TicketDraft, TicketId,
    TicketStatus, TicketWithRequester, UploadedFile,
};

/// Domain use-case port for filing, triaging and replying to tickets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketCommand: Send + Sync {
    /// File a ticket for the caller and store non-empty uploads best effort.
    async fn create_ticket(
        &self,
        caller: &Caller,
        draft: TicketDraft,
        files: Vec<UploadedFile>,
    ) -> Result<CreatedTicket, Error>;

    /// Admin-only status change; any transition is accepted.
    async fn update_status(
        &self,
        caller: &Caller,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> Result<TicketWithRequester, Error>;

    /// Append a comment by the caller to an existing ticket.
    async fn add_comment(
        &self,
        caller: &Caller,
        ticket_id: TicketId,
        body: CommentBody,
    ) -> Result<CommentWithAuthor, Error>;
}
