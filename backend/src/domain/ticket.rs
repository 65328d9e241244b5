//! Ticket lifecycle data model: tickets, comments and attachments.
//!
//! Status transitions are unconstrained: an admin may move a ticket from any
//! status to any other, including back to `OPEN` after resolution.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AttachmentId, CommentId, DisplayName, EmailAddress, StorageKey, TicketId, UserId};

/// Validation failures for ticket and comment input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("comment content must not be empty")]
    EmptyComment,
    #[error("priority must be one of LOW, MEDIUM, HIGH, URGENT")]
    UnknownPriority,
    #[error("status must be one of OPEN, IN_PROGRESS, RESOLVED, CLOSED")]
    UnknownStatus,
}

impl TicketValidationError {
    /// Request field the failure relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyDescription => "description",
            Self::EmptyComment => "content",
            Self::UnknownPriority => "priority",
            Self::UnknownStatus => "status",
        }
    }

    /// Machine readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::EmptyDescription | Self::EmptyComment => "empty",
            Self::UnknownPriority | Self::UnknownStatus => "unknown_value",
        }
    }
}

/// Lifecycle status of a ticket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(TicketValidationError::UnknownStatus)
    }
}

/// Urgency chosen by the requester when filing a ticket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TicketPriority {
    /// Every priority, least urgent first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketPriority {
    type Err = TicketValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(TicketValidationError::UnknownPriority)
    }
}

/// Persisted ticket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[schema(value_type = String)]
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub user_id: UserId,
}

/// Validated ticket creation input.
///
/// # Examples
/// ```
/// use helpdesk::domain::{TicketDraft, TicketPriority};
///
/// let draft = TicketDraft::try_new("Printer jam", "Floor 3 printer", None).unwrap();
/// assert_eq!(draft.priority(), TicketPriority::Medium);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDraft {
    title: String,
    description: String,
    priority: TicketPriority,
}

impl TicketDraft {
    /// Validate raw form fields. A missing or blank priority means `MEDIUM`.
    pub fn try_new(
        title: &str,
        description: &str,
        priority: Option<&str>,
    ) -> Result<Self, TicketValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TicketValidationError::EmptyTitle);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(TicketValidationError::EmptyDescription);
        }
        let priority = match priority {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => TicketPriority::default(),
        };
        Ok(Self {
            title: title.to_owned(),
            description: description.to_owned(),
            priority,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> TicketPriority {
        self.priority
    }
}

/// Non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBody(String);

impl CommentBody {
    /// Validate comment content; surrounding whitespace is kept verbatim.
    pub fn new(raw: impl Into<String>) -> Result<Self, TicketValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TicketValidationError::EmptyComment);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for CommentBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<CommentBody> for String {
    fn from(value: CommentBody) -> Self {
        value.0
    }
}

/// Persisted comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[schema(value_type = String)]
    pub id: CommentId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub ticket_id: TicketId,
    #[schema(value_type = String)]
    pub user_id: UserId,
}

/// Name of the user who wrote a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommentAuthor {
    #[schema(value_type = String)]
    pub name: DisplayName,
}

/// Comment with its author's display name attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: CommentAuthor,
}

/// Requester summary attached to ticket listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Requester {
    #[schema(value_type = String)]
    pub name: DisplayName,
    #[schema(value_type = String)]
    pub email: EmailAddress,
}

/// Persisted attachment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[schema(value_type = String)]
    pub id: AttachmentId,
    /// Original filename as uploaded.
    pub filename: String,
    /// Generated storage key.
    #[schema(value_type = String, example = "1718000000000-report.pdf")]
    pub filepath: StorageKey,
    pub mimetype: String,
    pub size: i64,
    #[schema(value_type = String)]
    pub ticket_id: TicketId,
}

/// Ticket with requester attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketWithRequester {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub user: Requester,
}

/// Eager-loaded ticket as shown in owner and admin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TicketDetails {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub user: Requester,
    /// Ordered by creation time, oldest first.
    pub comments: Vec<CommentWithAuthor>,
    pub attachments: Vec<Attachment>,
}

/// Uploaded file part accompanying ticket creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Zero-byte uploads are skipped without error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of ticket creation: attachments are appended best effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub attachments: Vec<Attachment>,
    /// Original names of files that could not be stored.
    pub failed_attachments: Vec<String>,
}
