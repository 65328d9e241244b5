//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed help-desk entities, the transport-agnostic
//! error type, the hexagonal ports and the services implementing the driving
//! ports. Nothing here depends on Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Caller: authenticated identity passed into every protected use case.
//! - Ticket, Article, DashboardStats and their companions.
//! - TicketService, KnowledgeBaseService, DashboardService,
//!   UserIdentityService: driving-port implementations.

pub mod article;
pub mod auth;
pub mod dashboard;
mod dashboard_service;
pub mod demo_seed;
pub mod error;
mod ids;
mod identity_service;
mod knowledge_base_service;
pub mod ports;
mod service_error_mapping;
pub mod storage_key;
pub mod ticket;
mod ticket_service;
pub mod trace_id;
pub mod user;

pub use self::article::{
    Article, ArticleAuthor, ArticleDraft, ArticleFilter, ArticleSummary, PopularArticle,
};
pub use self::auth::{Caller, SignInCredentials};
pub use self::dashboard::{
    DASHBOARD_LIST_LIMIT, DashboardStats, RecentTicket, TicketStatusCounts,
};
pub use self::dashboard_service::DashboardService;
pub use self::demo_seed::{DemoSeedReport, seed_demo_data};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity_service::UserIdentityService;
pub use self::ids::{ArticleId, AttachmentId, CommentId, IdParseError, TicketId, UserId};
pub use self::knowledge_base_service::KnowledgeBaseService;
pub use self::storage_key::{StorageKey, StorageKeyError};
pub use self::ticket::{
    Attachment, Comment, CommentAuthor, CommentBody, CommentWithAuthor, CreatedTicket, Requester,
    Ticket, TicketDetails, TicketDraft, TicketPriority, TicketStatus, TicketValidationError,
    TicketWithRequester, UploadedFile,
};
pub use self::ticket_service::{DEFAULT_MAX_UPLOAD_BYTES, TicketService, TicketServiceSettings};
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, EmailAddress, NewUser, Role, User, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use helpdesk::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("sign in first"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
