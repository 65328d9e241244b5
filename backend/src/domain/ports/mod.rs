//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AttachmentStore`]) are implemented by
//! outbound adapters; driving ports are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod article_repository;
mod attachment_store;
mod dashboard_query;
mod identity_service;
mod knowledge_base_query;
mod ticket_command;
mod ticket_query;
mod ticket_repository;
mod user_repository;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticleRepository, ArticleRepositoryError};
#[cfg(test)]
pub use attachment_store::MockAttachmentStore;
pub use attachment_store::{AttachmentStore, AttachmentStoreError};
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use identity_service::IdentityService;
#[cfg(test)]
pub use identity_service::MockIdentityService;
pub use knowledge_base_query::KnowledgeBaseQuery;
#[cfg(test)]
pub use knowledge_base_query::MockKnowledgeBaseQuery;
#[cfg(test)]
pub use ticket_command::MockTicketCommand;
pub use ticket_command::TicketCommand;
#[cfg(test)]
pub use ticket_query::MockTicketQuery;
pub use ticket_query::{AttachmentDownload, TicketQuery};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{TicketRepository, TicketRepositoryError, TicketScope};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
