//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::DEFAULT_MAX_UPLOAD_BYTES;
use crate::domain::ports::{
    DashboardQuery, IdentityService, KnowledgeBaseQuery, TicketCommand, TicketQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityService>,
    pub tickets: Arc<dyn TicketCommand>,
    pub tickets_query: Arc<dyn TicketQuery>,
    pub knowledge_base: Arc<dyn KnowledgeBaseQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
    /// Largest multipart part read before the request is rejected.
    pub upload_limit: usize,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use helpdesk::domain::ports::{
    ///     DashboardQuery, IdentityService, KnowledgeBaseQuery, TicketCommand, TicketQuery,
    /// };
    /// use helpdesk::inbound::http::state::HttpState;
    ///
    /// fn wire(
    ///     identity: Arc<dyn IdentityService>,
    ///     tickets: Arc<dyn TicketCommand>,
    ///     tickets_query: Arc<dyn TicketQuery>,
    ///     knowledge_base: Arc<dyn KnowledgeBaseQuery>,
    ///     dashboard: Arc<dyn DashboardQuery>,
    /// ) -> HttpState {
    ///     HttpState::new(identity, tickets, tickets_query, knowledge_base, dashboard)
    /// }
    /// ```
    pub fn new(
        identity: Arc<dyn IdentityService>,
        tickets: Arc<dyn TicketCommand>,
        tickets_query: Arc<dyn TicketQuery>,
        knowledge_base: Arc<dyn KnowledgeBaseQuery>,
        dashboard: Arc<dyn DashboardQuery>,
    ) -> Self {
        Self {
            identity,
            tickets,
            tickets_query,
            knowledge_base,
            dashboard,
            upload_limit: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the per-part upload cap.
    #[must_use]
    pub fn with_upload_limit(mut self, upload_limit: usize) -> Self {
        self.upload_limit = upload_limit;
        self
    }
}
