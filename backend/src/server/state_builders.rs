//! Builders wiring repositories, the attachment store and services into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use helpdesk::domain::ports::{
    ArticleRepository, AttachmentStore, DashboardQuery, IdentityService, KnowledgeBaseQuery,
    TicketCommand, TicketQuery, TicketRepository, UserRepository,
};
use helpdesk::domain::{
    DashboardService, KnowledgeBaseService, TicketService, TicketServiceSettings,
    UserIdentityService, seed_demo_data,
};
use helpdesk::inbound::http::state::HttpState;
use helpdesk::outbound::file_store::FileAttachmentStore;
use helpdesk::outbound::memory::InMemoryHelpdeskStore;
use helpdesk::outbound::persistence::{
    DieselArticleRepository, DieselTicketRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters shared by every service.
struct Adapters<U, T, A, S> {
    users: Arc<U>,
    tickets: Arc<T>,
    articles: Arc<A>,
    store: Arc<S>,
}

/// Build the HTTP state for the configured backend.
///
/// A database pool selects the Diesel repositories; otherwise every port is
/// served by one shared in-memory store. Demo data is seeded when enabled.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the uploads directory cannot be opened or
/// demo seeding fails.
pub(super) async fn build_http_state(
    config: &ServerConfig,
) -> std::io::Result<web::Data<HttpState>> {
    let store = Arc::new(
        FileAttachmentStore::open(&config.uploads_dir)?.with_timeout(config.store_timeout),
    );

    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            let adapters = Adapters {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                tickets: Arc::new(DieselTicketRepository::new(pool.clone())),
                articles: Arc::new(DieselArticleRepository::new(pool.clone())),
                store,
            };
            wire(adapters, config).await
        }
        None => {
            info!("no database configured; using the in-memory store");
            let memory = Arc::new(InMemoryHelpdeskStore::default());
            let adapters = Adapters {
                users: Arc::clone(&memory),
                tickets: Arc::clone(&memory),
                articles: memory,
                store,
            };
            wire(adapters, config).await
        }
    }
}

async fn wire<U, T, A, S>(
    adapters: Adapters<U, T, A, S>,
    config: &ServerConfig,
) -> std::io::Result<web::Data<HttpState>>
where
    U: UserRepository + 'static,
    T: TicketRepository + 'static,
    A: ArticleRepository + 'static,
    S: AttachmentStore + 'static,
{
    let Adapters {
        users,
        tickets,
        articles,
        store,
    } = adapters;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    if config.seed_demo {
        let report = seed_demo_data(
            users.as_ref(),
            tickets.as_ref(),
            articles.as_ref(),
            clock.as_ref(),
        )
        .await
        .map_err(|err| std::io::Error::other(format!("demo seeding failed: {err}")))?;
        info!(
            articles = report.articles_inserted,
            tickets = report.tickets_inserted,
            "demo data seeded"
        );
    }

    let ticket_service = Arc::new(TicketService::new(
        Arc::clone(&tickets),
        store,
        clock,
        TicketServiceSettings {
            max_upload_bytes: config.max_upload_bytes,
        },
    ));
    let identity: Arc<dyn IdentityService> =
        Arc::new(UserIdentityService::new(Arc::clone(&users)));
    let knowledge_base: Arc<dyn KnowledgeBaseQuery> =
        Arc::new(KnowledgeBaseService::new(Arc::clone(&articles)));
    let dashboard: Arc<dyn DashboardQuery> =
        Arc::new(DashboardService::new(tickets, users, articles));

    Ok(web::Data::new(HttpState::new(
        identity,
        Arc::clone(&ticket_service) as Arc<dyn TicketCommand>,
        ticket_service as Arc<dyn TicketQuery>,
        knowledge_base,
        dashboard,
    )
    .with_upload_limit(config.max_upload_bytes)))
}
