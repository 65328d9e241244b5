//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the domain schemas they return
//! and the session cookie security scheme. Swagger UI serves it at `/docs` in
//! debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Article, ArticleSummary, Caller, CommentWithAuthor, CreatedTicket, DashboardStats, Error,
    ErrorCode, TicketDetails, TicketWithRequester, User,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/sign-in.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Help desk API",
        description = "Support tickets, knowledge base and admin reporting behind a cookie session."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::sign_in,
        crate::inbound::http::users::sign_out,
        crate::inbound::http::users::current_caller,
        crate::inbound::http::tickets::create_ticket,
        crate::inbound::http::tickets::list_own_tickets,
        crate::inbound::http::tickets::add_comment,
        crate::inbound::http::admin::list_all_tickets,
        crate::inbound::http::admin::update_ticket_status,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::knowledge_base::list_articles,
        crate::inbound::http::knowledge_base::get_article,
        crate::inbound::http::uploads::download_attachment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Caller,
        CreatedTicket,
        TicketDetails,
        TicketWithRequester,
        CommentWithAuthor,
        Article,
        ArticleSummary,
        DashboardStats,
    )),
    tags(
        (name = "auth", description = "Demo sign-in and session management"),
        (name = "tickets", description = "Filing, listing and replying to tickets"),
        (name = "admin", description = "Ticket triage and reporting for admins"),
        (name = "knowledge-base", description = "Published help articles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
