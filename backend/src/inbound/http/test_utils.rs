//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    MockDashboardQuery, MockIdentityService, MockKnowledgeBaseQuery, MockTicketCommand,
    MockTicketQuery,
};
use crate::domain::{
    Caller, DisplayName, EmailAddress, Requester, Role, Ticket, TicketId, TicketPriority,
    TicketStatus, UserId,
};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Path of the helper route that signs the fixture caller in.
pub const SEED_SESSION_PATH: &str = "/test/session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Caller fixture with the given role.
pub fn caller(role: Role) -> Caller {
    Caller {
        user_id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        name: DisplayName::new("Ada Lovelace").expect("fixture name"),
        email: EmailAddress::new("ada@company.com").expect("fixture email"),
        role,
    }
}

/// Ticket fixture owned by the fixture caller.
pub fn ticket(status: TicketStatus) -> Ticket {
    let created_at = DateTime::parse_from_rfc3339("2026-02-24T10:30:00Z")
        .expect("fixture timestamp")
        .with_timezone(&Utc);
    Ticket {
        id: TicketId::new("7c9e6679-7425-40de-944b-e07fc1f90ae7").expect("fixture ticket id"),
        title: "VPN drops every hour".to_owned(),
        description: "Disconnects at :00 on the office network".to_owned(),
        status,
        priority: TicketPriority::High,
        created_at,
        updated_at: created_at,
        user_id: caller(Role::User).user_id,
    }
}

/// Requester fixture matching [`caller`].
pub fn requester() -> Requester {
    let fixture = caller(Role::User);
    Requester {
        name: fixture.name,
        email: fixture.email,
    }
}

/// Mock ports; each starts without expectations.
#[derive(Default)]
pub struct MockPorts {
    pub identity: MockIdentityService,
    pub tickets: MockTicketCommand,
    pub tickets_query: MockTicketQuery,
    pub knowledge_base: MockKnowledgeBaseQuery,
    pub dashboard: MockDashboardQuery,
}

impl MockPorts {
    /// Resolve every session to `caller`.
    pub fn signed_in_as(mut self, caller: Caller) -> Self {
        self.identity
            .expect_resolve_caller()
            .returning(move |_| Ok(Some(caller.clone())));
        self
    }

    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.identity),
            Arc::new(self.tickets),
            Arc::new(self.tickets_query),
            Arc::new(self.knowledge_base),
            Arc::new(self.dashboard),
        )
    }
}

async fn seed_session(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(&caller(Role::User).user_id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Build a test app around `state` with the test session middleware and the
/// session seeding route, then register `configure`'s services.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(SEED_SESSION_PATH, web::post().to(seed_session))
        .configure(configure)
}

/// Call the seeding route and return the issued session cookie.
pub async fn signed_in_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post().uri(SEED_SESSION_PATH).to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}
