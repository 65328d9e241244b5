//! Shared harness for HTTP integration tests.
//!
//! Builds the full `/api/v1` surface over the in-memory adapters so tests
//! exercise real services, session handling and error mapping.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test, web};
use helpdesk::Trace;
use helpdesk::domain::ports::{DashboardQuery, IdentityService, KnowledgeBaseQuery};
use helpdesk::domain::{
    DashboardService, KnowledgeBaseService, TicketService, TicketServiceSettings,
    UserIdentityService,
};
use helpdesk::inbound::http::configure_api;
use helpdesk::inbound::http::state::HttpState;
use helpdesk::outbound::memory::{InMemoryAttachmentStore, InMemoryHelpdeskStore};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock, MockClock};
use serde_json::{Value, json};

const BOUNDARY: &str = "helpdesk-integration-boundary";

/// In-memory adapters plus the state wired over them.
pub struct Harness {
    pub store: Arc<InMemoryHelpdeskStore>,
    pub files: Arc<InMemoryAttachmentStore>,
    state: web::Data<HttpState>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(Arc::new(DefaultClock))
    }

    /// A harness whose clock never moves from `now`.
    pub fn frozen_at(now: DateTime<Utc>) -> Self {
        let mut clock = MockClock::new();
        clock.expect_utc().returning(move || now);
        clock
            .expect_local()
            .returning(move || now.with_timezone(&chrono::Local));
        Self::build(Arc::new(clock))
    }

    fn build(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(InMemoryHelpdeskStore::default());
        let files = Arc::new(InMemoryAttachmentStore::default());
        let tickets = Arc::new(TicketService::new(
            Arc::clone(&store),
            Arc::clone(&files),
            clock,
            TicketServiceSettings::default(),
        ));
        let identity: Arc<dyn IdentityService> =
            Arc::new(UserIdentityService::new(Arc::clone(&store)));
        let knowledge_base: Arc<dyn KnowledgeBaseQuery> =
            Arc::new(KnowledgeBaseService::new(Arc::clone(&store)));
        let dashboard: Arc<dyn DashboardQuery> = Arc::new(DashboardService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
        ));
        let state = web::Data::new(HttpState::new(
            identity,
            tickets.clone(),
            tickets,
            knowledge_base,
            dashboard,
        ));
        Self {
            store,
            files,
            state,
        }
    }

    /// The application under test.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api))
    }
}

/// Sign in and return the session cookie with the user payload.
pub async fn sign_in<S>(app: &S, email: &str, name: &str, role: &str) -> (Cookie<'static>, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/sign-in")
            .set_json(json!({ "email": email, "name": name, "role": role }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "sign-in failed: {}", res.status());
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned();
    let body: Value = test::read_body_json(res).await;
    (cookie, body)
}

/// Sign in as a regular employee.
pub async fn sign_in_user<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    sign_in(app, "employee@company.com", "Regular Employee", "USER")
        .await
        .0
}

/// Sign in as an administrator.
pub async fn sign_in_admin<S>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    sign_in(app, "admin@company.com", "System Administrator", "ADMIN")
        .await
        .0
}

/// One part of a multipart ticket form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

/// Build a `POST /api/v1/tickets` request carrying `parts`.
pub fn create_ticket_request(cookie: Cookie<'static>, parts: &[Part<'_>]) -> Request {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            ),
            Part::File(filename, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri("/api/v1/tickets")
        .cookie(cookie)
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
        .to_request()
}

/// File a ticket with no attachments and return its id.
pub async fn file_ticket<S>(app: &S, cookie: Cookie<'static>, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let created: Value = test::call_and_read_body_json(
        app,
        create_ticket_request(
            cookie,
            &[
                Part::Text("title", title),
                Part::Text("description", "Filed by the integration harness"),
                Part::Text("priority", "LOW"),
            ],
        ),
    )
    .await;
    created["id"]
        .as_str()
        .expect("ticket id in response")
        .to_owned()
}

/// Set a ticket's status as `admin`, asserting success.
pub async fn set_status<S>(app: &S, admin: Cookie<'static>, id: &str, status: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/admin/tickets/{id}"))
            .cookie(admin)
            .set_json(json!({ "status": status }))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "status update failed: {}", res.status());
    test::read_body_json(res).await
}
