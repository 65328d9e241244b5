//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only persist, read or clear the
//! signed-in user's id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require a signed-in user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the session and expire its cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    const FIXTURE_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/set",
                web::get().to(|session: SessionContext| async move {
                    let id = UserId::new(FIXTURE_ID).expect("fixture id");
                    session.persist_user(&id)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/get",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_user_id()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            )
            .route(
                "/clear",
                web::get().to(|session: SessionContext| async move {
                    session.purge();
                    HttpResponse::NoContent()
                }),
            )
            .route(
                "/set-invalid",
                web::get().to(|session: Session| async move {
                    session
                        .insert(USER_ID_KEY, "not-a-uuid")
                        .expect("set invalid user id");
                    HttpResponse::Ok()
                }),
            )
    }

    fn session_cookie(
        res: &actix_web::dev::ServiceResponse,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, FIXTURE_ID);
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = test::init_service(session_test_app()).await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn purge_expires_the_cookie() {
        let app = test::init_service(session_test_app()).await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let clear_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/clear").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(clear_res.status(), StatusCode::NO_CONTENT);
        let removal = session_cookie(&clear_res);
        assert_eq!(removal.value(), "");
    }
}
