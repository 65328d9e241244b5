//! Sign-in API handlers.
//!
//! ```text
//! POST /api/v1/auth/sign-in {"email":"ada@company.com","name":"Ada","role":"USER"}
//! POST /api/v1/auth/sign-out
//! GET /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Caller, Error, SignInCredentials, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-in request body for `POST /api/v1/auth/sign-in`.
///
/// Example JSON:
/// `{"email":"ada@company.com","name":"Ada Lovelace","role":"ADMIN"}`
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl TryFrom<SignInRequest> for SignInCredentials {
    type Error = Error;

    fn try_from(value: SignInRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_from_parts(
            &value.email,
            &value.name,
            value.role.as_deref(),
        )?)
    }
}

/// Sign in with demo credentials and establish a session.
///
/// The user is created on first sign-in; later sign-ins with the same email
/// keep the stored name and role.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = User, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/sign-in")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<web::Json<User>> {
    let credentials = SignInCredentials::try_from(payload.into_inner())?;
    let user = state.identity.sign_in(&credentials).await?;
    session.persist_user(&user.id)?;
    info!(user_id = %user.id, role = user.role.as_str(), "user signed in");
    Ok(web::Json(user))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-out",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[post("/auth/sign-out")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Return the signed-in caller.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Signed-in caller", body = Caller),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentCaller"
)]
#[get("/auth/me")]
pub async fn current_caller(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Caller>> {
    let caller = require_caller(&state, &session).await?;
    Ok(web::Json(caller))
}

#[cfg(test)]
mod tests;
