//! Admin triage and reporting handlers.
//!
//! ```text
//! GET   /api/v1/admin/tickets
//! PATCH /api/v1/admin/tickets/{id} {"status":"RESOLVED"}
//! GET   /api/v1/admin/dashboard
//! ```
//!
//! Role checks happen in the services; these handlers only resolve the
//! caller and translate payloads.

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    DashboardStats, Error, TicketDetails, TicketId, TicketStatus, TicketValidationError,
    TicketWithRequester,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_path_id;

/// Status change request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    /// `OPEN`, `IN_PROGRESS`, `RESOLVED` or `CLOSED`.
    pub status: String,
}

impl TryFrom<StatusUpdateRequest> for TicketStatus {
    type Error = TicketValidationError;

    fn try_from(value: StatusUpdateRequest) -> Result<Self, Self::Error> {
        value.status.parse()
    }
}

/// List every ticket, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/tickets",
    responses(
        (status = 200, description = "All tickets", body = [TicketDetails]),
        (status = 401, description = "Unauthorised or not an admin", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAllTickets"
)]
#[get("/admin/tickets")]
pub async fn list_all_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketDetails>>> {
    let caller = require_caller(&state, &session).await?;
    let tickets = state.tickets_query.list_all_tickets(&caller).await?;
    Ok(web::Json(tickets))
}

/// Move a ticket to any status.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/tickets/{id}",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated ticket", body = TicketWithRequester),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Unauthorised or not an admin", body = Error),
        (status = 404, description = "Ticket not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateTicketStatus"
)]
#[patch("/admin/tickets/{id}")]
pub async fn update_ticket_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusUpdateRequest>,
) -> ApiResult<web::Json<TicketWithRequester>> {
    let caller = require_caller(&state, &session).await?;
    let ticket_id: TicketId = parse_path_id(&path, "Ticket not found")?;
    let status = TicketStatus::try_from(payload.into_inner())?;
    let updated = state
        .tickets
        .update_status(&caller, ticket_id, status)
        .await?;
    Ok(web::Json(updated))
}

/// Point-in-time help-desk statistics.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorised or not an admin", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dashboardStats"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardStats>> {
    let caller = require_caller(&state, &session).await?;
    let stats = state.dashboard.stats(&caller).await?;
    Ok(web::Json(stats))
}
