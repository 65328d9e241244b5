//! Ticket API handlers for requesters.
//!
//! ```text
//! POST /api/v1/tickets               multipart: title, description, priority, files*
//! GET  /api/v1/tickets
//! POST /api/v1/tickets/{id}/comments {"content":"..."}
//! ```

use actix_multipart::{Field, Multipart};
use actix_web::{get, post, web};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CommentBody, CommentWithAuthor, CreatedTicket, Error, TicketDetails, TicketDraft, TicketId,
    UploadedFile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    malformed_body_error, missing_field_error, oversized_part_error, parse_path_id,
};

/// Multipart form accepted by `POST /api/v1/tickets` (documentation only).
#[derive(Debug, ToSchema)]
pub struct CreateTicketForm {
    pub title: String,
    pub description: String,
    /// `LOW`, `MEDIUM` (default), `HIGH` or `URGENT`.
    pub priority: Option<String>,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
}

/// Comment request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Default)]
struct TicketForm {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    files: Vec<UploadedFile>,
}

impl TicketForm {
    fn into_parts(self) -> ApiResult<(TicketDraft, Vec<UploadedFile>)> {
        let title = self.title.ok_or_else(|| missing_field_error("title"))?;
        let description = self
            .description
            .ok_or_else(|| missing_field_error("description"))?;
        let draft = TicketDraft::try_new(&title, &description, self.priority.as_deref())?;
        Ok((draft, self.files))
    }
}

/// Buffer one part, giving up as soon as it grows past `limit`.
async fn read_bytes(field: &mut Field, name: &str, limit: usize) -> ApiResult<Vec<u8>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(oversized_part_error(name, limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn read_text(field: &mut Field, name: &str, limit: usize) -> ApiResult<String> {
    let bytes = read_bytes(field, name, limit).await?;
    String::from_utf8(bytes).map_err(|_| {
        malformed_body_error(format!("field {name} is not valid UTF-8"))
    })
}

async fn read_ticket_form(mut payload: Multipart, limit: usize) -> ApiResult<TicketForm> {
    let mut form = TicketForm::default();
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => form.title = Some(read_text(&mut field, "title", limit).await?),
            "description" => {
                form.description = Some(read_text(&mut field, "description", limit).await?);
            }
            "priority" => form.priority = Some(read_text(&mut field, "priority", limit).await?),
            "files" => {
                let original_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .unwrap_or_default()
                    .to_owned();
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = read_bytes(&mut field, "files", limit).await?;
                form.files.push(UploadedFile {
                    original_name,
                    content_type,
                    bytes,
                });
            }
            _ => {
                read_bytes(&mut field, &name, limit).await?;
            }
        }
    }
    Ok(form)
}

/// File a ticket with optional attachments.
///
/// Zero-byte files are skipped and any part over the upload cap rejects the
/// whole request before it is buffered. Files whose storage fails are listed in
/// `failedAttachments`; the ticket itself is still created.
#[utoipa::path(
    post,
    path = "/api/v1/tickets",
    request_body(content = CreateTicketForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created ticket", body = CreatedTicket),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "createTicket"
)]
#[post("/tickets")]
pub async fn create_ticket(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Multipart,
) -> ApiResult<web::Json<CreatedTicket>> {
    let caller = require_caller(&state, &session).await?;
    let (draft, files) = read_ticket_form(payload, state.upload_limit)
        .await?
        .into_parts()?;
    let created = state.tickets.create_ticket(&caller, draft, files).await?;
    Ok(web::Json(created))
}

/// List the caller's own tickets, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/tickets",
    responses(
        (status = 200, description = "Tickets filed by the caller", body = [TicketDetails]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Service unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "listOwnTickets"
)]
#[get("/tickets")]
pub async fn list_own_tickets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<TicketDetails>>> {
    let caller = require_caller(&state, &session).await?;
    let tickets = state.tickets_query.list_own_tickets(&caller).await?;
    Ok(web::Json(tickets))
}

/// Reply to a ticket. Owners and admins may both comment.
#[utoipa::path(
    post,
    path = "/api/v1/tickets/{id}/comments",
    params(("id" = String, Path, description = "Ticket identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Created comment", body = CommentWithAuthor),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Ticket not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "addComment"
)]
#[post("/tickets/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<CommentWithAuthor>> {
    let caller = require_caller(&state, &session).await?;
    let ticket_id: TicketId = parse_path_id(&path, "Ticket not found")?;
    let body = CommentBody::new(payload.into_inner().content)?;
    let comment = state.tickets.add_comment(&caller, ticket_id, body).await?;
    Ok(web::Json(comment))
}
