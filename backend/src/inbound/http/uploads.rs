//! Attachment download handler.
//!
//! ```text
//! GET /api/v1/uploads/{key}
//! ```

use actix_web::http::header::{
    CONTENT_TYPE, ContentDisposition, DispositionParam, DispositionType,
};
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, StorageKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::require_caller;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Download stored attachment bytes by storage key.
///
/// The offered filename drops the key's timestamp prefix.
#[utoipa::path(
    get,
    path = "/api/v1/uploads/{key}",
    params(("key" = String, Path, description = "Storage key, e.g. 1718000000000-report.pdf")),
    responses(
        (status = 200, description = "Attachment bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "File not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tickets"],
    operation_id = "downloadAttachment"
)]
#[get("/uploads/{key}")]
pub async fn download_attachment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = require_caller(&state, &session).await?;
    let key = StorageKey::parse(&path)?;
    let download = state
        .tickets_query
        .download_attachment(&caller, &key)
        .await?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(download.filename)],
    };
    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, download.content_type))
        .insert_header(disposition)
        .body(download.bytes))
}
