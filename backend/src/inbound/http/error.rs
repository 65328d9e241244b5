//! Domain errors as HTTP responses.
//!
//! Each [`ErrorCode`] owns one status. Internal failures are logged with
//! their original message and answered with a redacted body. Error responses
//! are never cached and echo the request's trace id in `trace-id`.

use actix_multipart::MultipartError;
use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use super::validation::malformed_body_error;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const fn http_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client. Internal failures are logged before redaction.
fn public_body(err: &Error) -> Error {
    if err.code() == ErrorCode::InternalError {
        error!(
            trace_id = err.trace_id().unwrap_or("-"),
            message = err.message(),
            "internal error redacted from response"
        );
    }
    err.redacted()
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(CacheControl(vec![CacheDirective::NoStore]));
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_body(self))
    }
}

impl From<MultipartError> for Error {
    fn from(err: MultipartError) -> Self {
        malformed_body_error(err)
    }
}
