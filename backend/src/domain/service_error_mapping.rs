//! Translate driven-port failures into domain errors at service boundaries.
//!
//! Each mapper logs the underlying failure once; the returned [`Error`] is
//! what the caller sees.

use serde_json::json;
use tracing::error;

use crate::domain::ports::{
    ArticleRepositoryError, AttachmentStoreError, TicketRepositoryError, UserPersistenceError,
};
use crate::domain::{Error, StorageKeyError, TicketValidationError, UserValidationError};

/// Outages and timeouts surface as 503; anything else the store reports is
/// an internal fault.
fn store_failure(store: &str, unavailable: bool, detail: &str) -> Error {
    if unavailable {
        Error::service_unavailable(format!("{store} unavailable: {detail}"))
    } else {
        Error::internal(format!("{store} error: {detail}"))
    }
}

pub(crate) fn map_user_repository_error(err: UserPersistenceError) -> Error {
    error!(error = %err, "user repository failure");
    let unavailable = !matches!(err, UserPersistenceError::Query { .. });
    store_failure("user repository", unavailable, err.message())
}

pub(crate) fn map_ticket_repository_error(err: TicketRepositoryError) -> Error {
    error!(error = %err, "ticket repository failure");
    let unavailable = !matches!(err, TicketRepositoryError::Query { .. });
    store_failure("ticket repository", unavailable, err.message())
}

pub(crate) fn map_article_repository_error(err: ArticleRepositoryError) -> Error {
    error!(error = %err, "article repository failure");
    let unavailable = !matches!(err, ArticleRepositoryError::Query { .. });
    store_failure("article repository", unavailable, err.message())
}

pub(crate) fn map_attachment_store_error(err: AttachmentStoreError) -> Error {
    error!(error = %err, "attachment store failure");
    let unavailable = matches!(err, AttachmentStoreError::Timeout { .. });
    store_failure("attachment store", unavailable, err.message())
}

/// Validation failure carrying `{field, code}` details.
pub(crate) fn invalid_field(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

impl From<TicketValidationError> for Error {
    fn from(err: TicketValidationError) -> Self {
        invalid_field(err.field(), err.code(), err.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        let (field, code) = match &err {
            UserValidationError::EmptyEmail => ("email", "empty"),
            UserValidationError::InvalidEmail => ("email", "invalid_format"),
            UserValidationError::EmptyDisplayName => ("name", "empty"),
            UserValidationError::DisplayNameTooLong { .. } => ("name", "too_long"),
            UserValidationError::UnknownRole => ("role", "unknown_value"),
        };
        invalid_field(field, code, err.to_string())
    }
}

impl From<StorageKeyError> for Error {
    fn from(err: StorageKeyError) -> Self {
        Error::not_found(format!("attachment not found: {err}"))
    }
}
