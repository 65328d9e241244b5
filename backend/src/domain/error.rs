//! The error payload every help-desk operation fails with.
//!
//! Transport agnostic: the HTTP adapter turns it into a status code and a
//! JSON body, the `trace-id` header included.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::TraceId;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing or malformed input.
    InvalidRequest,
    /// No session, or the caller lacks the role the operation requires.
    Unauthorized,
    /// The referenced ticket, article or file does not exist.
    NotFound,
    /// A store did not answer within its timeout or refused connections.
    ServiceUnavailable,
    /// An unexpected failure inside a collaborator.
    InternalError,
}

impl ErrorCode {
    /// Generic message for the category, used when no better text exists.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Not found",
            Self::ServiceUnavailable => "Service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Domain error payload: `{code, message, traceId?, details?}`.
///
/// The message is never blank. Errors raised inside a traced request pick
/// up its [`TraceId`].
///
/// ```
/// use helpdesk::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("ticket not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
///
/// let blank = Error::invalid_request("  ");
/// assert_eq!(blank.message(), "Invalid request");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "title must not be empty")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Rejections raised when decoding an error payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

impl Error {
    /// Build an error in the current trace scope. A blank message is
    /// replaced by [`ErrorCode::summary`].
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.summary().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details, e.g. `{field, code}` for validation
    /// failures.
    ///
    /// ```
    /// use helpdesk::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "title" }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id.to_string());
        self
    }

    /// Copy safe to show a client: same code and trace, but internal errors
    /// lose their message and details.
    #[must_use]
    pub fn redacted(&self) -> Self {
        if self.code != ErrorCode::InternalError {
            return self.clone();
        }
        Self {
            code: self.code,
            message: self.code.summary().to_owned(),
            trace_id: self.trace_id.clone(),
            details: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ErrorDto {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(alias = "trace_id")]
    pub(crate) trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
        } = value;
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

/// Decoded payloads keep exactly what they carried; the ambient trace is
/// never mixed in.
impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        if value.message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        if value
            .trace_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        Ok(Self {
            code: value.code,
            message: value.message,
            trace_id: value.trace_id,
            details: value.details,
        })
    }
}
