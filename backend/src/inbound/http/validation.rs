//! Shared request parsing helpers for inbound HTTP adapters.

use std::str::FromStr;

use serde_json::json;

use crate::domain::Error;

/// Error for a required field that was not sent at all.
pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

/// Error for a request body that could not be decoded.
pub(crate) fn malformed_body_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed request body: {reason}"))
        .with_details(json!({ "code": "malformed_body" }))
}

/// Error for a multipart part larger than the upload cap.
pub(crate) fn oversized_part_error(field: &str, limit: usize) -> Error {
    Error::invalid_request(format!("{field} exceeds the {limit} byte upload limit"))
        .with_details(json!({ "field": field, "code": "too_large" }))
}

/// Parse an identifier taken from the URL path.
///
/// An unparseable id cannot name a stored record, so it reports `not_found`
/// with `missing` as the message.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, missing: &str) -> Result<T, Error> {
    raw.parse().map_err(|_| Error::not_found(missing))
}
