//! User data model.
//!
//! Users are identified by a UUID and a unique email address. The role is a
//! plain field checked per operation; admins differ from requesters only in
//! what they are allowed to do.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors for user fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email lacked a `local@domain` shape.
    #[error("email must look like name@domain")]
    InvalidEmail,
    /// Name was blank.
    #[error("name must not be empty")]
    EmptyDisplayName,
    /// Name exceeded [`DISPLAY_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    /// Role was not `USER` or `ADMIN`.
    #[error("role must be USER or ADMIN")]
    UnknownRole,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised (trimmed, lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable name shown next to tickets, comments and articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a display name; surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorization role.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Employee filing tickets.
    #[default]
    User,
    /// Support staff with triage and dashboard access.
    Admin,
}

impl Role {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole),
        }
    }
}

/// Application user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "admin@company.com")]
    pub email: EmailAddress,
    #[schema(value_type = String, example = "Support Desk")]
    pub name: DisplayName,
    pub role: Role,
}

impl User {
    /// Whether the user may perform admin-only operations.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Input for inserting a user that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: DisplayName,
    pub role: Role,
}
