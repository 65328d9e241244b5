//! Authentication primitives: sign-in input and the authenticated caller.
//!
//! Inbound adapters parse raw strings into [`SignInCredentials`] before
//! talking to the identity port, and pass a resolved [`Caller`] into every
//! service call instead of reading ambient request state.

use serde::Serialize;
use utoipa::ToSchema;

use super::{DisplayName, EmailAddress, Error, Role, User, UserId, UserValidationError};

/// Validated demo sign-in input.
///
/// # Examples
/// ```
/// use helpdesk::domain::{Role, SignInCredentials};
///
/// let creds = SignInCredentials::try_from_parts("User@Company.com", "Somchai", None).unwrap();
/// assert_eq!(creds.email().as_ref(), "user@company.com");
/// assert_eq!(creds.role(), Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: EmailAddress,
    name: DisplayName,
    role: Role,
}

impl SignInCredentials {
    /// Validate raw sign-in fields. A missing role defaults to [`Role::User`].
    pub fn try_from_parts(
        email: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let email = EmailAddress::new(email)?;
        let name = DisplayName::new(name)?;
        let role = match role {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => Role::default(),
        };
        Ok(Self { email, name, role })
    }

    /// Email used as the upsert key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Name stored when the user is created.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Role stored when the user is created.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Identity of the user issuing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = String)]
    pub name: DisplayName,
    #[schema(value_type = String)]
    pub email: EmailAddress,
    pub role: Role,
}

impl Caller {
    /// Whether the caller holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Fail with `Unauthorized` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "admin role required");
            Err(Error::unauthorized("admin role required"))
        }
    }
}

impl From<User> for Caller {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn caller(role: Role) -> Caller {
        Caller {
            user_id: UserId::random(),
            name: DisplayName::new("Somchai").expect("name"),
            email: EmailAddress::new("somchai@company.com").expect("email"),
            role,
        }
    }

    #[rstest]
    #[case(None, Role::User)]
    #[case(Some(""), Role::User)]
    #[case(Some("ADMIN"), Role::Admin)]
    fn role_defaults_to_user(#[case] role: Option<&str>, #[case] expected: Role) {
        let creds =
            SignInCredentials::try_from_parts("a@b.com", "Ada", role).expect("valid credentials");
        assert_eq!(creds.role(), expected);
    }

    #[rstest]
    #[case("", "Ada", None, UserValidationError::EmptyEmail)]
    #[case("a@b.com", " ", None, UserValidationError::EmptyDisplayName)]
    #[case("a@b.com", "Ada", Some("ROOT"), UserValidationError::UnknownRole)]
    fn invalid_sign_in_fields(
        #[case] email: &str,
        #[case] name: &str,
        #[case] role: Option<&str>,
        #[case] expected: UserValidationError,
    ) {
        let err = SignInCredentials::try_from_parts(email, name, role).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn require_admin_accepts_admins() {
        assert!(caller(Role::Admin).require_admin().is_ok());
    }

    #[rstest]
    fn require_admin_rejects_users_as_unauthorized() {
        let err = caller(Role::User).require_admin().expect_err("not admin");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
