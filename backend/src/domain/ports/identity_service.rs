//! Driving port for the demo identity provider.
//!
//! Inbound adapters sign users in through this port and resolve the session
//! user id into a [`Caller`] before invoking any other use case.

use async_trait::async_trait;

use crate::domain::{Caller, Error, SignInCredentials, User, UserId};

/// Domain use-case port for sign-in and caller resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Upsert the user identified by the credentials' email and return it.
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<User, Error>;

    /// Resolve a session user id; `None` when the user no longer exists.
    async fn resolve_caller(&self, user_id: &UserId) -> Result<Option<Caller>, Error>;
}
