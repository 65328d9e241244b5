//! Demo identity provider backed by the user repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{IdentityService, UserRepository};
use crate::domain::service_error_mapping::map_user_repository_error;
use crate::domain::{Caller, Error, NewUser, SignInCredentials, User, UserId};

/// Upserts users by email on sign-in and resolves session ids to callers.
#[derive(Clone)]
pub struct UserIdentityService<U> {
    users: Arc<U>,
}

impl<U> UserIdentityService<U> {
    /// Create the service over a user repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U> IdentityService for UserIdentityService<U>
where
    U: UserRepository,
{
    async fn sign_in(&self, credentials: &SignInCredentials) -> Result<User, Error> {
        let user = self
            .users
            .upsert_by_email(&NewUser {
                email: credentials.email().clone(),
                name: credentials.name().clone(),
                role: credentials.role(),
            })
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, role = user.role.as_str(), "user signed in");
        Ok(user)
    }

    async fn resolve_caller(&self, user_id: &UserId) -> Result<Option<Caller>, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?;
        Ok(user.map(Caller::from))
    }
}
