//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed",
        /// Query or mutation failed during execution.
        Query => "user repository query failed",
        /// The store did not answer within the configured bound.
        Timeout => "user repository timed out",
    }
}

/// Driven port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert the user unless one with the same email exists; return the
    /// stored row either way. Existing rows keep their name and role.
    async fn upsert_by_email(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Total number of users.
    async fn count(&self) -> Result<i64, UserPersistenceError>;
}
