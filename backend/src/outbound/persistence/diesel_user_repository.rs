//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};
use crate::outbound::deadline::bounded;

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::row_mapping::user_from_row;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn upsert_by_email(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let new_row = NewUserRow {
                    id: *UserId::random().as_uuid(),
                    email: user.email.as_ref(),
                    name: user.name.as_ref(),
                    role: user.role.as_str(),
                };

                diesel::insert_into(users::table)
                    .values(&new_row)
                    .on_conflict(users::email)
                    .do_nothing()
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;

                let row = users::table
                    .filter(users::email.eq(user.email.as_ref()))
                    .select(UserRow::as_select())
                    .first::<UserRow>(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                user_from_row(row).map_err(UserPersistenceError::query)
            },
            UserPersistenceError::timeout,
        )
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let row = users::table
                    .find(id.as_uuid())
                    .select(UserRow::as_select())
                    .first::<UserRow>(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)?;
                row.map(user_from_row)
                    .transpose()
                    .map_err(UserPersistenceError::query)
            },
            UserPersistenceError::timeout,
        )
        .await
    }

    async fn count(&self) -> Result<i64, UserPersistenceError> {
        bounded(
            self.pool.query_timeout(),
            async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                users::table
                    .count()
                    .get_result::<i64>(&mut conn)
                    .await
                    .map_err(map_diesel_error)
            },
            UserPersistenceError::timeout,
        )
        .await
    }
}
