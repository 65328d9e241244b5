//! Shared Diesel error mapping for the help-desk repositories.
//!
//! Every repository port exposes the same `Connection`/`Query`/`Timeout`
//! shape, so the mapping is written once against constructor closures.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.message().to_owned())
}

/// Map Diesel errors into query or connection errors.
///
/// Constraint violations keep a short description of which constraint
/// failed; other database messages are logged at debug level only.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), constraint = ?info.constraint_name(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("duplicate record")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("value rejected by check constraint")
        }
        _ => query("database error"),
    }
}
