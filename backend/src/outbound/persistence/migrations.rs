//! Embedded schema migrations applied at startup.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// SQL migrations compiled into the binary from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {0}")]
    Connect(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply pending migrations over a blocking connection.
///
/// Call from a blocking context, e.g. `tokio::task::spawn_blocking`.
/// Returns how many migrations were applied.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}
