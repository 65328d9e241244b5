//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the help-desk repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Bounded calls**: every repository operation runs under the pool's
//!   query timeout and reports overruns as a `Timeout` port error.
//!
//! # Example
//!
//! ```ignore
//! use helpdesk::outbound::persistence::{DbPool, DieselTicketRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/helpdesk")).await?;
//! let tickets = DieselTicketRepository::new(pool);
//! ```

mod diesel_article_repository;
mod diesel_basic_error_mapping;
mod diesel_ticket_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod row_mapping;
mod schema;

pub use diesel_article_repository::DieselArticleRepository;
pub use diesel_ticket_repository::DieselTicketRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
