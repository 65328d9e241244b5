//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel
//! - **memory**: process-local repositories for development and tests
//! - **file_store**: attachment bytes on the local filesystem
//!
//! Adapters translate between domain types and storage representations and
//! carry no business rules.

pub(crate) mod deadline;
pub mod file_store;
pub mod memory;
pub mod persistence;
