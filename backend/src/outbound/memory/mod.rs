//! In-memory adapters for database-less runs and integration tests.
//!
//! [`InMemoryHelpdeskStore`] implements every repository port over one
//! mutex-guarded state, enforcing the same foreign-key and uniqueness rules
//! as the PostgreSQL schema. [`InMemoryAttachmentStore`] keeps uploaded bytes
//! in a map.

mod attachment_store;
mod helpdesk_store;

pub use attachment_store::InMemoryAttachmentStore;
pub use helpdesk_store::InMemoryHelpdeskStore;
