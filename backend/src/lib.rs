//! Help-desk backend library.
//!
//! Employees file support tickets with attachments and browse a knowledge
//! base; administrators triage tickets and watch dashboard counters.
//! The crate follows a ports-and-adapters layout: `domain` owns types,
//! ports and services, `inbound` exposes them over HTTP and `outbound`
//! provides the PostgreSQL, in-memory and filesystem adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
