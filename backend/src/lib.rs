//! Utang: a store credit ledger.
//!
//! The crate follows a hexagonal layout. [`domain`] owns the ledger rules and
//! the ports, [`inbound`] drives them over HTTP, and [`outbound`] implements
//! them on SQLite.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
