//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: SQLite-backed ledger repository using Diesel.
//! - **credentials**: operator account supplied through configuration.
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod credentials;
pub mod persistence;
