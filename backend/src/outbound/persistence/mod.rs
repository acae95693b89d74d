//! SQLite persistence adapters using Diesel.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations translate between Diesel
//!   rows and domain types. Status transitions are decided by the domain
//!   state machine and only persisted here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Blocking pool**: connections come from an r2d2 pool and run on Tokio's
//!   blocking threads.
//!
//! # Example
//!
//! ```no_run
//! use utang::outbound::persistence::{DbPool, DieselLedgerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("utang.db"))?;
//! let repository = DieselLedgerRepository::new(pool);
//! # Ok::<(), utang::outbound::persistence::PoolError>(())
//! ```

mod diesel_basic_error_mapping;
mod diesel_ledger_repository;
mod ledger_compaction;
mod models;
mod pool;
mod schema;

pub use diesel_ledger_repository::DieselLedgerRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
