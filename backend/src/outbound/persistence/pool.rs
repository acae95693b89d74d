//! Pooled SQLite connections for the Diesel persistence adapters.
//!
//! SQLite has no async driver, so the pool hands out blocking connections
//! and adapters run their work on Tokio's blocking threads. Every connection
//! enables foreign keys and a busy timeout when it is checked out, and
//! pending migrations run once when the pool is built.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// Schema migrations could not be applied.
    #[error("failed to run database migrations: {message}")]
    Migration { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use utang::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("utang.db")
///     .with_max_size(4)
///     .with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.database_url(), "utang.db");
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
    busy_timeout: Duration,
}

impl PoolConfig {
    /// Create a new configuration for the SQLite file at `database_url`.
    ///
    /// Defaults:
    /// - `max_size`: 8 connections
    /// - `connection_timeout`: 30 seconds
    /// - `busy_timeout`: 5 seconds
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 8,
            connection_timeout: Duration::from_secs(30),
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// How long a connection waits on a locked database before failing.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Connection pool for SQLite via Diesel and r2d2.
///
/// # Example
///
/// ```no_run
/// use utang::outbound::persistence::{DbPool, PoolConfig};
///
/// let pool = DbPool::new(PoolConfig::new("utang.db"))?;
/// let mut conn = pool.get()?;
/// # Ok::<(), utang::outbound::persistence::PoolError>(())
/// ```
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbPool {
    /// Build the pool and bring the schema up to date.
    ///
    /// This blocks while connections are opened; call it before the async
    /// runtime starts serving requests.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Build` if the database cannot be opened and
    /// `PoolError::Migration` if the schema cannot be migrated.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: config.busy_timeout,
            }))
            .build(manager)
            .map_err(|err| PoolError::build(err.to_string()))?;

        let pool = Self { inner };
        let mut pooled = pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::migration(err.to_string()))?;
        Ok(pool)
    }

    /// Get a connection from the pool, blocking up to the checkout timeout.
    ///
    /// # Errors
    ///
    /// Returns `PoolError::Checkout` if no connection becomes available in
    /// time.
    pub fn get(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, PoolError> {
        self.inner
            .get()
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
