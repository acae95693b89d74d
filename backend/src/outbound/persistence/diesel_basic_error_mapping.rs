//! Shared Diesel error mapping for SQLite-backed repositories.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// A locked or busy database is reported as a connection failure because the
/// caller may succeed once the competing writer finishes.
pub fn map_basic_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, info) if is_lock_contention(info.message()) => {
            connection("database is busy")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("foreign key violation")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            query("check constraint violation")
        }
        _ => query("database error"),
    }
}

fn is_lock_contention(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database is busy")
}
