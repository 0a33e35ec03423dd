//! Shared error mapping from pool and Diesel failures to port errors.

use tracing::debug;

use crate::domain::ports::PersistenceError;

use super::pool::PoolError;

/// Map a pool failure to a connection error.
pub(crate) fn map_pool_error(error: PoolError) -> PersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    PersistenceError::connection(message)
}

/// Map common Diesel error variants to port errors.
///
/// A closed connection is transient and maps to a connection error; every
/// other failure is a query error. Detail stays in the debug log so error
/// payloads never leak SQL.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> PersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => PersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => PersistenceError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PersistenceError::connection("database connection error")
        }
        _ => PersistenceError::query("database error"),
    }
}

/// Escape `%` and `_` so user search terms match literally under `ILIKE`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}
