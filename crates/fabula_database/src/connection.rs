//! Database connection utilities.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use fabula_error::{FabulaResult, StoreError, StoreErrorKind};

/// Establish a connection to the PostgreSQL database.
///
/// Loads `.env` when present, then reads the `DATABASE_URL` environment
/// variable for the connection string.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub fn establish_connection() -> FabulaResult<PgConnection> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        StoreError::new(StoreErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    PgConnection::establish(&database_url)
        .map_err(|e| StoreError::new(StoreErrorKind::Connection(e.to_string())).into())
}
