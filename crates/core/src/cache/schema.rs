//! Static schema provisioning.
//!
//! The schema is a fixed SQL batch embedded at compile time. Every statement
//! uses `IF NOT EXISTS`, so provisioning an existing database is a no-op.
//! There is no version table and no migration path.

use super::StoreError;
use tokio_rusqlite::Connection;

const SCHEMA: &str = include_str!("../../schema/places.sql");

/// Create the places table and its indexes if they are absent.
///
/// # Errors
///
/// Returns `StoreError::Schema` if the schema batch fails to execute.
pub async fn provision(conn: &Connection) -> Result<(), StoreError> {
    conn.call(|conn| conn.execute_batch(SCHEMA))
        .await
        .map_err(|e| StoreError::Schema(e.to_string()))
}
