//! Database connection management with pragma configuration.
//!
//! This module handles opening the SQLite database, applying required pragmas
//! for performance and concurrency (WAL mode), and provisioning the schema.

use super::{StoreError, schema};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio_rusqlite::Connection;

const PRAGMAS: &str = "PRAGMA journal_mode=WAL;
     PRAGMA synchronous=NORMAL;
     PRAGMA temp_store=MEMORY;
     PRAGMA foreign_keys=ON;";

/// How a record's classification and address are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLayout {
    /// Name and coordinate columns only. Cached records come back without
    /// classification or address.
    Columns,
    /// Name and coordinate columns plus a JSON document holding the
    /// classification and address hierarchy.
    #[default]
    Document,
}

/// Which stored text a name lookup matches against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Only the original query text.
    QueryOnly,
    /// The original query text or the resolved display name.
    #[default]
    QueryOrName,
}

/// Store behaviour knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheOptions {
    pub layout: StorageLayout,
    pub name_match: NameMatch,
}

/// Cache database handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread. Clones share the same connection.
#[derive(Clone, Debug)]
pub struct CacheDb {
    pub(crate) conn: Connection,
    pub(crate) options: CacheOptions,
}

impl CacheDb {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and provisions the schema.
    pub async fn open(path: impl AsRef<Path>, options: CacheOptions) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Database(e.into()))?;

        tracing::debug!(path = %path.display(), ?options, "opened place cache");
        Self::init(conn, options).await
    }

    /// Open an in-memory database.
    ///
    /// Creates a temporary in-memory SQLite database with the same
    /// pragma configuration as file-based databases.
    pub async fn open_in_memory(options: CacheOptions) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Database(e.into()))?;

        Self::init(conn, options).await
    }

    async fn init(conn: Connection, options: CacheOptions) -> Result<Self, StoreError> {
        conn.call(|conn| conn.execute_batch(PRAGMAS))
            .await
            .map_err(StoreError::Database)?;

        schema::provision(&conn).await?;

        Ok(Self { conn, options })
    }

    pub fn options(&self) -> CacheOptions {
        self.options
    }
}
