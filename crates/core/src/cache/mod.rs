//! SQLite-backed cache of resolved places.
//!
//! This module provides a persistent, append-only place cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Lookup by name (query text and/or resolved display name)
//! - Lookup by coordinate (record coordinate or reverse-query coordinate)
//! - Static, idempotent schema provisioning
//! - WAL mode for concurrent access
//! - Flat-column or JSON-document storage layouts

pub mod connection;
pub mod places;
pub mod schema;

pub use crate::StoreError;

pub use connection::{CacheDb, CacheOptions, NameMatch, StorageLayout};
