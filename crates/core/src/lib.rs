//! Core types and shared functionality for the places geocoding client.
//!
//! This crate provides:
//! - Place domain types (coordinates, records, lookup keys)
//! - Cache implementation with SQLite backend
//! - Store error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod place;

pub use cache::{CacheDb, CacheOptions, NameMatch, StorageLayout};
pub use config::{AppConfig, ConfigError};
pub use error::StoreError;
pub use place::{Address, Coordinate, CoordinateError, LookupKey, PlaceDetails, PlaceRecord, PlaceType};
