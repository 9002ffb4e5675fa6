//! Cache store abstraction used by the resolver.

use places_core::{CacheDb, LookupKey, PlaceRecord, StoreError};

/// Durable place cache consulted before the remote source.
#[async_trait::async_trait]
pub trait PlaceCache: Send + Sync {
    /// Cached records for `key`; empty when nothing is cached.
    async fn find(&self, key: &LookupKey) -> Result<Vec<PlaceRecord>, StoreError>;

    /// Persist records resolved for `key`.
    async fn insert_many(&self, key: &LookupKey, records: &[PlaceRecord]) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl PlaceCache for CacheDb {
    async fn find(&self, key: &LookupKey) -> Result<Vec<PlaceRecord>, StoreError> {
        CacheDb::find(self, key).await
    }

    async fn insert_many(&self, key: &LookupKey, records: &[PlaceRecord]) -> Result<(), StoreError> {
        CacheDb::insert_many(self, key, records).await
    }
}
