//! Cache-first place resolution.
//!
//! Every lookup, by name or by coordinate, follows the same path:
//!
//! 1. Ask the cache. A cache fault is logged and treated as a miss.
//! 2. On a hit, return the cached records. Cached entries never expire.
//! 3. On a miss, call the remote source inside the rate gate, persist what
//!    came back, and return it. Empty answers are not persisted.
//!
//! A failure to persist after a successful fetch is logged and swallowed;
//! the caller still gets the fetched records.

use std::sync::Arc;

use places_core::{AppConfig, CacheDb, Coordinate, LookupKey, PlaceRecord};

use crate::error::ResolveError;
use crate::gate::RateGate;
use crate::nominatim::{NominatimClient, NominatimConfig};
use crate::source::PlaceSource;
use crate::store::PlaceCache;

/// Resolves names and coordinates to place records.
#[derive(Clone)]
pub struct Resolver {
    cache: Arc<dyn PlaceCache>,
    source: Arc<dyn PlaceSource>,
    gate: Arc<RateGate>,
}

impl Resolver {
    /// Resolver with the default on-disk cache, Nominatim, and the global gate.
    pub async fn new(user_agent: impl Into<String>) -> Result<Self, ResolveError> {
        Self::from_config(&AppConfig::with_user_agent(user_agent)).await
    }

    /// Resolver built from application configuration.
    ///
    /// Opens the cache (on disk at `db_path`, or in memory), builds the
    /// Nominatim client, and joins the process-wide rate gate.
    pub async fn from_config(config: &AppConfig) -> Result<Self, ResolveError> {
        config.validate()?;

        let source = NominatimClient::new(NominatimConfig::from_app_config(config)?)?;

        let options = config.cache_options();
        let cache = if config.in_memory {
            CacheDb::open_in_memory(options).await?
        } else {
            CacheDb::open(&config.db_path, options).await?
        };

        Ok(Self::with_parts(Arc::new(cache), Arc::new(source), RateGate::init_global(config.pacing())))
    }

    /// Resolver from explicit parts.
    pub fn with_parts(cache: Arc<dyn PlaceCache>, source: Arc<dyn PlaceSource>, gate: Arc<RateGate>) -> Self {
        Self { cache, source, gate }
    }

    /// Resolve a place name.
    pub async fn resolve_by_name(&self, name: &str) -> Result<Vec<PlaceRecord>, ResolveError> {
        self.resolve(LookupKey::Name(name.to_string())).await
    }

    /// Resolve a coordinate.
    pub async fn resolve_by_coordinate(&self, coord: Coordinate) -> Result<Vec<PlaceRecord>, ResolveError> {
        self.resolve(LookupKey::Coordinate(coord)).await
    }

    /// Resolve any lookup key, cache first.
    pub async fn resolve(&self, key: LookupKey) -> Result<Vec<PlaceRecord>, ResolveError> {
        if let LookupKey::Name(name) = &key
            && name.trim().is_empty()
        {
            return Err(ResolveError::InvalidInput("name cannot be empty".to_string()));
        }

        match self.cache.find(&key).await {
            Ok(records) if !records.is_empty() => {
                tracing::debug!(%key, count = records.len(), "cache hit");
                return Ok(records);
            }
            Ok(_) => tracing::debug!(%key, "cache miss"),
            Err(e) => tracing::warn!(%key, error = %e, "cache lookup failed; treating as miss"),
        }

        self.gate
            .run(async {
                let records = self.fetch(&key).await?;
                self.persist(&key, &records).await;
                Ok::<_, ResolveError>(records)
            })
            .await
    }

    async fn fetch(&self, key: &LookupKey) -> Result<Vec<PlaceRecord>, ResolveError> {
        let records = match key {
            LookupKey::Name(name) => self.source.search(name).await?,
            LookupKey::Coordinate(coord) => self.source.reverse(*coord).await?,
        };
        tracing::debug!(%key, count = records.len(), "remote lookup completed");
        Ok(records)
    }

    async fn persist(&self, key: &LookupKey, records: &[PlaceRecord]) {
        if records.is_empty() {
            return;
        }
        if let Err(e) = self.cache.insert_many(key, records).await {
            tracing::warn!(%key, error = %e, "failed to cache resolved places");
        }
    }
}
