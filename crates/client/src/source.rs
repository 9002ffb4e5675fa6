//! Remote place source abstraction.

use places_core::{Coordinate, PlaceRecord};

use crate::error::ResolveError;

/// A remote geocoding capability.
///
/// Implementations perform exactly one remote call per method invocation and
/// do no caching or rate limiting of their own; the resolver owns both.
#[async_trait::async_trait]
pub trait PlaceSource: Send + Sync {
    /// Forward geocode a free-form query.
    async fn search(&self, query: &str) -> Result<Vec<PlaceRecord>, ResolveError>;

    /// Reverse geocode a coordinate.
    async fn reverse(&self, coord: Coordinate) -> Result<Vec<PlaceRecord>, ResolveError>;
}
