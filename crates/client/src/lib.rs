//! Cache-first geocoding client.
//!
//! This crate provides the Nominatim HTTP client, the rate gate that
//! serializes remote calls, and the resolver that ties the cache store and
//! the remote source together.

pub mod error;
pub mod gate;
pub mod nominatim;
pub mod resolver;
pub mod source;
pub mod store;

pub use error::{ProtocolError, ResolveError, TransportError};
pub use gate::RateGate;
pub use nominatim::{NominatimClient, NominatimConfig};
pub use resolver::Resolver;
pub use source::PlaceSource;
pub use store::PlaceCache;
