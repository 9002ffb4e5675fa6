//! Resolver error types.
//!
//! `ResolveError` is what callers see. It wraps a transport failure, a
//! protocol failure, or one of the construction-time problems.

use places_core::{ConfigError, StoreError};
use std::sync::Arc;

/// Network-level failures talking to the geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// DNS, connection, or body read failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// The HTTP client or an endpoint URL could not be set up.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout } else { TransportError::Network(Arc::new(err)) }
    }
}

/// The service answered, but not with something usable.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Non-2xx HTTP status.
    #[error("HTTP error: {status}")]
    HttpStatus { status: u16 },

    /// Body is not the expected JSON shape.
    #[error("malformed response: {0}")]
    MalformedJson(String),

    /// A numeric-as-string field did not parse.
    #[error("invalid {field} value: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Errors surfaced by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Opening the cache failed. Cache faults during lookups never surface here.
    #[error("cache unavailable: {0}")]
    Store(#[from] StoreError),

    /// Rejected lookup input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::from(ProtocolError::InvalidNumber { field: "lat", value: "north".into() });
        assert_eq!(err.to_string(), r#"invalid lat value: "north""#);

        let err = ResolveError::from(ProtocolError::HttpStatus { status: 503 });
        assert!(err.to_string().contains("503"));

        let err = ResolveError::from(TransportError::Timeout);
        assert_eq!(err.to_string(), "request timeout");
    }

    #[test]
    fn test_store_error_wraps() {
        let err = ResolveError::from(StoreError::Schema("disk full".into()));
        assert!(matches!(err, ResolveError::Store(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
