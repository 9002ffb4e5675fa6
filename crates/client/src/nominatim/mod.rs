//! Nominatim geocoding API client.
//!
//! Provides a client for OpenStreetMap's Nominatim service with request
//! building and response normalization.
//!
//! ### Specification
//!
//! - **Endpoints**: `/search` (forward) and `/reverse` (reverse), `format=jsonv2`.
//! - **Identification**: every request carries the configured `User-Agent`;
//!   there is no default because the service refuses anonymous clients.
//! - **Rate Limiting**: not done here. Callers go through the resolver's
//!   [`RateGate`](crate::gate::RateGate).
//! - **Normalization**: converts Nominatim places into [`PlaceRecord`]s.

pub mod request;
pub mod response;

pub use request::{ReverseRequest, SearchRequest};
pub use response::{NominatimPlace, parse_reverse, parse_search};

use places_core::config::{DEFAULT_REVERSE_URL, DEFAULT_SEARCH_URL};
use places_core::{AppConfig, ConfigError, Coordinate, PlaceRecord};
use reqwest::header;
use serde::Serialize;
use std::time::{Duration, Instant};
use url::Url;

use crate::error::{ProtocolError, ResolveError, TransportError};
use crate::source::PlaceSource;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Nominatim client configuration.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// User-Agent identifying the calling application. Required.
    pub user_agent: String,
    /// Forward-search endpoint.
    pub search_url: String,
    /// Reverse-lookup endpoint.
    pub reverse_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// Request the address hierarchy (default: true).
    pub address_details: bool,
}

impl NominatimConfig {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            reverse_url: DEFAULT_REVERSE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            address_details: true,
        }
    }

    /// Build from application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            user_agent: config.require_user_agent()?.to_string(),
            search_url: config.search_url.clone(),
            reverse_url: config.reverse_url.clone(),
            timeout: config.timeout(),
            address_details: config.address_details,
        })
    }
}

/// Nominatim API client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    search_url: Url,
    reverse_url: Url,
    address_details: bool,
}

impl NominatimClient {
    /// Create a new client with the given configuration.
    pub fn new(config: NominatimConfig) -> Result<Self, ResolveError> {
        if config.user_agent.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "user_agent".into(),
                hint: "the geocoding service rejects anonymous clients".into(),
            }
            .into());
        }
        if header::HeaderValue::from_str(&config.user_agent).is_err() {
            return Err(ConfigError::Invalid {
                field: "user_agent".into(),
                reason: "contains characters not allowed in an HTTP header".into(),
            }
            .into());
        }

        let search_url = parse_endpoint(&config.search_url)?;
        let reverse_url = parse_endpoint(&config.reverse_url)?;

        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { http, search_url, reverse_url, address_details: config.address_details })
    }

    async fn get<Q: Serialize + ?Sized>(&self, url: &Url, query: &Q) -> Result<Vec<u8>, ResolveError> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(TransportError::from)?;

        let status = response.status();
        tracing::debug!(%status, url = %response.url(), "geocoding response");

        if !status.is_success() {
            return Err(ProtocolError::HttpStatus { status: status.as_u16() }.into());
        }

        let bytes = response.bytes().await.map_err(TransportError::from)?;

        tracing::debug!("geocoding request completed in {:?} ({} bytes)", start.elapsed(), bytes.len());

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl PlaceSource for NominatimClient {
    async fn search(&self, query: &str) -> Result<Vec<PlaceRecord>, ResolveError> {
        let req = SearchRequest::new(query, self.address_details);
        req.validate()?;

        tracing::debug!(query, "searching Nominatim");
        let body = self.get(&self.search_url, &req).await?;
        Ok(parse_search(&body)?)
    }

    async fn reverse(&self, coord: Coordinate) -> Result<Vec<PlaceRecord>, ResolveError> {
        let req = ReverseRequest::new(coord, self.address_details);

        tracing::debug!(%coord, "reverse lookup via Nominatim");
        let body = self.get(&self.reverse_url, &req).await?;
        Ok(parse_reverse(&body)?)
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, TransportError> {
    Url::parse(raw).map_err(|e| TransportError::Build(format!("invalid endpoint '{raw}': {e}")))
}
