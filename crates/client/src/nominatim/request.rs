//! Nominatim request parameters.

use places_core::Coordinate;
use serde::Serialize;

use crate::error::ResolveError;

/// Response format requested from the service.
const FORMAT: &str = "jsonv2";

/// Forward search: free-form query to places.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub q: &'a str,
    pub format: &'static str,
    /// `1` to include the address hierarchy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addressdetails: Option<u8>,
}

/// Reverse lookup: coordinate to the nearest place.
#[derive(Debug, Clone, Serialize)]
pub struct ReverseRequest {
    pub lat: f64,
    pub lon: f64,
    pub format: &'static str,
    /// `1` to include the address hierarchy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addressdetails: Option<u8>,
}

impl<'a> SearchRequest<'a> {
    pub fn new(q: &'a str, address_details: bool) -> Self {
        Self { q, format: FORMAT, addressdetails: address_details.then_some(1) }
    }

    /// Reject queries the service would answer with nothing useful.
    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.q.trim().is_empty() {
            return Err(ResolveError::InvalidInput("query cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl ReverseRequest {
    pub fn new(coord: Coordinate, address_details: bool) -> Self {
        Self { lat: coord.lat(), lon: coord.lon(), format: FORMAT, addressdetails: address_details.then_some(1) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of<T: Serialize>(req: &T) -> String {
        let built = reqwest::Client::new()
            .get("https://nominatim.example/search")
            .query(req)
            .build()
            .unwrap();
        built.url().query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_search_query_string() {
        let req = SearchRequest::new("Poznań zamek", false);
        assert_eq!(query_of(&req), "q=Pozna%C5%84+zamek&format=jsonv2");
    }

    #[test]
    fn test_search_with_address_details() {
        let req = SearchRequest::new("Berlin", true);
        assert_eq!(query_of(&req), "q=Berlin&format=jsonv2&addressdetails=1");
    }

    #[test]
    fn test_reverse_query_string() {
        let req = ReverseRequest::new(Coordinate::new(21.37, 69.42).unwrap(), false);
        assert_eq!(query_of(&req), "lat=21.37&lon=69.42&format=jsonv2");
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(matches!(SearchRequest::new("  ", true).validate(), Err(ResolveError::InvalidInput(_))));
        assert!(SearchRequest::new("Oslo", true).validate().is_ok());
    }
}
