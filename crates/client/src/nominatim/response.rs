//! Nominatim response types and normalization.
//!
//! Parsing is strict: if any element of a search array has a bad `lat` or
//! `lon`, the whole batch is rejected and nothing from it is returned.

use places_core::{Address, Coordinate, PlaceDetails, PlaceRecord, PlaceType};
use serde::Deserialize;

use crate::error::ProtocolError;

/// One place as returned by the service.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: NumericField,
    pub lon: NumericField,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub addresstype: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Coordinates arrive as strings, but tolerate plain JSON numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Text(String),
    Number(f64),
}

/// Reverse lookups answer with either a place or an error object when
/// nothing is near the coordinate.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseBody {
    Place(NominatimPlace),
    NotFound { error: serde_json::Value },
}

impl NumericField {
    fn parse(&self, field: &'static str) -> Result<f64, ProtocolError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ProtocolError::InvalidNumber { field, value: s.clone() })?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ProtocolError::InvalidNumber { field, value: value.to_string() })
        }
    }
}

impl TryFrom<NominatimPlace> for PlaceRecord {
    type Error = ProtocolError;

    fn try_from(raw: NominatimPlace) -> Result<Self, Self::Error> {
        let lat = raw.lat.parse("lat")?;
        let lon = raw.lon.parse("lon")?;
        let coordinate =
            Coordinate::new(lat, lon).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

        let details = PlaceDetails {
            place_type: raw.addresstype.as_deref().map(PlaceType::from_tag),
            address: raw.address.filter(|a| !a.is_empty()),
        };

        Ok(PlaceRecord::new(coordinate, raw.display_name).with_details(details))
    }
}

/// Parse a forward-search body (JSON array).
pub fn parse_search(body: &[u8]) -> Result<Vec<PlaceRecord>, ProtocolError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_slice(body).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;
    places.into_iter().map(PlaceRecord::try_from).collect()
}

/// Parse a reverse-lookup body (single JSON object).
///
/// The service's `{"error": ...}` answer becomes an empty result.
pub fn parse_reverse(body: &[u8]) -> Result<Vec<PlaceRecord>, ProtocolError> {
    let parsed: ReverseBody =
        serde_json::from_slice(body).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;
    match parsed {
        ReverseBody::Place(place) => Ok(vec![PlaceRecord::try_from(place)?]),
        ReverseBody::NotFound { error } => {
            tracing::debug!(%error, "reverse lookup found nothing");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_FIXTURE: &str = r#"[
        {
            "place_id": 123,
            "lat": "52.4095",
            "lon": "16.9181",
            "display_name": "Zamek Cesarski, Święty Marcin, Poznań, Polska",
            "addresstype": "building",
            "address": {
                "suburb": "Centrum",
                "city": "Poznań",
                "county": "Poznań",
                "state": "województwo wielkopolskie",
                "country": "Polska",
                "country_code": "pl"
            }
        },
        {
            "lat": "52.4082",
            "lon": "16.9335",
            "display_name": "Poznań",
            "addresstype": "city"
        }
    ]"#;

    const REVERSE_FIXTURE: &str = r#"{
        "lat": "21.3701",
        "lon": "69.4199",
        "display_name": "Arabian Sea",
        "addresstype": "sea",
        "address": {}
    }"#;

    #[test]
    fn test_parse_search() {
        let records = parse_search(SEARCH_FIXTURE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let castle = &records[0];
        assert_eq!(castle.coordinate(), Coordinate::new(52.4095, 16.9181).unwrap());
        assert_eq!(castle.place_type(), Some(PlaceType::Other));
        let address = castle.address().unwrap();
        assert_eq!(address.city, "Poznań");
        assert_eq!(address.country, "Polska");
        assert!(address.village.is_empty());

        let city = &records[1];
        assert_eq!(city.display_name(), "Poznań");
        assert_eq!(city.place_type(), Some(PlaceType::City));
        assert!(city.address().is_none());
    }

    #[test]
    fn test_parse_empty_search() {
        assert!(parse_search(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_bad_lat_aborts_batch() {
        let body = r#"[
            {"lat": "1.0", "lon": "2.0", "display_name": "ok"},
            {"lat": "north", "lon": "2.0", "display_name": "bad"}
        ]"#;
        let result = parse_search(body.as_bytes());
        assert!(matches!(result, Err(ProtocolError::InvalidNumber { field: "lat", .. })));
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        let body = r#"[{"lat": "NaN", "lon": "2.0", "display_name": "nan"}]"#;
        assert!(matches!(parse_search(body.as_bytes()), Err(ProtocolError::InvalidNumber { .. })));
    }

    #[test]
    fn test_parse_accepts_numeric_json() {
        let body = r#"[{"lat": 10.5, "lon": -3.25, "display_name": "numbers"}]"#;
        let records = parse_search(body.as_bytes()).unwrap();
        assert_eq!(records[0].coordinate(), Coordinate::new(10.5, -3.25).unwrap());
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(parse_search(b"<html>"), Err(ProtocolError::MalformedJson(_))));
        assert!(matches!(parse_search(br#"{"lat": "1"}"#), Err(ProtocolError::MalformedJson(_))));
    }

    #[test]
    fn test_parse_reverse() {
        let records = parse_reverse(REVERSE_FIXTURE.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name(), "Arabian Sea");
        assert!(records[0].address().is_none());
    }

    #[test]
    fn test_parse_reverse_not_found() {
        let records = parse_reverse(br#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_reverse_bad_lon() {
        let body = r#"{"lat": "1.0", "lon": "", "display_name": "x"}"#;
        assert!(matches!(parse_reverse(body.as_bytes()), Err(ProtocolError::InvalidNumber { field: "lon", .. })));
    }
}
