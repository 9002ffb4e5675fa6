//! Place domain types.
//!
//! A [`PlaceRecord`] is the normalized form of one geocoding result. Records
//! are produced by parsing remote responses and by reading cached rows back
//! out of the store; nothing mutates them afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejected coordinate input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude must be finite, got {0}")]
    Latitude(f64),

    #[error("longitude must be finite, got {0}")]
    Longitude(f64),
}

/// A latitude/longitude pair in degrees.
///
/// Both components are finite. Equality is exact; two coordinates that differ
/// in the last bit are different cache keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lon.is_finite() {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Classification of a resolved place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Neighbourhood,
    Suburb,
    Village,
    Town,
    City,
    Municipality,
    County,
    State,
    Country,
    #[serde(other)]
    Other,
}

impl PlaceType {
    /// Map a remote `addresstype` tag to a classification.
    ///
    /// Tags outside the fixed set (roads, buildings, amenities...) become `Other`.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "neighbourhood" | "neighborhood" => Self::Neighbourhood,
            "suburb" => Self::Suburb,
            "village" => Self::Village,
            "town" => Self::Town,
            "city" => Self::City,
            "municipality" => Self::Municipality,
            "county" => Self::County,
            "state" => Self::State,
            "country" => Self::Country,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neighbourhood => "neighbourhood",
            Self::Suburb => "suburb",
            Self::Village => "village",
            Self::Town => "town",
            Self::City => "city",
            Self::Municipality => "municipality",
            Self::County => "county",
            Self::State => "state",
            Self::Country => "country",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hierarchical address components. Any of them may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub neighbourhood: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub village: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.neighbourhood,
            &self.suburb,
            &self.city,
            &self.town,
            &self.village,
            &self.municipality,
            &self.county,
            &self.state,
            &self.country,
        ]
        .iter()
        .all(|part| part.is_empty())
    }
}

/// The structured part of a record: classification plus address hierarchy.
///
/// This is what the document storage layout serializes into `details_json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_type: Option<PlaceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl PlaceDetails {
    pub fn is_empty(&self) -> bool {
        self.place_type.is_none() && self.address.is_none()
    }
}

/// A resolved place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceRecord {
    coordinate: Coordinate,
    display_name: String,
    #[serde(flatten)]
    details: PlaceDetails,
}

impl PlaceRecord {
    pub fn new(coordinate: Coordinate, display_name: impl Into<String>) -> Self {
        Self { coordinate, display_name: display_name.into(), details: PlaceDetails::default() }
    }

    pub fn with_details(mut self, details: PlaceDetails) -> Self {
        self.details = details;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn place_type(&self) -> Option<PlaceType> {
        self.details.place_type
    }

    pub fn address(&self) -> Option<&Address> {
        self.details.address.as_ref()
    }

    pub fn details(&self) -> &PlaceDetails {
        &self.details
    }
}

/// Key used to index cache entries and build remote queries.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupKey {
    Name(String),
    Coordinate(Coordinate),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "name:{name}"),
            Self::Coordinate(coord) => write!(f, "coord:{coord}"),
        }
    }
}
