//! Core data types for Cities

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A city as served by the catalog endpoint
///
/// Field names follow the wire format (`lat`, `lon`, `r`, `points`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Boundary radius in metres
    #[serde(rename = "r")]
    pub boundary_radius: i32,
    /// Comma-separated "lon lat" pairs describing the boundary polygon
    #[serde(rename = "points")]
    pub boundary_points: String,
}

impl City {
    /// The city's centre coordinate
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Parse the city's boundary polygon
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if `boundary_points` is malformed.
    pub fn boundary(&self) -> std::result::Result<Vec<GeoPoint>, ParseError> {
        crate::geo::parse_boundary(&self.boundary_points)
    }
}

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Body of `GET /cities`
///
/// `cities` is absent from error bodies. A success body without it is
/// malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cities: Option<Vec<City>>,
}

impl CitiesResponse {
    /// Status discriminator the backend uses for a successful listing
    pub const SUCCESS: &'static str = "success";

    pub fn is_success(&self) -> bool {
        self.status == Self::SUCCESS
    }

    /// Number of cities in the body, zero when the field is absent
    pub fn city_count(&self) -> usize {
        self.cities.as_ref().map_or(0, Vec::len)
    }
}
