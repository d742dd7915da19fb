//! Display rows for the city list
//!
//! With a known user position each row is labelled with its rounded distance
//! in metres and rows are nearest first. Without one, rows keep server order
//! and show raw coordinates instead.

use serde::Serialize;

use crate::geo::rank_by_distance;
use crate::types::{City, GeoPoint};

/// One entry of the city list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityRow {
    #[serde(flatten)]
    pub city: City,
    /// Metres from the user, when a position is known
    pub distance_m: Option<f64>,
    pub label: String,
}

impl CityRow {
    fn new(city: City, distance_m: Option<f64>) -> Self {
        let label = match distance_m {
            Some(metres) => format!("{}m", metres.round() as i64),
            None => format!("Lat: {:?} Lon: {:?}", city.latitude, city.longitude),
        };

        Self {
            city,
            distance_m,
            label,
        }
    }
}

/// Build the list rows for `cities` as seen from `user_location`
pub fn build_listing(cities: &[City], user_location: Option<GeoPoint>) -> Vec<CityRow> {
    match user_location {
        Some(origin) => rank_by_distance(cities, origin)
            .into_iter()
            .map(|(metres, city)| CityRow::new(city.clone(), Some(metres)))
            .collect(),
        None => cities.iter().cloned().map(|city| CityRow::new(city, None)).collect(),
    }
}
