//! Cities - nearby city catalog client core
//!
//! This library merges a location-permission signal and a one-shot city
//! catalog fetch into a single application state, and provides the pure
//! geographic helpers (distance sort, boundary parsing) the front ends need.

pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod listing;
pub mod location;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use app::{reduce, Action, AppState, CitiesState, GpsState, StateStore};
pub use catalog::{CatalogService, FetchResult};
pub use config::Config;
pub use error::{CitiesError, FetchError, ParseError, Result};
pub use geo::{parse_boundary, sort_by_distance, Bounds};
pub use location::{PermissionRationale, PermissionStatus};
pub use types::{CitiesResponse, City, GeoPoint};
