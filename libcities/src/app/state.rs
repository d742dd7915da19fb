//! Application state
//!
//! Immutable snapshot types. Every update produces a new `AppState`; see
//! `reducer.rs` for the transitions.

use crate::location::{PermissionRationale, PermissionStatus};
use crate::types::City;

/// Root application state
///
/// The two fields are driven by independent sources and never affect each
/// other.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub cities: CitiesState,
    pub gps: GpsState,
}

/// Progress of the one-shot catalog fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CitiesState {
    #[default]
    Loading,
    Failed {
        message: String,
    },
    Success {
        cities: Vec<City>,
    },
}

/// Location permission as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsState {
    #[default]
    Loading,
    Revoked {
        requires_rationale: bool,
    },
    Granted,
}

impl From<PermissionStatus> for GpsState {
    fn from(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Granted => GpsState::Granted,
            PermissionStatus::Revoked { rationale } => GpsState::Revoked {
                requires_rationale: rationale == PermissionRationale::Required,
            },
        }
    }
}

impl AppState {
    /// Create new application state with both sources still loading
    pub fn new() -> Self {
        Self::default()
    }

    /// Cities, once the catalog has loaded
    pub fn loaded_cities(&self) -> Option<&[City]> {
        match &self.cities {
            CitiesState::Success { cities } => Some(cities),
            CitiesState::Loading | CitiesState::Failed { .. } => None,
        }
    }

    /// Has neither source settled yet?
    pub fn is_loading(&self) -> bool {
        self.cities == CitiesState::Loading || self.gps == GpsState::Loading
    }
}
