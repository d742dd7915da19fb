//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State`, with no side effects. Each action replaces
//! exactly one field and carries the other over untouched.

use super::actions::Action;
use super::state::{AppState, CitiesState, GpsState};
use crate::catalog::FetchResult;

/// Message shown when the backend gives no usable reason for a failure
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Pure reducer function
///
/// Takes current state and an action, returns new state.
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::PermissionChanged(status) => AppState {
            gps: GpsState::from(status),
            ..state
        },

        Action::CatalogFetched(result) => AppState {
            cities: cities_from_fetch(result),
            ..state
        },
    }
}

/// Classify a resolved fetch
///
/// Only a decoded body with status `"success"` and a `cities` array loads
/// the cities, in server order. An error body contributes its message when
/// it has one; every other failure collapses to [`UNKNOWN_ERROR`].
pub fn cities_from_fetch(result: FetchResult) -> CitiesState {
    match result {
        Ok(body) if body.is_success() => match body.cities {
            Some(cities) => CitiesState::Success { cities },
            None => CitiesState::Failed {
                message: UNKNOWN_ERROR.to_string(),
            },
        },
        Ok(body) => CitiesState::Failed {
            message: body.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        },
        Err(_) => CitiesState::Failed {
            message: UNKNOWN_ERROR.to_string(),
        },
    }
}
