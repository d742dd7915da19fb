//! Application state module
//!
//! - Actions: what can happen (a permission change, the catalog fetch resolving)
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State
//! - Store: the single owner that applies actions in order and publishes
//!   each new snapshot

pub mod actions;
pub mod reducer;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use actions::Action;
pub use reducer::{reduce, UNKNOWN_ERROR};
pub use state::{AppState, CitiesState, GpsState};
pub use store::{StateStore, StateStream};
