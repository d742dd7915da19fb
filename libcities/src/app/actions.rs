//! Actions for the reducer pattern
//!
//! Each external source feeds the store through exactly one action variant.

use crate::catalog::FetchResult;
use crate::location::PermissionStatus;

/// Actions that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The host reported a new location permission status
    PermissionChanged(PermissionStatus),

    /// The catalog fetch resolved (successfully or not)
    CatalogFetched(FetchResult),
}
