//! City catalog access
//!
//! The catalog is fetched once per session. Implementations resolve to the
//! raw wire body or a [`FetchError`]; deciding what that means for the UI is
//! the reducer's job (see `app::reducer`).
//!
//! # Examples
//!
//! ```no_run
//! use libcities::catalog::{CatalogService, http::HttpCatalog};
//! use libcities::config::BackendConfig;
//!
//! # async fn example() -> libcities::Result<()> {
//! let catalog = HttpCatalog::new(&BackendConfig::default())?;
//!
//! match catalog.list_cities().await {
//!     Ok(body) if body.is_success() => println!("{} cities", body.city_count()),
//!     Ok(body) => println!("backend said {}", body.status),
//!     Err(e) => println!("fetch failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::CitiesResponse;

pub mod http;

// Mock catalog is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Outcome of a single catalog call
pub type FetchResult = std::result::Result<CitiesResponse, FetchError>;

/// Backend serving the city catalog
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the city list
    ///
    /// A body whose status is not `"success"` is still `Ok`; only transport
    /// failures, non-2xx responses and undecodable bodies are `Err`.
    async fn list_cities(&self) -> FetchResult;
}
