//! Mock catalog implementation for testing
//!
//! Resolves to a preconfigured result, optionally after a delay, and counts
//! how often it was called. Used by integration tests to drive the state
//! store without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::{CatalogService, FetchResult};
use crate::error::FetchError;
use crate::types::{CitiesResponse, City};

/// Mock catalog for testing
#[derive(Debug, Clone)]
pub struct MockCatalog {
    result: FetchResult,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockCatalog {
    /// Create a mock that resolves to `result`
    pub fn new(result: FetchResult) -> Self {
        Self {
            result,
            delay: Duration::from_millis(0),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that serves `cities` with a `"success"` status
    pub fn success(cities: Vec<City>) -> Self {
        Self::new(Ok(CitiesResponse {
            status: CitiesResponse::SUCCESS.to_string(),
            message: None,
            cities: Some(cities),
        }))
    }

    /// Create a mock whose body reports an error status
    pub fn error_status(message: Option<&str>) -> Self {
        Self::new(Ok(CitiesResponse {
            status: "error".to_string(),
            message: message.map(str::to_string),
            cities: None,
        }))
    }

    /// Create a mock that fails at the transport level
    pub fn transport_failure(error: &str) -> Self {
        Self::new(Err(FetchError::Transport(error.to_string())))
    }

    /// Delay resolution (simulates network latency)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times the catalog has been fetched
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogService for MockCatalog {
    async fn list_cities(&self) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.result.clone()
    }
}
