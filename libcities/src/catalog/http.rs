//! HTTP catalog client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::{CatalogService, FetchResult};
use crate::config::BackendConfig;
use crate::error::{FetchError, Result};
use crate::types::CitiesResponse;

/// Catalog served over HTTP at `{base_url}/cities`
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    endpoint: String,
}

impl HttpCatalog {
    /// Build a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (for example when no TLS backend is available).
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: cities_endpoint(&config.base_url),
        })
    }

    /// Full URL of the listing endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn cities_endpoint(base_url: &str) -> String {
    format!("{}/cities", base_url.trim_end_matches('/'))
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn list_cities(&self) -> FetchResult {
        info!(endpoint = %self.endpoint, "Fetching city catalog");

        let response = self.client.get(&self.endpoint).send().await.map_err(|e| {
            warn!(error = %e, "City catalog request failed");
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "City catalog returned an error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.json::<CitiesResponse>().await.map_err(|e| {
            warn!(error = %e, "City catalog body could not be decoded");
            FetchError::Decode(e.to_string())
        })?;

        debug!(status = %body.status, cities = body.city_count(), "City catalog received");
        Ok(body)
    }
}
