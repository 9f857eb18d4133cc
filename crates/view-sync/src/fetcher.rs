//! Fetching the rendered partial from the server.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderValue, CACHE_CONTROL, PRAGMA};
use reqwest::Url;

use crate::config::ViewSyncConfig;
use crate::error::{Result, ViewSyncError};
use crate::query::QueryContext;

/// Source of rendered partial markup.
#[async_trait]
pub trait PartialFetcher: Send + Sync {
    /// Fetch the partial for the given page context.
    ///
    /// Returns the response body verbatim on success. A non-success status is
    /// reported as [`ViewSyncError::Status`].
    async fn fetch_partial(&self, query: &QueryContext) -> Result<String>;
}

/// Partial fetcher backed by the server's partial-render endpoint.
///
/// Every request bypasses HTTP caches. No timeout is set here; inject a
/// configured client with [`HttpPartialFetcher::with_client`] if one is wanted.
#[derive(Debug, Clone)]
pub struct HttpPartialFetcher {
    client: reqwest::Client,
    partial_url: String,
}

impl HttpPartialFetcher {
    pub fn new(config: &ViewSyncConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &ViewSyncConfig) -> Self {
        Self {
            client,
            partial_url: config.partial_url(),
        }
    }

    /// URL of the partial for the given context: the query is appended as is.
    pub fn partial_url(&self, query: &QueryContext) -> Result<Url> {
        let raw = if query.is_empty() {
            self.partial_url.clone()
        } else {
            format!("{}?{}", self.partial_url, query.as_str())
        };
        Url::parse(&raw).map_err(|e| ViewSyncError::invalid_url(format!("{}: {}", raw, e)))
    }

    /// Build the exact request a refresh would send.
    pub fn build_request(&self, query: &QueryContext) -> Result<reqwest::Request> {
        let request = self
            .client
            .get(self.partial_url(query)?)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store, no-cache"))
            .header(PRAGMA, HeaderValue::from_static("no-cache"))
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl PartialFetcher for HttpPartialFetcher {
    async fn fetch_partial(&self, query: &QueryContext) -> Result<String> {
        let request = self.build_request(query)?;
        debug!("Fetching partial: {}", request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ViewSyncError::status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
