//! Configuration for a view sync client.

use std::time::Duration;

/// Server origin used when none is given.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// Path of the partial-render endpoint for the orders table.
pub const DEFAULT_PARTIAL_PATH: &str = "/_partial/orders_table";
/// Identifier of the refreshable region (the orders table body).
pub const DEFAULT_REGION_ID: &str = "orders-body";
/// Push event emitted by the server whenever orders change.
pub const DEFAULT_EVENT_NAME: &str = "order_update";
/// Delay applied while a flash banner may still be on screen.
pub const DEFAULT_BANNER_DELAY: Duration = Duration::from_millis(3800);

/// Everything a [`crate::ViewSyncClient`] needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSyncConfig {
    /// Origin of the server (e.g., "http://127.0.0.1:5000"), without trailing slash
    pub base_url: String,
    /// Path of the partial endpoint, starting with '/'
    pub partial_path: String,
    /// Stable identifier of the region to keep in sync
    pub region_id: String,
    /// Name of the push event that triggers a refresh
    pub event_name: String,
    /// Delay before refreshing while a banner is active
    pub banner_delay: Duration,
}

impl ViewSyncConfig {
    /// Create a configuration for the given server with default constants.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_partial_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.partial_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    pub fn with_region_id(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = region_id.into();
        self
    }

    pub fn with_event_name(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = event_name.into();
        self
    }

    pub fn with_banner_delay(mut self, delay: Duration) -> Self {
        self.banner_delay = delay;
        self
    }

    /// Full URL of the partial endpoint, without query string.
    pub fn partial_url(&self) -> String {
        format!("{}{}", self.base_url, self.partial_path)
    }
}

impl Default for ViewSyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            partial_path: DEFAULT_PARTIAL_PATH.to_string(),
            region_id: DEFAULT_REGION_ID.to_string(),
            event_name: DEFAULT_EVENT_NAME.to_string(),
            banner_delay: DEFAULT_BANNER_DELAY,
        }
    }
}
