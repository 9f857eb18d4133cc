use std::{path::PathBuf, time::Duration};

use orderdesk_view_sync::{ViewSyncConfig, DEFAULT_BASE_URL, DEFAULT_EVENT_NAME};

pub struct Config {
    pub server_url: String,
    pub page_url: String,
    pub output: PathBuf,
    pub event_name: String,
    pub banner_delay: Duration,
    pub banner_active: bool,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let server_url = var("OD_SERVER_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let page_url = var("OD_PAGE_URL").unwrap_or_else(|| format!("{}/", server_url));
        let output = var("OD_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("orders-body.html"));
        let event_name = var("OD_EVENT").unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string());
        let delay_ms: u64 = var("OD_BANNER_DELAY_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3800);
        let banner_active = var("OD_BANNER_ACTIVE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        let timeout_ms: u64 = var("OD_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);
        Self {
            server_url,
            page_url,
            output,
            event_name,
            banner_delay: Duration::from_millis(delay_ms),
            banner_active,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn view_sync(&self) -> ViewSyncConfig {
        ViewSyncConfig::new(&self.server_url)
            .with_event_name(self.event_name.clone())
            .with_banner_delay(self.banner_delay)
    }
}
