//! Orderdesk View Sync - live refresh of a server-rendered page region.
//!
//! A [`ViewSyncClient`] listens for a zero-payload "data changed" push event and,
//! for every occurrence, re-fetches a rendered partial and swaps it into one
//! region of the current page. The user's filter/sort context is read from the
//! page address at refresh time and forwarded to the server untouched.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orderdesk_view_sync::{
//!     BannerFlag, HttpPartialFetcher, MemoryPage, SseChannel, ViewSyncClient, ViewSyncConfig,
//! };
//!
//! let config = ViewSyncConfig::new("http://127.0.0.1:5000");
//! let page = Arc::new(MemoryPage::new("http://127.0.0.1:5000/?status=open")?);
//! page.mount_region(&config.region_id);
//!
//! let fetcher = Arc::new(HttpPartialFetcher::new(&config));
//! let client = ViewSyncClient::new(config.clone(), page, fetcher, BannerFlag::default());
//!
//! let channel = SseChannel::new(&config.base_url);
//! let handle = client.listen(Some(&channel)).await;
//! ```

mod channel;
mod client;
mod config;
mod error;
mod fetcher;
mod page;
mod policy;
mod query;
mod sse;

pub use channel::{
    EventBus, Notification, RealtimeChannel, ServerEvent, SseChannel, Subscription,
    EVENTS_STREAM_PATH,
};
pub use client::{CycleOutcome, ListenerHandle, SkipReason, ViewSyncClient};
pub use config::{
    ViewSyncConfig, DEFAULT_BANNER_DELAY, DEFAULT_BASE_URL, DEFAULT_EVENT_NAME,
    DEFAULT_PARTIAL_PATH, DEFAULT_REGION_ID,
};
pub use error::{Result, ViewSyncError};
pub use fetcher::{HttpPartialFetcher, PartialFetcher};
pub use page::{MemoryPage, MemoryRegion, PageHost, Region};
pub use policy::{BannerFlag, RefreshPolicy};
pub use query::QueryContext;
pub use sse::{SseDecoder, SseFrame, MAX_LINE_LEN};

pub use reqwest::Url;
