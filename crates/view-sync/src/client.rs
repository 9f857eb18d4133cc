//! The view sync client: push event -> presence check -> delay -> fetch -> swap.

use std::sync::Arc;

use log::{debug, error, warn};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::channel::RealtimeChannel;
use crate::config::ViewSyncConfig;
use crate::error::ViewSyncError;
use crate::fetcher::PartialFetcher;
use crate::page::PageHost;
use crate::policy::{BannerFlag, RefreshPolicy};
use crate::query::QueryContext;

/// Why a refresh cycle ended without touching the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page does not show the region
    AbsentRegion,
    /// The partial endpoint answered with a non-success status
    NonSuccessStatus(u16),
    /// The request failed at the transport level
    FetchFailed,
}

/// Terminal state of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Swapped,
    Skipped(SkipReason),
}

/// Handle on the listener task installed by [`ViewSyncClient::listen`].
///
/// Dropping the handle leaves the listener running.
#[derive(Debug)]
pub struct ListenerHandle {
    task: Option<JoinHandle<()>>,
}

impl ListenerHandle {
    fn inert() -> Self {
        Self { task: None }
    }

    /// Whether a listener is installed and its subscription is still open.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop listening. Cycles already started still run to completion.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Wait until the subscription ends.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

struct Inner {
    config: ViewSyncConfig,
    policy: RefreshPolicy,
    page: Arc<dyn PageHost>,
    fetcher: Arc<dyn PartialFetcher>,
    banner: BannerFlag,
}

/// Keeps one page region in sync with the server.
///
/// Every notification starts an independent refresh cycle. Cycles are never
/// coalesced or cancelled; when several race, the last swap to land wins.
#[derive(Clone)]
pub struct ViewSyncClient {
    inner: Arc<Inner>,
}

impl ViewSyncClient {
    pub fn new(
        config: ViewSyncConfig,
        page: Arc<dyn PageHost>,
        fetcher: Arc<dyn PartialFetcher>,
        banner: BannerFlag,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                policy: RefreshPolicy::new(config.banner_delay),
                config,
                page,
                fetcher,
                banner,
            }),
        }
    }

    pub fn config(&self) -> &ViewSyncConfig {
        &self.inner.config
    }

    /// Subscribe to the configured event and refresh on every occurrence.
    ///
    /// Without a channel, or when subscribing fails, the client stays inert:
    /// the failure is logged and an inactive handle is returned.
    pub async fn listen<C>(&self, channel: Option<&C>) -> ListenerHandle
    where
        C: RealtimeChannel + ?Sized,
    {
        let event_name = &self.inner.config.event_name;
        let Some(channel) = channel else {
            warn!("No realtime channel, live refresh disabled");
            return ListenerHandle::inert();
        };

        let mut subscription = match channel.subscribe(event_name).await {
            Ok(subscription) => subscription,
            Err(e) => {
                warn!("Live refresh disabled: {}", e);
                return ListenerHandle::inert();
            }
        };
        debug!("Listening for '{}' events", event_name);

        let client = self.clone();
        let task = tokio::spawn(async move {
            while subscription.next().await.is_some() {
                client.trigger();
            }
            debug!("Subscription for '{}' ended", client.inner.config.event_name);
        });

        ListenerHandle { task: Some(task) }
    }

    /// Start one refresh cycle in the background.
    pub fn trigger(&self) -> JoinHandle<CycleOutcome> {
        let client = self.clone();
        tokio::spawn(async move { client.refresh_cycle().await })
    }

    /// Run one refresh cycle to completion.
    ///
    /// Failures never escape: they end the cycle and leave the region as it was.
    pub async fn refresh_cycle(&self) -> CycleOutcome {
        let inner = &self.inner;
        let cycle_id = Uuid::new_v4();

        let Some(mut region) = inner.page.find_region(&inner.config.region_id) else {
            debug!(
                "[ViewSync {}] Region '{}' not on page, skipping",
                cycle_id, inner.config.region_id
            );
            return CycleOutcome::Skipped(SkipReason::AbsentRegion);
        };

        let delay = inner.policy.delay_for(inner.banner.is_active());
        if !delay.is_zero() {
            debug!("[ViewSync {}] Banner active, waiting {:?}", cycle_id, delay);
            tokio::time::sleep(delay).await;

            // The page may have moved on while we waited.
            region = match inner.page.find_region(&inner.config.region_id) {
                Some(region) => region,
                None => {
                    debug!(
                        "[ViewSync {}] Region '{}' left the page during delay, skipping",
                        cycle_id, inner.config.region_id
                    );
                    return CycleOutcome::Skipped(SkipReason::AbsentRegion);
                }
            };
        }

        // Read after the delay so the user's latest filters apply.
        let query = QueryContext::from_location(&inner.page.location());

        match inner.fetcher.fetch_partial(&query).await {
            Ok(markup) => {
                region.replace_content(&markup);
                debug!(
                    "[ViewSync {}] Region '{}' refreshed ({} bytes)",
                    cycle_id,
                    inner.config.region_id,
                    markup.len()
                );
                CycleOutcome::Swapped
            }
            Err(ViewSyncError::Status { status }) => {
                debug!("[ViewSync {}] Partial answered {}, skipping", cycle_id, status);
                CycleOutcome::Skipped(SkipReason::NonSuccessStatus(status))
            }
            Err(e) => {
                error!("[ViewSync {}] Refresh failed: {}", cycle_id, e);
                CycleOutcome::Skipped(SkipReason::FetchFailed)
            }
        }
    }
}
