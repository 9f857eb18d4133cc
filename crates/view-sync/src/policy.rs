//! Delay policy applied before each refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag telling whether a transient banner may currently be visible.
///
/// Owned by whoever renders banners; the client only reads it, once per cycle.
#[derive(Debug, Clone, Default)]
pub struct BannerFlag(Arc<AtomicBool>);

impl BannerFlag {
    pub fn new(active: bool) -> Self {
        Self(Arc::new(AtomicBool::new(active)))
    }

    pub fn set_active(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Chooses between refreshing immediately and waiting out a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    banner_delay: Duration,
}

impl RefreshPolicy {
    pub fn new(banner_delay: Duration) -> Self {
        Self { banner_delay }
    }

    pub fn delay_for(&self, banner_active: bool) -> Duration {
        if banner_active {
            self.banner_delay
        } else {
            Duration::ZERO
        }
    }
}
