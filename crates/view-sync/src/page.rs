//! Seams onto the host document, plus an in-memory document model.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use reqwest::Url;

use crate::error::{Result, ViewSyncError};

/// A region of the page whose content can be replaced wholesale.
///
/// This is the only place markup enters the page; the body of a partial
/// response is passed through untouched.
pub trait Region: Send + Sync {
    fn replace_content(&self, markup: &str);
}

/// Read access to the current page.
pub trait PageHost: Send + Sync {
    /// Locate a region by its stable identifier. `None` means the page does
    /// not show it, which is a normal outcome.
    fn find_region(&self, id: &str) -> Option<Arc<dyn Region>>;

    /// Current page address, including the query string.
    fn location(&self) -> Url;
}

/// In-memory region holding its markup as a string.
#[derive(Debug, Default)]
pub struct MemoryRegion {
    content: RwLock<String>,
    swaps: RwLock<usize>,
}

impl MemoryRegion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: RwLock::new(content.into()),
            swaps: RwLock::new(0),
        }
    }

    pub fn content(&self) -> String {
        self.content
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of times the content was replaced.
    pub fn swap_count(&self) -> usize {
        *self.swaps.read().unwrap_or_else(|e| e.into_inner())
    }
}

impl Region for MemoryRegion {
    fn replace_content(&self, markup: &str) {
        *self.content.write().unwrap_or_else(|e| e.into_inner()) = markup.to_string();
        *self.swaps.write().unwrap_or_else(|e| e.into_inner()) += 1;
    }
}

/// In-memory page: an address plus a set of regions keyed by identifier.
#[derive(Debug)]
pub struct MemoryPage {
    location: RwLock<Url>,
    regions: RwLock<HashMap<String, Arc<MemoryRegion>>>,
}

impl MemoryPage {
    pub fn new(location: &str) -> Result<Self> {
        Ok(Self {
            location: RwLock::new(parse_location(location)?),
            regions: RwLock::new(HashMap::new()),
        })
    }

    /// Add an empty region, or return the one already mounted under `id`.
    pub fn mount_region(&self, id: &str) -> Arc<MemoryRegion> {
        self.mount_region_with(id, "")
    }

    pub fn mount_region_with(&self, id: &str, content: &str) -> Arc<MemoryRegion> {
        self.regions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(MemoryRegion::new(content)))
            .clone()
    }

    pub fn unmount_region(&self, id: &str) -> Option<Arc<MemoryRegion>> {
        self.regions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
    }

    /// Change the page address, as a client-side filter change would.
    pub fn navigate(&self, location: &str) -> Result<()> {
        let url = parse_location(location)?;
        *self.location.write().unwrap_or_else(|e| e.into_inner()) = url;
        Ok(())
    }

    pub fn region(&self, id: &str) -> Option<Arc<MemoryRegion>> {
        self.regions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }
}

impl PageHost for MemoryPage {
    fn find_region(&self, id: &str) -> Option<Arc<dyn Region>> {
        self.region(id).map(|region| region as Arc<dyn Region>)
    }

    fn location(&self) -> Url {
        self.location
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn parse_location(location: &str) -> Result<Url> {
    Url::parse(location).map_err(|e| ViewSyncError::invalid_url(format!("{}: {}", location, e)))
}
