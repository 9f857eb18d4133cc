//! The agent's "page": a fixed address and one region mirrored to a file.

use std::path::PathBuf;
use std::sync::Arc;

use orderdesk_view_sync::{PageHost, Region, Result, Url, ViewSyncError};

/// Region whose content lives in a file on disk.
pub struct FileRegion {
    path: PathBuf,
}

impl FileRegion {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Region for FileRegion {
    fn replace_content(&self, markup: &str) {
        match std::fs::write(&self.path, markup) {
            Ok(()) => tracing::info!(
                "Region written to {} ({} bytes)",
                self.path.display(),
                markup.len()
            ),
            Err(e) => tracing::error!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}

/// Page showing the orders table at a fixed address.
pub struct AgentPage {
    location: Url,
    region_id: String,
    region: Arc<FileRegion>,
}

impl AgentPage {
    pub fn new(location: &str, region_id: &str, output: PathBuf) -> Result<Self> {
        let location = Url::parse(location)
            .map_err(|e| ViewSyncError::invalid_url(format!("{}: {}", location, e)))?;
        Ok(Self {
            location,
            region_id: region_id.to_string(),
            region: Arc::new(FileRegion::new(output)),
        })
    }
}

impl PageHost for AgentPage {
    fn find_region(&self, id: &str) -> Option<Arc<dyn Region>> {
        if id == self.region_id {
            Some(self.region.clone())
        } else {
            None
        }
    }

    fn location(&self) -> Url {
        self.location.clone()
    }
}
