//! Filter/sort context taken from the current page address.

use reqwest::Url;

/// The query string of the page address at the moment a refresh runs.
///
/// Kept as the raw string so it reaches the partial endpoint exactly as the
/// page had it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    raw: String,
}

impl QueryContext {
    pub fn from_location(location: &Url) -> Self {
        Self {
            raw: location.query().unwrap_or_default().to_string(),
        }
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            raw: raw.strip_prefix('?').map(str::to_string).unwrap_or(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Decoded key/value pairs, in page order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        reqwest::Url::parse(&format!("http://localhost/?{}", self.raw))
            .map(|url| {
                url.query_pairs()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
