//! Point-in-time view of the open tabs and bookmarks.

use tracing::debug;
use url::Url;

use tabwise_protocols::browser::BrowserPorts;
use tabwise_protocols::error::BrowserError;
use tabwise_protocols::types::{BookmarkRecord, BookmarkSummary, BrowserTab, TabSnapshot};

use crate::bookmarks::flatten_bookmarks;

/// URL prefixes of browser-internal and extension pages.
const INTERNAL_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "edge://",
    "brave://",
    "opera://",
    "vivaldi://",
    "about:",
    "moz-extension://",
];

/// Empty URLs count as internal: there is nothing to act on.
pub fn is_internal_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || INTERNAL_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Host of `url` without a leading `www.`; empty when unparseable.
pub fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

/// Filter and index raw tabs, preserving enumeration order.
pub fn snapshot_from(tabs: &[BrowserTab]) -> Vec<TabSnapshot> {
    tabs.iter()
        .filter(|tab| !is_internal_url(tab.url.as_deref().unwrap_or_default()))
        .enumerate()
        .map(|(index, tab)| {
            let url = tab.url.clone().unwrap_or_default();
            TabSnapshot {
                index,
                id: tab.id,
                title: tab.title.clone().unwrap_or_default(),
                domain: extract_domain(&url),
                url,
                active: tab.active,
                pinned: tab.pinned,
            }
        })
        .collect()
}

/// Reads browser state through the injected ports. Nothing is cached:
/// every call enumerates afresh.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    ports: BrowserPorts,
}

impl SnapshotProvider {
    pub fn new(ports: BrowserPorts) -> Self {
        Self { ports }
    }

    pub async fn snapshot_tabs(&self) -> Result<Vec<TabSnapshot>, BrowserError> {
        let tabs = self.ports.tabs.query_tabs().await?;
        let snapshot = snapshot_from(&tabs);
        debug!("Snapshot: {} of {} tabs eligible", snapshot.len(), tabs.len());
        Ok(snapshot)
    }

    /// Every URL-bearing bookmark in the tree.
    pub async fn bookmarks(&self) -> Result<Vec<BookmarkRecord>, BrowserError> {
        let tree = self.ports.bookmarks.bookmark_tree().await?;
        Ok(flatten_bookmarks(&tree))
    }

    pub async fn snapshot_bookmark_summary(&self) -> Result<BookmarkSummary, BrowserError> {
        Ok(BookmarkSummary {
            count: self.bookmarks().await?.len(),
        })
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
