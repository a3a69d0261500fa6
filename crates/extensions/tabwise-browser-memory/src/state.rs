//! Serialisable browser state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tabwise_protocols::error::StoreError;
use tabwise_protocols::types::{BookmarkNode, BrowserTab, HistoryItem};

/// Tabs, bookmark tree and history as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowserState {
    #[serde(default)]
    pub tabs: Vec<BrowserTab>,
    #[serde(default)]
    pub bookmarks: Vec<BookmarkNode>,
    #[serde(default)]
    pub history: Vec<HistoryItem>,
}

impl BrowserState {
    /// Read state from `path`; a missing file yields an empty browser.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!("No browser state at {:?}, starting empty", path);
            return Ok(Self::default());
        }
        let json = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        debug!("Saved browser state to {:?}", path);
        Ok(())
    }

    /// Highest numeric bookmark id in the tree.
    pub(crate) fn max_bookmark_id(&self) -> u64 {
        fn walk(nodes: &[BookmarkNode], max: &mut u64) {
            for node in nodes {
                if let Ok(id) = node.id.parse::<u64>() {
                    *max = (*max).max(id);
                }
                walk(&node.children, max);
            }
        }
        let mut max = 0;
        walk(&self.bookmarks, &mut max);
        max
    }
}
