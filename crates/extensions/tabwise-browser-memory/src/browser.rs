//! Port implementations over a locked [`BrowserState`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use tabwise_protocols::browser::{BookmarkProvider, HistoryProvider, TabProvider};
use tabwise_protocols::error::BrowserError;
use tabwise_protocols::types::{BookmarkNode, BrowserTab, HistoryItem, HistoryQuery, NewBookmark, TabId};

use crate::state::BrowserState;

/// Browser living entirely in process memory.
pub struct MemoryBrowser {
    state: RwLock<BrowserState>,
    next_bookmark_id: AtomicU64,
}

impl MemoryBrowser {
    pub fn new(state: BrowserState) -> Self {
        let next = state.max_bookmark_id() + 1;
        Self {
            state: RwLock::new(state),
            next_bookmark_id: AtomicU64::new(next),
        }
    }

    /// Copy of the current state, e.g. for writing back to disk.
    pub fn state(&self) -> BrowserState {
        self.state.read().clone()
    }

    pub fn tab_count(&self) -> usize {
        self.state.read().tabs.len()
    }

    fn allocate_id(&self) -> String {
        self.next_bookmark_id.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Default for MemoryBrowser {
    fn default() -> Self {
        Self::new(BrowserState::default())
    }
}

fn find_folder_mut<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return node.is_folder().then_some(node);
        }
        if let Some(found) = find_folder_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

fn remove_node(nodes: &mut Vec<BookmarkNode>, id: &str) -> Result<bool, BrowserError> {
    if let Some(pos) = nodes.iter().position(|n| n.id == id) {
        if !nodes[pos].children.is_empty() {
            return Err(BrowserError::OperationFailed(format!(
                "bookmark folder {id} is not empty"
            )));
        }
        nodes.remove(pos);
        return Ok(true);
    }
    for node in nodes.iter_mut() {
        if remove_node(&mut node.children, id)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn collect_matches(nodes: &[BookmarkNode], needle: &str, out: &mut Vec<BookmarkNode>) {
    for node in nodes {
        if let Some(url) = &node.url {
            if node.title.to_lowercase().contains(needle) || url.to_lowercase().contains(needle) {
                let mut hit = node.clone();
                hit.children.clear();
                out.push(hit);
            }
        }
        collect_matches(&node.children, needle, out);
    }
}

#[async_trait]
impl TabProvider for MemoryBrowser {
    async fn query_tabs(&self) -> Result<Vec<BrowserTab>, BrowserError> {
        Ok(self.state.read().tabs.clone())
    }

    async fn remove_tab(&self, id: TabId) -> Result<(), BrowserError> {
        let mut state = self.state.write();
        let pos = state
            .tabs
            .iter()
            .position(|t| t.id == id)
            .ok_or(BrowserError::TabNotFound(id))?;
        state.tabs.remove(pos);
        debug!("Removed tab {}", id);
        Ok(())
    }
}

#[async_trait]
impl BookmarkProvider for MemoryBrowser {
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, BrowserError> {
        Ok(self.state.read().bookmarks.clone())
    }

    async fn create_bookmark(&self, bookmark: NewBookmark) -> Result<BookmarkNode, BrowserError> {
        let node = BookmarkNode {
            id: self.allocate_id(),
            parent_id: bookmark.parent_id.clone(),
            title: bookmark.title,
            url: bookmark.url,
            date_added: Some(Utc::now()),
            children: Vec::new(),
        };

        let mut state = self.state.write();
        match &bookmark.parent_id {
            Some(parent_id) => {
                let parent = find_folder_mut(&mut state.bookmarks, parent_id)
                    .ok_or_else(|| BrowserError::BookmarkNotFound(parent_id.clone()))?;
                parent.children.push(node.clone());
            }
            None => state.bookmarks.push(node.clone()),
        }
        debug!("Created bookmark {} ({})", node.id, node.title);
        Ok(node)
    }

    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>, BrowserError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let mut out = Vec::new();
        collect_matches(&self.state.read().bookmarks, &needle, &mut out);
        Ok(out)
    }

    async fn remove_bookmark(&self, id: &str) -> Result<(), BrowserError> {
        let mut state = self.state.write();
        if remove_node(&mut state.bookmarks, id)? {
            Ok(())
        } else {
            Err(BrowserError::BookmarkNotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl HistoryProvider for MemoryBrowser {
    async fn search_history(&self, query: HistoryQuery) -> Result<Vec<HistoryItem>, BrowserError> {
        let needle = query.text.trim().to_lowercase();
        let end = query.end_time.unwrap_or_else(Utc::now);

        let mut items: Vec<HistoryItem> = self
            .state
            .read()
            .history
            .iter()
            .filter(|h| h.last_visit_time >= query.start_time && h.last_visit_time <= end)
            .filter(|h| {
                needle.is_empty()
                    || h.url.to_lowercase().contains(&needle)
                    || h.title.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        items.sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
        items.truncate(query.max_results);
        Ok(items)
    }
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
