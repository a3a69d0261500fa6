//! Browser capability ports.
//!
//! The assistant core never touches a browser global; it receives these
//! narrow interfaces and calls nothing else.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BrowserError;
use crate::types::{BookmarkNode, BrowserTab, HistoryItem, HistoryQuery, NewBookmark, TabId};

/// Open tab enumeration and removal.
#[async_trait]
pub trait TabProvider: Send + Sync {
    /// All open tabs, in the browser's enumeration order.
    async fn query_tabs(&self) -> Result<Vec<BrowserTab>, BrowserError>;

    /// Close one tab.
    async fn remove_tab(&self, id: TabId) -> Result<(), BrowserError>;
}

/// Bookmark tree access and mutation.
#[async_trait]
pub trait BookmarkProvider: Send + Sync {
    /// The full bookmark tree (root nodes).
    async fn bookmark_tree(&self) -> Result<Vec<BookmarkNode>, BrowserError>;

    /// Create a folder (no url) or a bookmark.
    async fn create_bookmark(&self, bookmark: NewBookmark) -> Result<BookmarkNode, BrowserError>;

    /// Bookmarks whose title or url contains `query`.
    async fn search_bookmarks(&self, query: &str) -> Result<Vec<BookmarkNode>, BrowserError>;

    /// Remove a bookmark or an empty folder.
    async fn remove_bookmark(&self, id: &str) -> Result<(), BrowserError>;
}

/// Browsing history search.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Entries visited within the query's time range, most recent first.
    async fn search_history(&self, query: HistoryQuery) -> Result<Vec<HistoryItem>, BrowserError>;
}

/// The set of browser capabilities injected into the assistant core.
#[derive(Clone)]
pub struct BrowserPorts {
    pub tabs: Arc<dyn TabProvider>,
    pub bookmarks: Arc<dyn BookmarkProvider>,
    pub history: Arc<dyn HistoryProvider>,
}

impl BrowserPorts {
    pub fn new(
        tabs: Arc<dyn TabProvider>,
        bookmarks: Arc<dyn BookmarkProvider>,
        history: Arc<dyn HistoryProvider>,
    ) -> Self {
        Self {
            tabs,
            bookmarks,
            history,
        }
    }

    /// Use one object for every port.
    pub fn from_shared<B>(browser: Arc<B>) -> Self
    where
        B: TabProvider + BookmarkProvider + HistoryProvider + 'static,
    {
        Self {
            tabs: browser.clone(),
            bookmarks: browser.clone(),
            history: browser,
        }
    }
}

impl std::fmt::Debug for BrowserPorts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserPorts").finish_non_exhaustive()
    }
}
