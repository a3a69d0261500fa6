//! Browser state types: raw port records and the per-request snapshot model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::TabId;

/// An open tab as reported by the tab port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: TabId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl BrowserTab {
    pub fn new(id: TabId, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            url: Some(url.into()),
            active: false,
            pinned: false,
            last_accessed: None,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn with_last_accessed(mut self, at: DateTime<Utc>) -> Self {
        self.last_accessed = Some(at);
        self
    }
}

/// A node of the bookmark tree. Folders carry no `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn folder(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: title.into(),
            url: None,
            date_added: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            title: title.into(),
            url: Some(url.into()),
            date_added: None,
            children: Vec::new(),
        }
    }

    /// Attach children, stamping their `parent_id`.
    pub fn with_children(mut self, children: Vec<BookmarkNode>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(self.id.clone());
                child
            })
            .collect();
        self
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

/// Request to create a bookmark folder (no url) or leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NewBookmark {
    pub fn folder(title: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            title: title.into(),
            url: None,
        }
    }

    pub fn leaf(parent_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            title: title.into(),
            url: Some(url.into()),
        }
    }
}

/// A browsing history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub last_visit_time: DateTime<Utc>,
}

/// Time-ranged history search.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    /// Case-insensitive text filter; empty matches everything.
    pub text: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub max_results: usize,
}

impl HistoryQuery {
    pub fn since(start_time: DateTime<Utc>) -> Self {
        Self {
            text: String::new(),
            start_time,
            end_time: None,
            max_results: 100,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// One tab of a per-request snapshot. `index` is dense and only valid
/// within the invocation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub index: usize,
    pub id: TabId,
    pub title: String,
    pub url: String,
    pub domain: String,
    pub active: bool,
    pub pinned: bool,
}

impl TabSnapshot {
    /// Active and pinned tabs are never closed programmatically.
    pub fn is_protected(&self) -> bool {
        self.active || self.pinned
    }
}

/// Flattened URL-bearing bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Bookmark totals included in the assistant prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSummary {
    pub count: usize,
}

/// Bookmarks sharing one exact URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub url: String,
    pub count: usize,
    pub bookmarks: Vec<BookmarkRecord>,
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
