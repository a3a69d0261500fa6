//! Action execution.
//!
//! One parsed [`Intent`] triggers at most one action. Tab indices always
//! refer to the snapshot taken for the same request; out-of-range indices
//! and protected (active or pinned) tabs are dropped without error.

use std::collections::BTreeSet;

use chrono::Local;
use futures::future::join_all;
use tracing::{debug, info, warn};

use tabwise_protocols::browser::BrowserPorts;
use tabwise_protocols::types::{
    plural, ActionKind, ExecutionResult, Intent, IntentAction, NewBookmark, TabId, TabSnapshot,
};

use crate::bookmarks::{find_duplicate_bookmarks, flatten_bookmarks, search_bookmarks};
use crate::error::AssistantError;

/// Maximum bookmarks listed for one query.
pub const LIST_BOOKMARKS_LIMIT: usize = 10;

/// Applies intents to the browser through the injected ports.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    ports: BrowserPorts,
}

impl ActionExecutor {
    pub fn new(ports: BrowserPorts) -> Self {
        Self { ports }
    }

    /// Run `intent` against `tabs`, the snapshot it was produced from.
    ///
    /// Errors only when a browser read needed by the action fails; failed
    /// writes inside a batch are logged and left out of the counts.
    pub async fn execute(
        &self,
        intent: &Intent,
        tabs: &[TabSnapshot],
    ) -> Result<ExecutionResult, AssistantError> {
        let message = intent.message_text().to_string();

        let (kind, summary) = match &intent.action {
            IntentAction::CloseTabs { tab_indices } => {
                (ActionKind::CloseTabs, self.close_tabs(tab_indices, tabs).await)
            }
            IntentAction::KeepTabs { tab_indices } => {
                (ActionKind::KeepTabs, self.keep_tabs(tab_indices, tabs).await)
            }
            IntentAction::SaveTabsAsBookmarks {
                tab_indices,
                folder_name,
            } => (
                ActionKind::SaveTabsAsBookmarks,
                self.save_tabs_as_bookmarks(tab_indices.as_deref(), folder_name.as_deref(), tabs)
                    .await,
            ),
            IntentAction::ListBookmarks { bookmark_query } => (
                ActionKind::ListBookmarks,
                self.list_bookmarks(bookmark_query.as_deref()).await?,
            ),
            IntentAction::FindDuplicateBookmarks => (
                ActionKind::FindDuplicateBookmarks,
                self.find_duplicates().await?,
            ),
            IntentAction::AnalyzeTabs => (ActionKind::AnalyzeTabs, String::new()),
            IntentAction::CategorizeTabs { categories } => {
                return Ok(
                    ExecutionResult::action(ActionKind::CategorizeTabs, message, String::new())
                        .with_categories(categories.clone()),
                );
            }
            IntentAction::Unrecognized { requested } => {
                debug!("No executable action (requested: {:?})", requested);
                return Ok(ExecutionResult::message(message));
            }
        };

        Ok(ExecutionResult::action(kind, message, summary))
    }

    async fn close_tabs(&self, indices: &[usize], tabs: &[TabSnapshot]) -> String {
        let ids = closable_ids(indices, tabs);
        if ids.is_empty() {
            return "No tabs were eligible to close (active and pinned tabs are protected).".to_string();
        }

        let closed = self.remove_tabs(&ids).await;
        format!("{} {} closed.", closed, plural(closed, "tab"))
    }

    async fn keep_tabs(&self, survivors: &[usize], tabs: &[TabSnapshot]) -> String {
        let keep: BTreeSet<usize> = survivors.iter().copied().filter(|&i| i < tabs.len()).collect();
        if keep.is_empty() {
            return "No tabs were named to keep, so nothing was closed.".to_string();
        }

        let ids: Vec<TabId> = tabs
            .iter()
            .filter(|t| !keep.contains(&t.index) && !t.is_protected())
            .map(|t| t.id)
            .collect();

        let closed = if ids.is_empty() { 0 } else { self.remove_tabs(&ids).await };
        format!(
            "Kept {} {}, closed {} {}.",
            keep.len(),
            plural(keep.len(), "tab"),
            closed,
            plural(closed, "other")
        )
    }

    async fn save_tabs_as_bookmarks(
        &self,
        indices: Option<&[usize]>,
        folder_name: Option<&str>,
        tabs: &[TabSnapshot],
    ) -> String {
        let selected: Vec<&TabSnapshot> = match indices {
            Some(indices) if !indices.is_empty() => {
                let wanted: BTreeSet<usize> = indices.iter().copied().collect();
                tabs.iter().filter(|t| wanted.contains(&t.index)).collect()
            }
            _ => tabs.iter().collect(),
        };

        if selected.is_empty() {
            return "Saved 0 tabs: there were no tabs to bookmark.".to_string();
        }

        let folder_name = folder_name
            .map(str::to_string)
            .unwrap_or_else(default_folder_name);

        let folder = match self
            .ports
            .bookmarks
            .create_bookmark(NewBookmark::folder(folder_name.clone()))
            .await
        {
            Ok(folder) => folder,
            Err(e) => {
                warn!("Failed to create bookmark folder {:?}: {}", folder_name, e);
                return format!("Failed to save bookmarks: {e}");
            }
        };

        let creates = selected.iter().map(|tab| {
            let bookmark = NewBookmark::leaf(folder.id.clone(), tab.title.clone(), tab.url.clone());
            self.ports.bookmarks.create_bookmark(bookmark)
        });
        let saved = join_all(creates)
            .await
            .into_iter()
            .filter(|result| match result {
                Ok(_) => true,
                Err(e) => {
                    warn!("Failed to save bookmark: {}", e);
                    false
                }
            })
            .count();

        info!("Saved {} tabs to bookmark folder {:?}", saved, folder_name);
        format!(
            "Saved {} {} to bookmark folder \"{}\".",
            saved,
            plural(saved, "tab"),
            folder_name
        )
    }

    async fn list_bookmarks(&self, query: Option<&str>) -> Result<String, AssistantError> {
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok("Please provide a keyword to search your bookmarks for.".to_string());
        };

        let tree = self.ports.bookmarks.bookmark_tree().await?;
        let records = flatten_bookmarks(&tree);
        let matches = search_bookmarks(&records, query, LIST_BOOKMARKS_LIMIT);

        if matches.is_empty() {
            return Ok(format!("No bookmarks matched \"{query}\"."));
        }

        let lines: Vec<String> = matches
            .iter()
            .map(|b| format!("- [{}]({})", b.title, b.url))
            .collect();
        Ok(format!(
            "Found {} matching {}:\n{}",
            matches.len(),
            plural(matches.len(), "bookmark"),
            lines.join("\n")
        ))
    }

    async fn find_duplicates(&self) -> Result<String, AssistantError> {
        let tree = self.ports.bookmarks.bookmark_tree().await?;
        let groups = find_duplicate_bookmarks(&flatten_bookmarks(&tree));

        Ok(if groups.is_empty() {
            "No duplicate bookmarks found.".to_string()
        } else {
            format!(
                "Found {} {} of duplicate bookmarks; consider cleaning them up in the bookmark manager.",
                groups.len(),
                plural(groups.len(), "group")
            )
        })
    }

    /// Close every id concurrently; returns how many succeeded.
    async fn remove_tabs(&self, ids: &[TabId]) -> usize {
        let removals = ids.iter().map(|&id| self.ports.tabs.remove_tab(id));
        let closed = join_all(removals)
            .await
            .into_iter()
            .zip(ids)
            .filter(|(result, id)| match result {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to close tab {}: {}", id, e);
                    false
                }
            })
            .count();
        info!("Closed {} of {} tabs", closed, ids.len());
        closed
    }
}

/// Ids for `indices` that exist in the snapshot and are not protected,
/// deduplicated in index order.
pub fn closable_ids(indices: &[usize], tabs: &[TabSnapshot]) -> Vec<TabId> {
    indices
        .iter()
        .copied()
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .filter_map(|i| tabs.get(i))
        .filter(|t| !t.is_protected())
        .map(|t| t.id)
        .collect()
}

/// `Saved Tabs YYYY-MM-DD` in local time.
pub fn default_folder_name() -> String {
    format!("Saved Tabs {}", Local::now().format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
