//! Typed interpretation of the model's response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed catalog of actions the model may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    CloseTabs,
    KeepTabs,
    #[serde(alias = "ANALYZE")]
    AnalyzeTabs,
    #[serde(alias = "CATEGORIZE")]
    CategorizeTabs,
    ListBookmarks,
    FindDuplicateBookmarks,
    SaveTabsAsBookmarks,
}

impl ActionKind {
    /// Catalog order, as presented to the model.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::CloseTabs,
        ActionKind::KeepTabs,
        ActionKind::AnalyzeTabs,
        ActionKind::CategorizeTabs,
        ActionKind::ListBookmarks,
        ActionKind::FindDuplicateBookmarks,
        ActionKind::SaveTabsAsBookmarks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CloseTabs => "CLOSE_TABS",
            ActionKind::KeepTabs => "KEEP_TABS",
            ActionKind::AnalyzeTabs => "ANALYZE_TABS",
            ActionKind::CategorizeTabs => "CATEGORIZE_TABS",
            ActionKind::ListBookmarks => "LIST_BOOKMARKS",
            ActionKind::FindDuplicateBookmarks => "FIND_DUPLICATE_BOOKMARKS",
            ActionKind::SaveTabsAsBookmarks => "SAVE_TABS_AS_BOOKMARKS",
        }
    }

    /// One-line catalog description.
    pub fn description(&self) -> &'static str {
        match self {
            ActionKind::CloseTabs => "Close the tabs listed in tabIndices",
            ActionKind::KeepTabs => "Keep only the tabs listed in tabIndices and close the rest",
            ActionKind::AnalyzeTabs => "Analyze the open tabs and explain the findings in message",
            ActionKind::CategorizeTabs => "Group the open tabs into categories",
            ActionKind::ListBookmarks => "List bookmarks matching bookmarkQuery",
            ActionKind::FindDuplicateBookmarks => "Find bookmarks that share the same URL",
            ActionKind::SaveTabsAsBookmarks => {
                "Save the tabs in tabIndices (or all tabs) into a new bookmark folder named folderName"
            }
        }
    }

    /// Resolve an action name, accepting the short `ANALYZE` / `CATEGORIZE`
    /// synonyms and ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "CLOSE_TABS" => Some(ActionKind::CloseTabs),
            "KEEP_TABS" => Some(ActionKind::KeepTabs),
            "ANALYZE_TABS" | "ANALYZE" => Some(ActionKind::AnalyzeTabs),
            "CATEGORIZE_TABS" | "CATEGORIZE" => Some(ActionKind::CategorizeTabs),
            "LIST_BOOKMARKS" => Some(ActionKind::ListBookmarks),
            "FIND_DUPLICATE_BOOKMARKS" => Some(ActionKind::FindDuplicateBookmarks),
            "SAVE_TABS_AS_BOOKMARKS" => Some(ActionKind::SaveTabsAsBookmarks),
            _ => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model-proposed group of tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabCategory {
    pub name: String,

    #[serde(default)]
    pub tabs: Vec<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Action-specific payload. One variant per catalog entry, plus
/// `Unrecognized` for a JSON reply whose action is missing or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "action",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum IntentAction {
    CloseTabs {
        #[serde(default)]
        tab_indices: Vec<usize>,
    },
    KeepTabs {
        #[serde(default)]
        tab_indices: Vec<usize>,
    },
    AnalyzeTabs,
    CategorizeTabs {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        categories: Vec<TabCategory>,
    },
    ListBookmarks {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bookmark_query: Option<String>,
    },
    FindDuplicateBookmarks,
    SaveTabsAsBookmarks {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab_indices: Option<Vec<usize>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        folder_name: Option<String>,
    },
    Unrecognized {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        requested: Option<String>,
    },
}

impl IntentAction {
    /// Catalog entry for this payload; `None` for `Unrecognized`.
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            IntentAction::CloseTabs { .. } => Some(ActionKind::CloseTabs),
            IntentAction::KeepTabs { .. } => Some(ActionKind::KeepTabs),
            IntentAction::AnalyzeTabs => Some(ActionKind::AnalyzeTabs),
            IntentAction::CategorizeTabs { .. } => Some(ActionKind::CategorizeTabs),
            IntentAction::ListBookmarks { .. } => Some(ActionKind::ListBookmarks),
            IntentAction::FindDuplicateBookmarks => Some(ActionKind::FindDuplicateBookmarks),
            IntentAction::SaveTabsAsBookmarks { .. } => Some(ActionKind::SaveTabsAsBookmarks),
            IntentAction::Unrecognized { .. } => None,
        }
    }
}

/// Parsed model output: the requested action plus the model's explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(flatten)]
    pub action: IntentAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Intent {
    pub fn new(action: IntentAction) -> Self {
        Self {
            action,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn kind(&self) -> Option<ActionKind> {
        self.action.kind()
    }

    /// The explanation text, or empty.
    pub fn message_text(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "intent_tests.rs"]
mod tests;
