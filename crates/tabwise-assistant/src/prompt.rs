//! Prompt construction. Every builder renders fresh browser state; nothing
//! here is cached between calls.

use std::fmt::Write;

use tabwise_protocols::types::{
    ActionKind, BookmarkSummary, ChatTurn, HistoryItem, Message, TabSnapshot, TurnRole,
};

use crate::snapshot::extract_domain;

const RESPONSE_SCHEMA: &str = r#"{
  "action": "CLOSE_TABS|KEEP_TABS|ANALYZE_TABS|CATEGORIZE_TABS|LIST_BOOKMARKS|FIND_DUPLICATE_BOOKMARKS|SAVE_TABS_AS_BOOKMARKS",
  "tabIndices": [tab indices, tab actions only],
  "bookmarkQuery": "search keyword (LIST_BOOKMARKS only)",
  "folderName": "folder name (SAVE_TABS_AS_BOOKMARKS only, optional)",
  "message": "explanation shown to the user",
  "categories": [{"name": "category", "tabs": [tab indices], "reason": "why"}]
}"#;

/// Render one tab line: `[index] title - domain (pinned)(active)`.
pub fn format_tab_line(tab: &TabSnapshot) -> String {
    let mut line = format!("[{}] {} - {}", tab.index, tab.title, tab.domain);
    if tab.pinned {
        line.push_str(" (pinned)");
    }
    if tab.active {
        line.push_str(" (active)");
    }
    line
}

fn system_prompt(tabs: &[TabSnapshot], bookmarks: BookmarkSummary, context: &[ChatTurn]) -> String {
    let mut out = String::from(
        "You are a browser assistant that manages the user's open tabs and bookmarks.\n\n",
    );

    let _ = writeln!(out, "Open tabs ({}):", tabs.len());
    for tab in tabs {
        let _ = writeln!(out, "{}", format_tab_line(tab));
    }

    let _ = writeln!(out, "\nBookmarks:\nTotal bookmarks: {}\n", bookmarks.count);

    out.push_str("Available actions:\n");
    for (i, kind) in ActionKind::ALL.iter().enumerate() {
        let _ = writeln!(out, "{}. {}: {}", i + 1, kind.as_str(), kind.description());
    }

    let _ = writeln!(out, "\nRespond with JSON only, in this format:\n{}", RESPONSE_SCHEMA);

    out.push_str(
        "\nRules:\n\
         - Never include active or pinned tabs in tabIndices for closing operations.\n\
         - Only use indices from the tab list above.\n\
         - For bookmark searches, extract the keyword from the user's request into bookmarkQuery.\n",
    );

    if !context.is_empty() {
        out.push_str("\nRecent conversation (oldest first):\n");
        for turn in context {
            let speaker = match turn.role {
                TurnRole::User => "User",
                TurnRole::Assistant => "Assistant",
            };
            let _ = writeln!(out, "{}: {}", speaker, turn.content);
        }
    }

    out
}

/// Exactly two messages: the rendered system instructions and the verbatim
/// user request.
pub fn build_assistant_prompt(
    tabs: &[TabSnapshot],
    bookmarks: BookmarkSummary,
    user_message: &str,
) -> Vec<Message> {
    build_assistant_prompt_with_context(tabs, bookmarks, &[], user_message)
}

/// Like [`build_assistant_prompt`], with recent turns embedded in the system
/// message so follow-ups ("close those too") can be resolved.
pub fn build_assistant_prompt_with_context(
    tabs: &[TabSnapshot],
    bookmarks: BookmarkSummary,
    context: &[ChatTurn],
    user_message: &str,
) -> Vec<Message> {
    vec![
        Message::system(system_prompt(tabs, bookmarks, context)),
        Message::user(user_message),
    ]
}

/// Ask the model to group tabs by topic.
pub fn categorize_prompt(tabs: &[TabSnapshot]) -> Vec<Message> {
    let list: Vec<String> = tabs
        .iter()
        .map(|t| format!("[{}] {} - {}", t.index, t.title, t.url))
        .collect();

    vec![
        Message::system(
            "You are a browser assistant that is good at grouping tabs by topic.",
        ),
        Message::user(format!(
            "Group the following tabs by topic and give each group a descriptive name.\n\n\
             Tabs:\n{}\n\n\
             Return JSON only, in this format:\n\
             {{\"categories\": [{{\"name\": \"category\", \"tabs\": [tab indices], \"reason\": \"why\"}}]}}",
            list.join("\n")
        )),
    ]
}

/// A tab that passed the inactivity filter, as shown to the model.
pub struct InactiveCandidate<'a> {
    pub title: &'a str,
    pub last_accessed: String,
}

/// Ask the model which stale tabs are safe to close.
pub fn inactive_prompt(candidates: &[InactiveCandidate<'_>]) -> Vec<Message> {
    let list: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{}] {} (last visited: {})", i, c.title, c.last_accessed))
        .collect();

    vec![
        Message::system(
            "You are a browser assistant that helps users tidy up tabs they no longer need.",
        ),
        Message::user(format!(
            "Identify which of these tabs are probably no longer needed \
             (long unvisited, one-off reading, and so on):\n\n{}\n\n\
             Return JSON only, in this format:\n\
             {{\"inactive\": [{{\"index\": tab index, \"reason\": \"why it can be closed\"}}]}}",
            list.join("\n")
        )),
    ]
}

/// Ask the model to characterise recent browsing.
pub fn browsing_analysis_prompt(items: &[HistoryItem], days: u32) -> Vec<Message> {
    let list: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {} - {}", i, item.title, extract_domain(&item.url)))
        .collect();

    vec![
        Message::system(
            "You analyse browsing history and give the user insights and suggestions.",
        ),
        Message::user(format!(
            "Analyse this browsing history from the past {days} days. Return JSON: \
             {{\"insights\": {{\"topCategories\": [\"category\"], \"productivityScore\": 75}}, \
             \"recommendations\": [\"suggestion\"]}}\n\n\
             Visits (most recent {}):\n{}\n\n\
             Identify the main browsing categories, score productivity from 0 to 100 \
             and suggest improvements.",
            items.len(),
            list.join("\n")
        )),
    ]
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
