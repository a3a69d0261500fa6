//! Intent parsing: model text in, typed [`Intent`] out.
//!
//! Extraction runs in stages, stopping at the first that yields a JSON
//! object:
//!
//! 1. the whole reply parsed as JSON;
//! 2. the body of a fenced code block tagged `json` or untagged.
//!
//! When neither stage succeeds the raw text is handed back as a
//! [`ParseFailure`] and shown to the user as a plain message. Objects
//! quoted inside prose are never treated as intents; only the insight
//! prompts, which cannot trigger browser actions, fall back to
//! [`extract_embedded_json`].

use serde_json::{Map, Value};
use tracing::{debug, warn};

use tabwise_protocols::types::{ActionKind, Intent, IntentAction, TabCategory};

/// The model's reply could not be read as an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub raw: String,
}

impl ParseFailure {
    pub fn into_raw(self) -> String {
        self.raw
    }
}

/// Parse a model reply into an [`Intent`].
///
/// A JSON object without a known `action` becomes
/// [`IntentAction::Unrecognized`] so the caller can show its `message`.
pub fn parse_intent(raw: &str) -> Result<Intent, ParseFailure> {
    match extract_json_value(raw).as_ref().and_then(intent_from_value) {
        Some(intent) => {
            debug!("Parsed intent: {:?}", intent.kind());
            Ok(intent)
        }
        None => {
            warn!("Model reply is not a JSON intent, treating it as a message");
            Err(ParseFailure {
                raw: raw.to_string(),
            })
        }
    }
}

/// Find a JSON object in `raw`: the whole reply, then fenced blocks.
pub fn extract_json_value(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(value) = parse_object(trimmed) {
        return Some(value);
    }

    let value = fenced_blocks(raw).find_map(parse_object)?;
    debug!("Extracted JSON from fenced block");
    Some(value)
}

/// Like [`extract_json_value`], but also accepts the first balanced
/// `{...}` span in surrounding prose. Not for action intents.
pub fn extract_embedded_json(raw: &str) -> Option<Value> {
    extract_json_value(raw).or_else(|| {
        let value = parse_object(balanced_object(raw)?)?;
        debug!("Extracted JSON from surrounding prose");
        Some(value)
    })
}

/// Bodies of fenced blocks whose info string is empty or `json`.
fn fenced_blocks(raw: &str) -> impl Iterator<Item = &str> {
    raw.split("```").skip(1).step_by(2).filter_map(|block| {
        let (info, body) = block.split_once('\n')?;
        let info = info.trim();
        (info.is_empty() || info.eq_ignore_ascii_case("json")).then(|| body.trim())
    })
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// First `{` through its matching `}`, skipping braces inside strings.
fn balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in raw[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&raw[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

fn intent_from_value(value: &Value) -> Option<Intent> {
    let obj = value.as_object()?;
    let requested = obj.get("action").and_then(Value::as_str);

    let action = match requested.and_then(ActionKind::parse) {
        Some(ActionKind::CloseTabs) => IntentAction::CloseTabs {
            tab_indices: tab_indices(obj).unwrap_or_default(),
        },
        Some(ActionKind::KeepTabs) => IntentAction::KeepTabs {
            tab_indices: tab_indices(obj).unwrap_or_default(),
        },
        Some(ActionKind::AnalyzeTabs) => IntentAction::AnalyzeTabs,
        Some(ActionKind::CategorizeTabs) => IntentAction::CategorizeTabs {
            categories: obj.get("categories").map(parse_categories).unwrap_or_default(),
        },
        Some(ActionKind::ListBookmarks) => IntentAction::ListBookmarks {
            bookmark_query: non_empty_string(obj, "bookmarkQuery"),
        },
        Some(ActionKind::FindDuplicateBookmarks) => IntentAction::FindDuplicateBookmarks,
        Some(ActionKind::SaveTabsAsBookmarks) => IntentAction::SaveTabsAsBookmarks {
            tab_indices: tab_indices(obj),
            folder_name: non_empty_string(obj, "folderName"),
        },
        None => IntentAction::Unrecognized {
            requested: requested.map(str::to_string),
        },
    };

    Some(Intent {
        action,
        message: non_empty_string(obj, "message"),
    })
}

fn non_empty_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `tabIndices` as given; `None` when absent or not an array.
fn tab_indices(obj: &Map<String, Value>) -> Option<Vec<usize>> {
    obj.get("tabIndices").and_then(Value::as_array).map(|items| index_list(items))
}

/// Non-negative integers or numeric strings; anything else is dropped.
fn index_list(items: &[Value]) -> Vec<usize> {
    items.iter().filter_map(index_value).collect()
}

fn index_value(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Categories as `{name|category, tabs, reason}` objects.
pub(crate) fn parse_categories(value: &Value) -> Vec<TabCategory> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let name = non_empty_string(obj, "name").or_else(|| non_empty_string(obj, "category"))?;
            Some(TabCategory {
                name,
                tabs: obj
                    .get("tabs")
                    .and_then(Value::as_array)
                    .map(|tabs| index_list(tabs))
                    .unwrap_or_default(),
                reason: non_empty_string(obj, "reason"),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "intent_tests.rs"]
mod tests;
