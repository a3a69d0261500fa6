//! Common utility types.

use serde::{Deserialize, Serialize};

/// Platform tab identifier.
pub type TabId = i64;

/// Usage information for a completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Append `s` to `word` unless `count` is exactly one.
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
