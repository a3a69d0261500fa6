//! Settings and conversation persistence protocols.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::ChatTurn;

/// Named settings keys, as stored by the options page.
pub mod keys {
    pub const API_BASE_URL: &str = "apiBaseUrl";
    pub const API_KEY: &str = "apiKey";
    pub const API_MODEL: &str = "apiModel";
    pub const TAB_INACTIVE_THRESHOLD: &str = "tabInactiveThreshold";
    pub const TAB_KEEP_KEYWORDS: &str = "tabKeepKeywords";

    pub const ALL: [&str; 5] = [
        API_BASE_URL,
        API_KEY,
        API_MODEL,
        TAB_INACTIVE_THRESHOLD,
        TAB_KEEP_KEYWORDS,
    ];
}

/// Key/value settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read a value; `None` when unset.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read a value, falling back to `default` when unset or unreadable.
    async fn get_or(&self, key: &str, default: Value) -> Value {
        match self.get(key).await {
            Ok(Some(value)) => value,
            _ => default,
        }
    }
}

/// Persistence for the conversation log.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load all stored turns, oldest first.
    async fn load(&self) -> Result<Vec<ChatTurn>, StoreError>;

    /// Replace the stored turns.
    async fn save(&self, turns: &[ChatTurn]) -> Result<(), StoreError>;

    /// Remove every stored turn.
    async fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
