//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub tabs: TabsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat completion endpoint configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    /// Full URL of the `/chat/completions` endpoint.
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_api_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_timeout() -> u64 {
    60
}

/// Gateway retry policy for transient failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Additional attempts after the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    10_000
}

/// Generation parameters for the assistant pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Recent turns embedded in the prompt as conversational context.
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            context_turns: default_context_turns(),
        }
    }
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_context_turns() -> usize {
    6
}

/// Conversation history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_max_turns")]
    pub max_turns: usize,

    /// JSON file for the persisted log; in-memory only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_history_max_turns(),
            path: None,
        }
    }
}

fn default_history_max_turns() -> usize {
    50
}

/// Largest accepted inactivity threshold: one year.
pub const MAX_INACTIVE_THRESHOLD_MINUTES: u64 = 525_600;

/// Tab housekeeping configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabsConfig {
    #[serde(default = "default_inactive_threshold")]
    pub inactive_threshold_minutes: u64,

    /// Tabs whose title or url contains any keyword are never suggested for closing.
    #[serde(default)]
    pub keep_keywords: Vec<String>,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            inactive_threshold_minutes: default_inactive_threshold(),
            keep_keywords: Vec::new(),
        }
    }
}

fn default_inactive_threshold() -> u64 {
    30
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files; `~/.tabwise/logs` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
