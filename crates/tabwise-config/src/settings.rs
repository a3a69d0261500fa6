//! Named key/value settings store backed by [`Config`].

use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use tabwise_protocols::error::StoreError;
use tabwise_protocols::store::{keys, SettingsStore};

use crate::loader::ConfigLoader;
use crate::schema::{Config, MAX_INACTIVE_THRESHOLD_MINUTES};

/// Split a comma-separated keyword list into trimmed, lowercase keywords.
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Exposes the options-page keys over a [`Config`], optionally writing
/// every change back to the TOML file it was loaded from.
pub struct ConfigSettingsStore {
    config: RwLock<Config>,
    path: Option<PathBuf>,
}

impl ConfigSettingsStore {
    /// In-memory store; changes are not persisted.
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            path: None,
        }
    }

    /// Store that saves to `path` after every `set`.
    pub fn with_path(config: Config, path: PathBuf) -> Self {
        Self {
            config: RwLock::new(config),
            path: Some(path),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    fn read_key(config: &Config, key: &str) -> Result<Option<Value>, StoreError> {
        let value = match key {
            keys::API_BASE_URL => Some(Value::from(config.api.base_url.clone())),
            keys::API_KEY if config.api.has_api_key() => Some(Value::from(config.api.api_key.clone())),
            keys::API_KEY => None,
            keys::API_MODEL => Some(Value::from(config.api.model.clone())),
            keys::TAB_INACTIVE_THRESHOLD => Some(Value::from(config.tabs.inactive_threshold_minutes)),
            keys::TAB_KEEP_KEYWORDS => Some(Value::from(config.tabs.keep_keywords.join(","))),
            other => return Err(StoreError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    fn write_key(config: &mut Config, key: &str, value: Value) -> Result<(), StoreError> {
        match key {
            keys::API_BASE_URL => config.api.base_url = expect_string(key, value)?,
            keys::API_KEY => config.api.api_key = expect_string(key, value)?,
            keys::API_MODEL => config.api.model = expect_string(key, value)?,
            keys::TAB_INACTIVE_THRESHOLD => {
                config.tabs.inactive_threshold_minutes =
                    expect_bounded_integer(key, &value, MAX_INACTIVE_THRESHOLD_MINUTES)?
            }
            keys::TAB_KEEP_KEYWORDS => config.tabs.keep_keywords = expect_keywords(key, value)?,
            other => return Err(StoreError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> StoreError {
    StoreError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn expect_string(key: &str, value: Value) -> Result<String, StoreError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        _ => Err(invalid(key, "expected a string")),
    }
}

fn expect_bounded_integer(key: &str, value: &Value, max: u64) -> Result<u64, StoreError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 && n <= max => Ok(n),
        _ => Err(invalid(key, &format!("expected an integer between 1 and {max}"))),
    }
}

fn expect_keywords(key: &str, value: Value) -> Result<Vec<String>, StoreError> {
    match value {
        Value::String(s) => Ok(split_keywords(&s)),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.trim().to_lowercase()),
                _ => Err(invalid(key, "expected an array of strings")),
            })
            .filter(|k| !matches!(k, Ok(s) if s.is_empty()))
            .collect(),
        _ => Err(invalid(key, "expected a comma-separated string or an array of strings")),
    }
}

#[async_trait]
impl SettingsStore for ConfigSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let config = self.config.read();
        Self::read_key(&config, key)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let snapshot = {
            let mut config = self.config.write();
            Self::write_key(&mut config, key, value)?;
            config.clone()
        };
        debug!("Setting updated: {}", key);

        if let Some(path) = &self.path {
            let path = path.clone();
            tokio::task::spawn_blocking(move || ConfigLoader::save(&snapshot, &path))
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?
                .map_err(|e| {
                    warn!("Failed to persist settings: {}", e);
                    StoreError::Backend(e.to_string())
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
