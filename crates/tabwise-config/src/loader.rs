//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::error::ConfigError;
use crate::schema::Config;

/// Name of the per-user data directory under `$HOME`.
const DATA_DIR_NAME: &str = ".tabwise";

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, or defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => {
                debug!("No config file at {:?}, using defaults", path);
                Ok(Config::default())
            }
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories.
    pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(path, content)?;
        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.tabwise`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// The per-user data directory (`~/.tabwise`).
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(DATA_DIR_NAME))
    }

    /// Default config file location (`~/.tabwise/config.toml`).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::data_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [api]
            base_url = "http://localhost:11434/v1"
            api_key = "sk-local"
            model = "llama3"

            [retry]
            max_retries = 5

            [assistant]
            temperature = 0.2
            max_tokens = 800

            [history]
            max_turns = 20
            path = "/tmp/tabwise-history.json"

            [tabs]
            inactive_threshold_minutes = 90
            keep_keywords = ["mail", "calendar"]
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.api.model, "llama3");
        assert_eq!(config.api.api_key, "sk-local");
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.assistant.max_tokens, 800);
        assert_eq!(config.history.max_turns, 20);
        assert_eq!(config.tabs.inactive_threshold_minutes, 90);
        assert_eq!(config.tabs.keep_keywords, vec!["mail", "calendar"]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]").unwrap();
        writeln!(file, "model = \"gpt-4o-mini\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.api.model, "gpt-4o-mini");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/tabwise.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.model = "gpt-4o".to_string();
        config.tabs.keep_keywords = vec!["docs".to_string()];
        ConfigLoader::save(&config, &path).unwrap();

        let reloaded = ConfigLoader::load(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("TABWISE_TEST_CONFIG_VAR", "sk-from-env");
        }
        let content = "api_key = \"${TABWISE_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("sk-from-env"));
        unsafe {
            std::env::remove_var("TABWISE_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${TABWISE_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/history.json");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("history.json"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let expanded = ConfigLoader::expand_path("/var/lib/tabwise");
        assert_eq!(expanded, PathBuf::from("/var/lib/tabwise"));
    }
}
